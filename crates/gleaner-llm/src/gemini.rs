//! Gemini Provider Implementation
//!
//! Integration with the hosted Gemini `generateContent` API.
//!
//! # Features
//!
//! - One multimodal request per call: inline file parts plus instruction text
//! - Structured output via `responseMimeType` + `responseSchema`
//! - Configurable endpoint, model and timeout
//! - No retries; a failed call is reported once
//!
//! # Examples
//!
//! ```no_run
//! use gleaner_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new(std::env::var("GEMINI_API_KEY").ok(), "gemini-2.5-flash")
//!     .with_timeout(std::time::Duration::from_secs(60));
//! if !provider.has_api_key() {
//!     eprintln!("GEMINI_API_KEY is not set; requests will be rejected");
//! }
//! ```

use crate::LlmError;
use gleaner_domain::{ContentPart, GenerationRequest, LlmProvider, SchemaNode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model (large context window, multimodal input)
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for a generation request (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: WireGenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: WireBlob<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireBlob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a SchemaNode,
    temperature: f32,
}

/// Response from the generateContent API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(LlmError::InvalidResponse(format!("Request blocked: {}", reason)));
            }
            return Ok(String::new());
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                warn!(finish_reason = reason, "Generation finished early");
            }
        }

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default())
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// A missing key is accepted here; calls fail with
    /// [`LlmError::Authentication`] until one is configured.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Point the provider at a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Submit one structured request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is configured, or the key is rejected
    /// - The model does not exist
    /// - Network communication fails or times out
    /// - The response envelope cannot be decoded
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Authentication("API key not configured".to_string()))?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: request
                    .parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::InlineData(media) => WirePart::InlineData {
                            inline_data: WireBlob {
                                mime_type: &media.mime_type,
                                data: &media.data,
                            },
                        },
                        ContentPart::Text(text) => WirePart::Text { text },
                    })
                    .collect(),
            }],
            generation_config: WireGenerationConfig {
                response_mime_type: &request.config.response_mime_type,
                response_schema: &request.config.response_schema,
                temperature: request.config.temperature,
            },
        };

        debug!(
            model = %self.model,
            files = request.file_count(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Communication("Request timed out".to_string())
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|b| b.error.message)
                .unwrap_or(error_text);

            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Authentication(message)
                }
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, message)),
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        envelope.into_text()
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate_structured(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        self.generate(request).await
    }
}
