//! Gleaner LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `gleaner-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Hosted Gemini `generateContent` API with structured output
//!
//! # Examples
//!
//! ```
//! use gleaner_llm::MockProvider;
//! use gleaner_domain::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"total": {"value": 10, "source": "a.pdf"}}"#);
//! assert_eq!(provider.model_name(), "mock");
//! assert_eq!(provider.call_count(), 0);
//! ```

#![warn(missing_docs)]

pub mod gemini;

use gleaner_domain::{GenerationRequest, LlmProvider};
use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during model operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing or rejected API key
    #[error("Authentication error: {0}")]
    Authentication(String),
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls and
/// records every request it receives.
///
/// # Examples
///
/// ```
/// use gleaner_llm::MockProvider;
///
/// // Fixed response for every request
/// let provider = MockProvider::new("{}");
///
/// // Response chosen by a fragment of the instruction text
/// let mut provider = MockProvider::default();
/// provider.add_response("invoice_no", r#"{"invoice_no": {"value": 7, "source": null}}"#);
///
/// // Every request fails
/// let provider = MockProvider::failing("service unavailable");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Vec<(String, String)>,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Vec::new(),
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockProvider whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let mut provider = Self::default();
        provider.failure = Some(message.into());
        provider
    }

    /// Return `response` for requests whose instruction text contains `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.responses.push((fragment.into(), response.into()));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Get the most recent request
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Reset recorded requests
    pub fn reset(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn respond(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(LlmError::Communication(message.clone()));
        }

        let prompt = request.prompt().unwrap_or_default();
        let response = self
            .responses
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());
        Ok(response)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        "mock"
    }

    fn generate_structured(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        let result = self.respond(request);
        async move { result }
    }
}
