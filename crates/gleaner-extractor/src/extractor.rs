//! Core Extractor implementation

use crate::config::{ExtractorConfig, RESPONSE_MIME_TYPE};
use crate::encoder::{encode_all, SourceFile};
use crate::error::ExtractorError;
use crate::parser::parse_model_response;
use crate::prompt::PromptBuilder;
use gleaner_domain::{
    AggregatedResult, ContentPart, ExtractedData, GenerationConfig, GenerationRequest,
    LlmProvider, ResponseSchema, Schema,
};
use std::fmt::Display;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// The Extractor turns a batch of files and a field schema into one
/// aggregated result
pub struct Extractor<L: LlmProvider> {
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// The underlying model provider
    pub fn llm(&self) -> &L {
        &self.llm_provider
    }

    /// Check inputs before any file is read or any request is made
    ///
    /// Order: files present, schema valid, media types accepted.
    pub fn validate(
        &self,
        files: &[SourceFile],
        schema: &Schema,
    ) -> Result<ResponseSchema, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;

        if files.is_empty() {
            return Err(ExtractorError::NoFiles);
        }

        let response_schema = ResponseSchema::build(schema)?;

        for file in files {
            file.check_supported()?;
        }

        Ok(response_schema)
    }

    /// Run one extraction
    ///
    /// Validation failures are returned as `Err` and nothing is sent.
    /// Everything after validation (file reads, the model call, the
    /// response contract) settles into the returned [`AggregatedResult`].
    pub async fn extract(
        &self,
        files: &[SourceFile],
        schema: &Schema,
    ) -> Result<AggregatedResult, ExtractorError> {
        let response_schema = self.validate(files, schema)?;

        let start_time = Instant::now();
        info!(
            "Starting extraction: {} files, {} fields, model '{}'",
            files.len(),
            response_schema.fields().len(),
            self.llm_provider.model_name()
        );

        let result = match self.run(files, &response_schema).await {
            Ok(data) => {
                info!(
                    "Extraction complete: {} of {} fields found in {} ms",
                    data.iter().filter(|(_, item)| item.has_value()).count(),
                    data.len(),
                    start_time.elapsed().as_millis()
                );
                AggregatedResult::success(data)
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                AggregatedResult::error(e.to_string())
            }
        };

        Ok(result)
    }

    async fn run(
        &self,
        files: &[SourceFile],
        response_schema: &ResponseSchema,
    ) -> Result<ExtractedData, ExtractorError> {
        let encoded = encode_all(files, &self.config).await?;

        let prompt =
            PromptBuilder::new(encoded.iter().map(|f| f.name.as_str()), response_schema.fields())
                .build();
        debug!("Prompt length: {} chars", prompt.len());

        let mut parts: Vec<ContentPart> = encoded
            .into_iter()
            .map(|f| ContentPart::InlineData(f.part))
            .collect();
        parts.push(ContentPart::Text(prompt));

        let request = GenerationRequest {
            parts,
            config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE.to_string(),
                response_schema: response_schema.root().clone(),
                temperature: self.config.temperature,
            },
        };

        let response = timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate_structured(&request),
        )
        .await
        .map_err(|_| ExtractorError::Timeout)?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("Model response length: {} chars", response.len());

        let json = parse_model_response(&response)?;
        Ok(response_schema.interpret(&json)?)
    }
}
