//! Trait definitions for external interactions
//!
//! These traits define the boundary between the extraction logic and the
//! hosted generative model. Implementations live in `gleaner-llm`.

use crate::response_schema::SchemaNode;
use std::future::Future;

/// Binary content re-encoded for transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPart {
    /// Media type, e.g. `application/pdf` or `audio/mpeg`
    pub mime_type: String,

    /// Base64 payload (no data-URI header)
    pub data: String,
}

/// One part of a multimodal request
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Inline file content
    InlineData(MediaPart),
    /// Instruction text
    Text(String),
}

/// Output constraints for a structured generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Expected response media type (`application/json`)
    pub response_mime_type: String,

    /// Schema the response must conform to
    pub response_schema: SchemaNode,

    /// Sampling temperature; low values favour factual consistency
    pub temperature: f32,
}

/// A single multimodal request: file parts followed by the instruction
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Ordered content parts
    pub parts: Vec<ContentPart>,

    /// Output constraints
    pub config: GenerationConfig,
}

impl GenerationRequest {
    /// Number of inline file parts
    pub fn file_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ContentPart::InlineData(_)))
            .count()
    }

    /// The instruction text, if present
    pub fn prompt(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            ContentPart::Text(t) => Some(t.as_str()),
            ContentPart::InlineData(_) => None,
        })
    }
}

/// Trait for generative model operations
///
/// Implemented by the infrastructure layer (gleaner-llm)
pub trait LlmProvider {
    /// Error type for model operations
    type Error;

    /// Model identifier, for logging and display
    fn model_name(&self) -> &str;

    /// Submit one structured request and return the raw response text
    fn generate_structured(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
