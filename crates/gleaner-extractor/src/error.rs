//! Error types for the Extractor

use gleaner_domain::{ResponseError, SchemaError};
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// No files were supplied
    #[error("Please upload at least one file.")]
    NoFiles,

    /// Schema cannot be turned into a response contract
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// File type outside the accepted set
    #[error("Unsupported file type for '{name}': {media_type}")]
    UnsupportedMediaType {
        /// File name
        name: String,
        /// Declared or guessed media type
        media_type: String,
    },

    /// File could not be read or decoded
    #[error("Failed to read file '{name}': {reason}")]
    FileRead {
        /// File name
        name: String,
        /// Underlying cause
        reason: String,
    },

    /// A single file exceeds the size limit
    #[error("File '{name}' is too large: {size} bytes (max: {max})")]
    FileTooLarge {
        /// File name
        name: String,
        /// Actual size
        size: usize,
        /// Limit
        max: usize,
    },

    /// All files together exceed the size limit
    #[error("Files are too large together: {0} bytes (max: {1})")]
    BatchTooLarge(usize, usize),

    /// Model provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extraction timeout
    #[error("Extraction timeout")]
    Timeout,

    /// Model returned no text
    #[error("Empty response from AI")]
    EmptyResponse,

    /// Model returned text that is not JSON
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Model returned JSON that does not honour the response schema
    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] ResponseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether this error was raised before any file was read or any
    /// network call was made
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExtractorError::NoFiles
                | ExtractorError::Schema(_)
                | ExtractorError::UnsupportedMediaType { .. }
                | ExtractorError::Config(_)
        )
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
