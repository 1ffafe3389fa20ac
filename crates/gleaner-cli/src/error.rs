//! Error types for the CLI application.

use gleaner_crm::CrmError;
use gleaner_domain::{ResponseError, SchemaError};
use gleaner_extractor::ExtractorError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction was rejected before it started
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Extraction ran and produced an error result
    #[error("Extraction failed")]
    ExtractionFailed,

    /// Schema editing error
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Stored result does not match the schema
    #[error("Result does not match schema: {0}")]
    Response(#[from] ResponseError),

    /// CRM webhook error
    #[error("CRM error: {0}")]
    Crm(#[from] CrmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
