//! Gleaner Extractor
//!
//! Pulls structured field values out of a batch of files with a single
//! multimodal model call.
//!
//! # Overview
//!
//! The user supplies files (documents, images, audio) and a schema of
//! named, typed fields. The Extractor validates both, encodes every file
//! concurrently, builds the response contract and the instruction text,
//! makes one structured-output request and interprets the answer against
//! the same contract.
//!
//! # Architecture
//!
//! ```text
//! Files ──► encoder ──┐
//!                     ├──► LlmProvider ──► parser ──► ResponseSchema::interpret ──► AggregatedResult
//! Schema ─► prompt ───┘
//! ```
//!
//! # Failure model
//!
//! - Missing files, an invalid schema or an unsupported media type are
//!   rejected up front with an `Err` and nothing is sent.
//! - Any later failure (unreadable file, network, empty or malformed
//!   answer) yields `AggregatedResult::error` with a readable message.
//!
//! There are no retries and no partial results.
//!
//! # Example Usage
//!
//! ```no_run
//! use gleaner_domain::{FieldType, Schema, SchemaField};
//! use gleaner_extractor::{Extractor, ExtractorConfig, SourceFile};
//! use gleaner_llm::{gemini::DEFAULT_MODEL, GeminiProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = GeminiProvider::new(std::env::var("GEMINI_API_KEY").ok(), DEFAULT_MODEL);
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let mut schema = Schema::new();
//! schema.push(SchemaField::new("total", FieldType::Number, "Invoice total"));
//!
//! let files = vec![SourceFile::from_path("invoice.pdf")];
//! let result = extractor.extract(&files, &schema).await?;
//!
//! if let Some(item) = result.data().get("total") {
//!     println!("total = {:?} (from {:?})", item.value, item.source);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod encoder;
mod error;
mod extractor;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use config::{ExtractorConfig, RESPONSE_MIME_TYPE};
pub use encoder::{
    encode_all, encode_file, is_supported_media_type, strip_data_uri, EncodedFile, FileContent,
    SourceFile,
};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::parse_model_response;
pub use prompt::PromptBuilder;
