//! Gleaner Domain Layer
//!
//! This crate contains the data model shared by every other Gleaner crate:
//! the user-defined extraction schema, the structured contract sent to the
//! generative model, and the aggregated result that comes back.
//!
//! ## Key Concepts
//!
//! - **Schema field**: a user-defined, named, typed extraction target
//! - **Response schema**: the JSON-schema contract the model output must follow
//! - **Extracted data**: a typed mapping from field name to `{value, source}`,
//!   only ever produced by interpreting a model answer against a response schema
//! - **Aggregated result**: the outcome of one extraction, success or error
//!
//! ## Architecture
//!
//! - Pure data and validation, no I/O
//! - Provider trait for the generative model lives here; implementations
//!   live in `gleaner-llm`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod field;
pub mod response_schema;
pub mod result;
pub mod schema;
pub mod template;
pub mod traits;

// Re-exports for convenience
pub use account::{Account, CrmStatus};
pub use field::{FieldId, FieldName, FieldType, SchemaField};
pub use response_schema::{FieldSpec, ResponseError, ResponseSchema, SchemaNode, SchemaType};
pub use result::{AggregatedResult, ExtractedData, ExtractedItem, ExtractedValue, ExtractionStatus};
pub use schema::{Schema, SchemaError};
pub use template::{SchemaTemplate, TemplateField};
pub use traits::{ContentPart, GenerationConfig, GenerationRequest, LlmProvider, MediaPart};
