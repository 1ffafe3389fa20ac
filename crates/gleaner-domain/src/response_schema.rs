//! Response schema - the structured-output contract sent with each extraction
//!
//! The top level is an object with one required property per field. Each
//! property is an object with two required, nullable keys:
//!
//! ```text
//! {
//!   "<field>": { "value": <string|number|null>, "source": <string|null> },
//!   ...
//! }
//! ```
//!
//! Numbers map to `NUMBER`; text and dates map to `STRING` (dates as
//! `YYYY-MM-DD`). The same contract is used in reverse to interpret the
//! model's answer into [`ExtractedData`].

use crate::field::{FieldName, FieldType};
use crate::result::{ExtractedData, ExtractedItem, ExtractedValue};
use crate::schema::{Schema, SchemaError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Description attached to every `source` sub-property
pub const SOURCE_DESCRIPTION: &str =
    "The filename (e.g., 'contract.pdf') or specific context where this data was found.";

/// Primitive types understood by the structured-output API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    /// JSON object
    Object,
    /// JSON string
    String,
    /// JSON number
    Number,
}

/// One node of the structured-output schema (OpenAPI subset)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Node type
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    /// Hint for the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether `null` is an allowed value
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,

    /// Object properties
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    /// Order in which the model should emit properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,

    /// Keys that must be present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl SchemaNode {
    fn leaf(schema_type: SchemaType, description: String) -> Self {
        Self {
            schema_type,
            description: Some(description),
            nullable: true,
            properties: BTreeMap::new(),
            property_ordering: Vec::new(),
            required: Vec::new(),
        }
    }

    fn object(props: Vec<(String, SchemaNode)>) -> Self {
        let property_ordering: Vec<String> = props.iter().map(|(k, _)| k.clone()).collect();
        Self {
            schema_type: SchemaType::Object,
            description: None,
            nullable: false,
            properties: props.into_iter().collect(),
            required: property_ordering.clone(),
            property_ordering,
        }
    }

    /// Get a property node by key
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        self.properties.get(key)
    }
}

/// A validated field, ready to be embedded in a request
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// JSON key
    pub name: FieldName,

    /// Data type
    pub field_type: FieldType,

    /// Description, empty when not given
    pub description: String,
}

impl FieldSpec {
    fn value_node(&self) -> SchemaNode {
        let schema_type = match self.field_type {
            FieldType::Number => SchemaType::Number,
            FieldType::Text | FieldType::Date => SchemaType::String,
        };
        let description = if self.description.is_empty() {
            format!("The {} found in the context.", self.name)
        } else {
            self.description.clone()
        };
        SchemaNode::leaf(schema_type, description)
    }

    fn item_node(&self) -> SchemaNode {
        SchemaNode::object(vec![
            ("value".to_string(), self.value_node()),
            (
                "source".to_string(),
                SchemaNode::leaf(SchemaType::String, SOURCE_DESCRIPTION.to_string()),
            ),
        ])
    }
}

/// Errors raised when a model answer does not honour the contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// The answer is not a JSON object
    #[error("Expected a JSON object at the top level, got {0}")]
    NotAnObject(&'static str),

    /// A schema field is absent from the answer
    #[error("Response is missing field '{0}'")]
    MissingField(String),

    /// A field entry lacks its `value` or `source` key
    #[error("Field '{field}' is missing its '{key}' key")]
    MissingKey {
        /// Field name
        field: String,
        /// `value` or `source`
        key: &'static str,
    },

    /// A value has the wrong JSON type
    #[error("Field '{field}': {reason}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// What was wrong
        reason: String,
    },
}

/// Structured-output contract built from a validated field list
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    fields: Vec<FieldSpec>,
    root: SchemaNode,
}

impl ResponseSchema {
    /// Build the contract for a schema
    ///
    /// # Errors
    /// Returns the schema's validation error (empty, invalid or duplicate names)
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_domain::{FieldType, ResponseSchema, Schema, SchemaField, SchemaType};
    ///
    /// let schema = Schema::from_fields(vec![
    ///     SchemaField::new("invoice_no", FieldType::Number, ""),
    /// ]);
    /// let contract = ResponseSchema::build(&schema).unwrap();
    /// let value = contract.root().property("invoice_no").unwrap().property("value").unwrap();
    /// assert_eq!(value.schema_type, SchemaType::Number);
    /// assert_eq!(contract.root().required, vec!["invoice_no"]);
    /// ```
    pub fn build(schema: &Schema) -> Result<Self, SchemaError> {
        let fields = schema.validate()?;
        let root = SchemaNode::object(
            fields
                .iter()
                .map(|f| (f.name.to_string(), f.item_node()))
                .collect(),
        );
        Ok(Self { fields, root })
    }

    /// Validated fields in schema order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Root schema node, as attached to the request
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Interpret a parsed model answer against this contract
    ///
    /// Every schema field must be present with both `value` and `source`
    /// keys. Keys the schema does not name are ignored.
    ///
    /// # Errors
    /// Returns [`ResponseError`] on any missing field or key, or on a value
    /// of the wrong JSON type. Nothing partial is returned.
    pub fn interpret(&self, answer: &Value) -> Result<ExtractedData, ResponseError> {
        let object = answer
            .as_object()
            .ok_or_else(|| ResponseError::NotAnObject(json_kind(answer)))?;

        let mut entries = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            let name = spec.name.as_str();
            let entry = object
                .get(name)
                .ok_or_else(|| ResponseError::MissingField(name.to_string()))?;
            entries.push((spec.name.clone(), interpret_item(spec, entry)?));
        }

        Ok(ExtractedData::from_entries(entries))
    }
}

fn interpret_item(spec: &FieldSpec, entry: &Value) -> Result<ExtractedItem, ResponseError> {
    let field = spec.name.as_str();
    let object = entry.as_object().ok_or_else(|| ResponseError::TypeMismatch {
        field: field.to_string(),
        reason: format!("expected an object with value and source, got {}", json_kind(entry)),
    })?;

    let raw_value = object.get("value").ok_or_else(|| ResponseError::MissingKey {
        field: field.to_string(),
        key: "value",
    })?;
    let raw_source = object.get("source").ok_or_else(|| ResponseError::MissingKey {
        field: field.to_string(),
        key: "source",
    })?;

    let value = match (spec.field_type, raw_value) {
        (_, Value::Null) => None,
        (FieldType::Number, Value::Number(n)) => Some(ExtractedValue::Number(n.clone())),
        (FieldType::Number, Value::String(s)) => Some(ExtractedValue::Number(
            parse_number(s).ok_or_else(|| ResponseError::TypeMismatch {
                field: field.to_string(),
                reason: format!("'{}' is not a number", s),
            })?,
        )),
        (FieldType::Text | FieldType::Date, Value::String(s)) => Some(ExtractedValue::Text(s.clone())),
        (FieldType::Text | FieldType::Date, Value::Number(n)) => Some(ExtractedValue::Text(n.to_string())),
        (field_type, other) => {
            return Err(ResponseError::TypeMismatch {
                field: field.to_string(),
                reason: format!("{} value cannot be {}", field_type, json_kind(other)),
            })
        }
    };

    let source = match raw_source {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => {
            return Err(ResponseError::TypeMismatch {
                field: field.to_string(),
                reason: format!("source must be a string, got {}", json_kind(other)),
            })
        }
    };

    Ok(ExtractedItem { value, source })
}

fn parse_number(s: &str) -> Option<serde_json::Number> {
    serde_json::from_str::<serde_json::Number>(s.trim()).ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
