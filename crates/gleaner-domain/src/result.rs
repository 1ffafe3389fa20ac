//! Extraction results - per-field values and the aggregated outcome

use crate::field::FieldName;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;

/// A single extracted value
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedValue {
    /// Text or date value
    Text(String),
    /// Numeric value, kept in its JSON representation
    Number(serde_json::Number),
}

impl ExtractedValue {
    /// Whether this value carries no content (an empty string)
    pub fn is_blank(&self) -> bool {
        matches!(self, ExtractedValue::Text(s) if s.trim().is_empty())
    }

    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtractedValue::Number(n) => n.as_f64(),
            ExtractedValue::Text(_) => None,
        }
    }
}

impl fmt::Display for ExtractedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractedValue::Text(s) => f.write_str(s),
            ExtractedValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for ExtractedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractedValue::Text(s) => serializer.serialize_str(s),
            ExtractedValue::Number(n) => n.serialize(serializer),
        }
    }
}

/// Value and provenance for one schema field
///
/// Both keys are always present on the wire; `null` means "not found".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtractedItem {
    /// Extracted value
    pub value: Option<ExtractedValue>,

    /// File name(s) the value was found in
    pub source: Option<String>,
}

impl ExtractedItem {
    /// Whether a usable value was found
    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_blank())
    }
}

/// Mapping from validated field name to extracted item, in schema order
///
/// Only [`crate::ResponseSchema::interpret`] populates this type, so every
/// instance holds exactly one entry per field of the schema it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedData {
    entries: Vec<(FieldName, ExtractedItem)>,
}

impl ExtractedData {
    pub(crate) fn from_entries(entries: Vec<(FieldName, ExtractedItem)>) -> Self {
        Self { entries }
    }

    /// Look up the item for a field
    pub fn get(&self, name: &str) -> Option<&ExtractedItem> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, item)| item)
    }

    /// Iterate over entries in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &ExtractedItem)> {
        self.entries.iter().map(|(n, item)| (n, item))
    }

    /// Field names in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.entries.iter().map(|(n, _)| n)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ExtractedData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, item) in &self.entries {
            map.serialize_entry(name.as_str(), item)?;
        }
        map.end()
    }
}

/// Outcome classification of an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// `data` is meaningful
    Success,
    /// `error` is meaningful and `data` is empty
    Error,
}

/// The single result of one extraction invocation
///
/// Immutable once built; a new extraction replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResult {
    status: ExtractionStatus,
    data: ExtractedData,
    error: Option<String>,
}

impl AggregatedResult {
    /// A successful result carrying extracted data
    pub fn success(data: ExtractedData) -> Self {
        Self {
            status: ExtractionStatus::Success,
            data,
            error: None,
        }
    }

    /// A failed result carrying a human-readable message
    ///
    /// An empty message is replaced with a generic one so the error channel
    /// never renders blank.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Extraction failed".to_string()
        } else {
            message
        };
        Self {
            status: ExtractionStatus::Error,
            data: ExtractedData::default(),
            error: Some(message),
        }
    }

    /// Outcome status
    pub fn status(&self) -> ExtractionStatus {
        self.status
    }

    /// Whether the extraction succeeded
    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }

    /// Extracted data (empty on error)
    pub fn data(&self) -> &ExtractedData {
        &self.data
    }

    /// Error message (only on error)
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Serialize for AggregatedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.error.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("AggregatedResult", len)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("data", &self.data)?;
        if let Some(error) = &self.error {
            state.serialize_field("error", error)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_data() -> ExtractedData {
        ExtractedData::from_entries(vec![
            (
                FieldName::new("invoice_no").unwrap(),
                ExtractedItem {
                    value: Some(ExtractedValue::Number(serde_json::Number::from(1042))),
                    source: Some("invoice.pdf".to_string()),
                },
            ),
            (FieldName::new("vendor").unwrap(), ExtractedItem::default()),
        ])
    }

    #[test]
    fn test_success_wire_shape() {
        let result = AggregatedResult::success(sample_data());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "success",
                "data": {
                    "invoice_no": {"value": 1042, "source": "invoice.pdf"},
                    "vendor": {"value": null, "source": null}
                }
            })
        );
    }

    #[test]
    fn test_error_wire_shape() {
        let result = AggregatedResult::error("Empty response from AI");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({"status": "error", "data": {}, "error": "Empty response from AI"})
        );
        assert!(!result.is_success());
        assert!(result.data().is_empty());
    }

    #[test]
    fn test_error_message_never_blank() {
        let result = AggregatedResult::error("  ");
        assert_eq!(result.error_message(), Some("Extraction failed"));
    }

    #[test]
    fn test_serialization_keeps_schema_order() {
        let text = serde_json::to_string(&sample_data()).unwrap();
        let invoice = text.find("invoice_no").unwrap();
        let vendor = text.find("vendor").unwrap();
        assert!(invoice < vendor);
    }

    #[test]
    fn test_has_value() {
        let data = sample_data();
        assert!(data.get("invoice_no").unwrap().has_value());
        assert!(!data.get("vendor").unwrap().has_value());

        let blank = ExtractedItem {
            value: Some(ExtractedValue::Text(String::new())),
            source: None,
        };
        assert!(!blank.has_value());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ExtractedValue::Text("ACME".into()).to_string(), "ACME");
        assert_eq!(
            ExtractedValue::Number(serde_json::Number::from_f64(12.5).unwrap()).to_string(),
            "12.5"
        );
    }
}
