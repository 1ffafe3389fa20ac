//! Field module - the user-defined extraction targets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a schema field based on UUIDv7
///
/// Identifiers are session-local; they let the editor address a field while
/// its name is still being typed (and may be empty or duplicated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u128);

impl FieldId {
    /// Generate a new UUIDv7-based FieldId
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_domain::FieldId;
    ///
    /// let id = FieldId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a FieldId from its UUID string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid field id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Data type of an extraction target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text
    #[default]
    Text,
    /// Numeric value (currency symbols stripped)
    Number,
    /// Calendar date, carried as a `YYYY-MM-DD` string
    Date,
}

impl FieldType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
        }
    }

    /// Parse a field type from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "string" => Some(FieldType::Text),
            "number" | "numeric" => Some(FieldType::Number),
            "date" => Some(FieldType::Date),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid field type: {} (expected text, number or date)", s))
    }
}

/// A validated field name, usable as a JSON object key
///
/// Any text is accepted as long as it is non-empty once trimmed and holds no
/// control characters. Surrounding whitespace is dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Validate and wrap a field name
    ///
    /// # Errors
    /// Returns error if the trimmed name is empty or contains a control
    /// character
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_domain::FieldName;
    ///
    /// assert_eq!(FieldName::new(" Invoice Number ").unwrap().as_str(), "Invoice Number");
    /// assert!(FieldName::new("   ").is_err());
    /// assert!(FieldName::new("line\nbreak").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Field name cannot be empty".to_string());
        }
        if let Some(bad) = trimmed.chars().find(|c| c.is_control()) {
            return Err(format!(
                "Field name '{}' contains control character {:?}",
                trimmed.escape_debug(),
                bad
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FieldName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        FieldName::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A field definition as held by the schema editor
///
/// The name is raw editor input; it is validated when a response schema is
/// built from the field list.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Session-local identifier
    pub id: FieldId,

    /// JSON key for the extracted value
    pub name: String,

    /// Expected data type
    pub field_type: FieldType,

    /// Optional hint for the model (empty when not given)
    pub description: String,
}

impl SchemaField {
    /// Create a new field with a fresh id
    pub fn new(name: impl Into<String>, field_type: FieldType, description: impl Into<String>) -> Self {
        Self {
            id: FieldId::new(),
            name: name.into(),
            field_type,
            description: description.into(),
        }
    }

    /// Create a blank text field, as added by the editor's "add field" action
    pub fn blank() -> Self {
        Self::new("", FieldType::Text, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_id_uniqueness() {
        let a = FieldId::new();
        let b = FieldId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_id_round_trip_string() {
        let id = FieldId::new();
        let parsed = FieldId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_field_type_parsing() {
        assert_eq!(FieldType::parse("TEXT"), Some(FieldType::Text));
        assert_eq!(FieldType::parse("Number"), Some(FieldType::Number));
        assert_eq!(FieldType::parse("date"), Some(FieldType::Date));
        assert_eq!(FieldType::parse("boolean"), None);
        assert!("money".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_serde_lowercase() {
        let json = serde_json::to_string(&FieldType::Number).unwrap();
        assert_eq!(json, "\"number\"");
        let parsed: FieldType = serde_json::from_str("\"date\"").unwrap();
        assert_eq!(parsed, FieldType::Date);
    }

    #[test]
    fn test_field_name_validation() {
        assert!(FieldName::new("nr_umowy").is_ok());
        assert!(FieldName::new("data-umowy").is_ok());
        assert!(FieldName::new("kwota_złotych").is_ok());
        assert!(FieldName::new("Invoice Number").is_ok());
        assert!(FieldName::new("nr.umowy").is_ok());
        assert!(FieldName::new("kwota (PLN)").is_ok());
        assert!(FieldName::new("quote\"").is_ok());
        assert!(FieldName::new("").is_err());
        assert!(FieldName::new(" \t ").is_err());
        assert!(FieldName::new("tab\there").is_err());
        assert_eq!(FieldName::new("  total ").unwrap().as_str(), "total");
    }

    #[test]
    fn test_field_name_deserialize_rejects_invalid() {
        let ok: Result<FieldName, _> = serde_json::from_str("\"total\"");
        assert!(ok.is_ok());
        let bad: Result<FieldName, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_blank_field() {
        let field = SchemaField::blank();
        assert!(field.name.is_empty());
        assert_eq!(field.field_type, FieldType::Text);
        assert!(field.description.is_empty());
    }
}
