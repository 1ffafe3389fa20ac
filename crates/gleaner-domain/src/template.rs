//! Schema templates - reusable field sets appended to the editor

use crate::field::{FieldType, SchemaField};
use serde::{Deserialize, Serialize};

/// A named, reusable set of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaTemplate {
    /// Stable identifier used to select the template
    pub id: String,

    /// Human-readable label
    pub label: String,

    /// Fields appended when the template is applied
    pub fields: Vec<TemplateField>,
}

/// A field definition inside a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    /// JSON key
    pub name: String,

    /// Data type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Optional hint for the model
    #[serde(default)]
    pub description: String,
}

impl SchemaTemplate {
    /// Templates shipped with the application
    pub fn builtin() -> Vec<SchemaTemplate> {
        vec![SchemaTemplate {
            id: "test-template".to_string(),
            label: "Test template".to_string(),
            fields: vec![
                TemplateField {
                    name: "nr_umowy".to_string(),
                    field_type: FieldType::Number,
                    description: "Contract number".to_string(),
                },
                TemplateField {
                    name: "data_umowy".to_string(),
                    field_type: FieldType::Date,
                    description: "Contract signing date".to_string(),
                },
            ],
        }]
    }

    /// Create fresh schema fields (new ids) from this template
    pub fn instantiate(&self) -> Vec<SchemaField> {
        self.fields
            .iter()
            .map(|tf| SchemaField::new(tf.name.clone(), tf.field_type, tf.description.clone()))
            .collect()
    }

    /// Find a template by id among `templates`
    pub fn find<'a>(templates: &'a [SchemaTemplate], id: &str) -> Option<&'a SchemaTemplate> {
        templates.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_template() {
        let templates = SchemaTemplate::builtin();
        let template = SchemaTemplate::find(&templates, "test-template").unwrap();
        assert_eq!(template.fields.len(), 2);
        assert_eq!(template.fields[0].field_type, FieldType::Number);
        assert_eq!(template.fields[1].field_type, FieldType::Date);
    }

    #[test]
    fn test_instantiate_generates_new_ids() {
        let template = &SchemaTemplate::builtin()[0];
        let first = template.instantiate();
        let second = template.instantiate();
        assert_eq!(first[0].name, second[0].name);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_template_field_defaults() {
        let field: TemplateField = serde_json::from_str(r#"{"name": "vendor"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::Text);
        assert!(field.description.is_empty());
    }
}
