//! Schema module - the ordered, session-scoped list of extraction targets

use crate::field::{FieldId, FieldName, FieldType, SchemaField};
use crate::response_schema::FieldSpec;
use crate::template::SchemaTemplate;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised when a field list cannot be turned into a response schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No fields defined
    #[error("Please define at least one field to extract.")]
    Empty,

    /// A field name is not a usable JSON key
    #[error("Invalid field name at position {position}: {reason}")]
    InvalidName {
        /// 1-based position in the editor
        position: usize,
        /// Why the name was rejected
        reason: String,
    },

    /// Two fields share a name
    #[error("Field name '{0}' is used more than once")]
    DuplicateName(String),

    /// Editor addressed a field that does not exist
    #[error("Unknown field: {0}")]
    UnknownField(FieldId),
}

/// Ordered list of field definitions, owned by the session controller
///
/// Nothing is persisted; the list lives as long as its owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema from existing field definitions
    pub fn from_fields(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// Fields in editor order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are defined
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by id
    pub fn get(&self, id: FieldId) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Append a blank text field and return its id
    pub fn add_blank(&mut self) -> FieldId {
        let field = SchemaField::blank();
        let id = field.id;
        self.fields.push(field);
        id
    }

    /// Append a field definition and return its id
    pub fn push(&mut self, field: SchemaField) -> FieldId {
        let id = field.id;
        self.fields.push(field);
        id
    }

    /// Rename a field
    pub fn set_name(&mut self, id: FieldId, name: impl Into<String>) -> Result<(), SchemaError> {
        self.field_mut(id)?.name = name.into();
        Ok(())
    }

    /// Change a field's data type
    pub fn set_type(&mut self, id: FieldId, field_type: FieldType) -> Result<(), SchemaError> {
        self.field_mut(id)?.field_type = field_type;
        Ok(())
    }

    /// Change a field's description
    pub fn set_description(
        &mut self,
        id: FieldId,
        description: impl Into<String>,
    ) -> Result<(), SchemaError> {
        self.field_mut(id)?.description = description.into();
        Ok(())
    }

    /// Remove a field by id
    pub fn remove(&mut self, id: FieldId) -> Option<SchemaField> {
        let index = self.fields.iter().position(|f| f.id == id)?;
        Some(self.fields.remove(index))
    }

    /// Remove every field
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Append fresh copies of a template's fields
    ///
    /// Each application creates new ids, so applying the same template twice
    /// appends its fields twice.
    pub fn apply_template(&mut self, template: &SchemaTemplate) -> usize {
        let before = self.fields.len();
        self.fields.extend(template.instantiate());
        self.fields.len() - before
    }

    /// Validate the field list for use in a request
    ///
    /// # Errors
    /// - [`SchemaError::Empty`] when no fields are defined
    /// - [`SchemaError::InvalidName`] when a name is not a usable JSON key
    /// - [`SchemaError::DuplicateName`] when two fields share a name
    pub fn validate(&self) -> Result<Vec<FieldSpec>, SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        let mut specs = Vec::with_capacity(self.fields.len());

        for (idx, field) in self.fields.iter().enumerate() {
            let name = FieldName::new(field.name.as_str()).map_err(|reason| SchemaError::InvalidName {
                position: idx + 1,
                reason,
            })?;
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateName(name.to_string()));
            }
            specs.push(FieldSpec {
                name,
                field_type: field.field_type,
                description: field.description.trim().to_string(),
            });
        }

        Ok(specs)
    }

    fn field_mut(&mut self, id: FieldId) -> Result<&mut SchemaField, SchemaError> {
        self.fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(SchemaError::UnknownField(id))
    }
}
