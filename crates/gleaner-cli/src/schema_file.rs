//! Schema files for one-shot commands.
//!
//! A schema file lists fields the same way a config template does:
//!
//! ```toml
//! [[fields]]
//! name = "total"
//! type = "number"
//! description = "Gross total"
//! ```
//!
//! Files ending in `.json` are read as `{"fields": [...]}`.

use crate::error::Result;
use gleaner_domain::{Schema, SchemaField, TemplateField};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    fields: Vec<TemplateField>,
}

/// Load a schema from a TOML or JSON file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let contents = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let file: SchemaFile = if is_json {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };

    Ok(Schema::from_fields(
        file.fields
            .into_iter()
            .map(|f| SchemaField::new(f.name, f.field_type, f.description))
            .collect(),
    ))
}
