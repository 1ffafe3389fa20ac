//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use gleaner_domain::{Account, AggregatedResult, CrmStatus, ExtractedItem, Schema, SchemaTemplate};
use gleaner_extractor::SourceFile;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Shown for a field the model could not find
pub const NOT_FOUND: &str = "Not found";

/// Shown for a missing source
pub const NO_SOURCE: &str = "-";

/// Display text for an extracted value
pub fn display_value(item: &ExtractedItem) -> String {
    match &item.value {
        Some(value) if !value.is_blank() => value.to_string(),
        _ => NOT_FOUND.to_string(),
    }
}

/// Display text for an extracted source
pub fn display_source(item: &ExtractedItem) -> &str {
    item.source.as_deref().unwrap_or(NO_SOURCE)
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an extraction result.
    pub fn format_result(&self, result: &AggregatedResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => Ok(self.format_result_table(result)),
            OutputFormat::Quiet => Ok(self.format_result_quiet(result)),
        }
    }

    fn format_result_table(&self, result: &AggregatedResult) -> String {
        if let Some(message) = result.error_message() {
            return self.error(message);
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value", "Source"]);
        for (name, item) in result.data().iter() {
            builder.push_record([
                name.to_string(),
                display_value(item),
                display_source(item).to_string(),
            ]);
        }

        self.render(builder)
    }

    fn format_result_quiet(&self, result: &AggregatedResult) -> String {
        if let Some(message) = result.error_message() {
            return message.to_string();
        }

        result
            .data()
            .iter()
            .map(|(name, item)| {
                let value = item.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
                format!("{}={}", name, value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the schema being edited.
    pub fn format_schema(&self, schema: &Schema) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let fields: Vec<_> = schema
                    .fields()
                    .iter()
                    .map(|f| json!({"name": f.name, "type": f.field_type, "description": f.description}))
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({ "fields": fields }))?)
            }
            OutputFormat::Quiet => Ok(schema
                .fields()
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if schema.is_empty() {
                    return Ok(self.warning("No fields defined."));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Name", "Type", "Description"]);
                for (idx, field) in schema.fields().iter().enumerate() {
                    builder.push_record([
                        (idx + 1).to_string(),
                        field.name.clone(),
                        field.field_type.to_string(),
                        field.description.clone(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the queued file list.
    pub fn format_files(&self, files: &[SourceFile]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = files
                    .iter()
                    .map(|f| json!({"name": f.name, "media_type": f.resolved_media_type()}))
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if files.is_empty() {
                    return Ok(self.warning("No files added."));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Name", "Type"]);
                for (idx, file) in files.iter().enumerate() {
                    builder.push_record([
                        (idx + 1).to_string(),
                        file.name.clone(),
                        file.resolved_media_type(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the CRM account list, marking the selected account.
    pub fn format_accounts(&self, accounts: &[Account], selected: Option<&str>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(accounts)?),
            OutputFormat::Quiet => Ok(accounts
                .iter()
                .map(|a| a.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if accounts.is_empty() {
                    return Ok(self.warning("No accounts found."));
                }
                let mut builder = Builder::default();
                builder.push_record(["", "ID", "Name"]);
                for account in accounts {
                    let marker = if selected == Some(account.id.as_str()) { "*" } else { "" };
                    builder.push_record([marker, account.id.as_str(), account.name.as_str()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format schema templates.
    pub fn format_templates(&self, templates: &[SchemaTemplate]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(templates)?),
            OutputFormat::Quiet => Ok(templates
                .iter()
                .map(|t| t.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Label", "Fields"]);
                for template in templates {
                    let fields = template
                        .fields
                        .iter()
                        .map(|f| format!("{} ({})", f.name, f.field_type))
                        .collect::<Vec<_>>()
                        .join(", ");
                    builder.push_record([template.id.clone(), template.label.clone(), fields]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a CRM submission status.
    pub fn crm_status(&self, status: CrmStatus) -> String {
        match status {
            CrmStatus::Idle => self.info("Not sent"),
            CrmStatus::Success => self.success("Sent to CRM"),
            CrmStatus::Error => self.error("Sending to CRM failed; you can try again"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
