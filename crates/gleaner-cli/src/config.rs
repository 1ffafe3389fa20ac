//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use gleaner_domain::SchemaTemplate;
use gleaner_extractor::ExtractorConfig;
use gleaner_llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Generative model settings
    #[serde(default)]
    pub model: ModelSettings,

    /// CRM webhook settings
    #[serde(default)]
    pub crm: CrmSettings,

    /// User-defined schema templates, offered after the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<SchemaTemplate>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Generative model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Service base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub name: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// CRM webhook settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrmSettings {
    /// Webhook serving the account list (GET) and accepting results (POST)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".gleaner").join("config.toml"))
    }

    /// Load configuration from a file, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check values that would only fail later, at request time.
    pub fn validate(&self) -> Result<()> {
        self.extractor_config().validate().map_err(CliError::Config)?;

        let mut seen = Vec::new();
        for template in &self.templates {
            if template.id.trim().is_empty() {
                return Err(CliError::Config("Template id cannot be empty".into()));
            }
            if seen.contains(&template.id.as_str()) {
                return Err(CliError::Config(format!("Duplicate template id '{}'", template.id)));
            }
            seen.push(template.id.as_str());
        }
        Ok(())
    }

    /// Built-in templates followed by user-defined ones.
    pub fn all_templates(&self) -> Vec<SchemaTemplate> {
        let mut templates = SchemaTemplate::builtin();
        templates.extend(self.templates.iter().cloned());
        templates
    }

    /// Extractor settings derived from the model section.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            temperature: self.model.temperature,
            extraction_timeout_secs: self.model.timeout_secs,
            ..ExtractorConfig::default()
        }
    }

    /// Configured webhook URL, if any.
    pub fn webhook_url(&self) -> Option<&str> {
        self.crm
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            name: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
