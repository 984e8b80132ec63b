//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use kinship_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `people_only.json` and `relationships_only.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Fail tree rendering when a relationship names an unknown id
    #[serde(default = "default_true")]
    pub strict_references: bool,

    /// Model host settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Extraction limits
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Model host settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Ollama base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model answering questions
    #[serde(default = "default_answer_model")]
    pub answer_model: String,

    /// Model extracting people from text
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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
    /// Directory for config and REPL history.
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".kinship"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings no command can work with.
    pub fn validate(&self) -> Result<()> {
        if self.llm.endpoint.trim().is_empty() {
            return Err(CliError::Config("llm.endpoint must not be empty".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(CliError::Config(
                "llm.timeout_secs must be greater than 0".into(),
            ));
        }
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            strict_references: true,
            llm: LlmSettings::default(),
            extractor: ExtractorConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            answer_model: default_answer_model(),
            extraction_model: default_extraction_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
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

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_endpoint() -> String {
    kinship_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_answer_model() -> String {
    "llama3".to_string()
}

fn default_extraction_model() -> String {
    "llama2".to_string()
}

fn default_timeout_secs() -> u64 {
    kinship_llm::ollama::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    kinship_llm::ollama::DEFAULT_MAX_RETRIES
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
