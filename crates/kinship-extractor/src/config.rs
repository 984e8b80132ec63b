//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Maximum already-recorded people listed in the prompt
    pub known_people_limit: usize,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_text_length == 0 {
            return Err(ExtractorError::Config(
                "max_text_length must be greater than 0".to_string(),
            ));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "extraction_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_text_length: 20_000,
            known_people_limit: 100,
            extraction_timeout_secs: 120,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: short texts, short timeout, small prompt
    pub fn aggressive() -> Self {
        Self {
            max_text_length: 5_000,
            known_people_limit: 25,
            extraction_timeout_secs: 60,
        }
    }

    /// Lenient preset: long texts and a slow model
    pub fn lenient() -> Self {
        Self {
            max_text_length: 50_000,
            known_people_limit: 500,
            extraction_timeout_secs: 300,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
