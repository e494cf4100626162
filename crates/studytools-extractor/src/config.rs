//! Configuration for prompt building and generation

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output contract the prompt asks the model to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputContract {
    /// Repeating `QUESTION:` / `ANSWER:` blocks
    Delimited,
    /// `{"flashcards": [{id, question, answer}]}`
    Json,
    /// `{"metadata": {...}, "flashcards": [...]}`
    #[default]
    JsonWithMetadata,
}

/// Configuration for the Generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Source text is cut to this many characters before prompting
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,

    /// Maximum time for a single model call (seconds)
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// Output contract requested from the model
    #[serde(default)]
    pub contract: OutputContract,
}

fn default_max_source_chars() -> usize {
    4000
}

fn default_generation_timeout_secs() -> u64 {
    120
}

impl GeneratorConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_source_chars == 0 {
            return Err("max_source_chars must be greater than 0".to_string());
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_source_chars: default_max_source_chars(),
            generation_timeout_secs: default_generation_timeout_secs(),
            contract: OutputContract::default(),
        }
    }
}
