//! Codec and persistence configuration.

use crate::dictionary::adaptive::MAX_CUSTOM_WORDS;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Encoder settings.
///
/// Decoding never depends on these: every payload carries its own
/// custom word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Upper bound on custom words per token (at most 36).
    pub max_custom_words: usize,

    /// Run the adaptive dictionary stage.
    pub adaptive: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_custom_words: MAX_CUSTOM_WORDS,
            adaptive: true,
        }
    }
}

impl CodecConfig {
    /// Configuration with the adaptive stage switched off
    pub fn builtin_only() -> Self {
        Self {
            adaptive: false,
            ..Default::default()
        }
    }

    /// Number of custom words the encoder may select
    pub fn custom_word_limit(&self) -> usize {
        if self.adaptive {
            self.max_custom_words.min(MAX_CUSTOM_WORDS)
        } else {
            0
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_custom_words > MAX_CUSTOM_WORDS {
            return Err(CodecError::InvalidConfig(format!(
                "max_custom_words {} exceeds {}",
                self.max_custom_words, MAX_CUSTOM_WORDS
            )));
        }
        Ok(())
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&read_config(path.as_ref())?)
    }
}

/// Field names and query parameter used by the scenario store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Query parameter carrying the token.
    pub query_param: String,

    /// Field stamped with the UI mode on save.
    pub mode_field: String,

    /// Field naming the configuration variant of a scenario.
    pub variant_field: String,

    /// Variant that needs no activation.
    pub default_variant: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            query_param: crate::QUERY_PARAM.to_string(),
            mode_field: "uiMode".to_string(),
            variant_field: "configVariant".to_string(),
            default_variant: "default".to_string(),
        }
    }
}

impl PersistenceConfig {
    /// Check that every name is usable
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("query_param", &self.query_param),
            ("mode_field", &self.mode_field),
            ("variant_field", &self.variant_field),
        ];
        for (what, name) in names {
            if name.is_empty() {
                return Err(CodecError::InvalidConfig(format!("{} is empty", what)));
            }
        }
        if self
            .query_param
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        {
            return Err(CodecError::InvalidConfig(format!(
                "query_param '{}' needs percent-encoding",
                self.query_param
            )));
        }
        Ok(())
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&read_config(path.as_ref())?)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CodecError::InvalidConfig(format!("{}: {}", path.display(), e)))
}
