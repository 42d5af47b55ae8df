//! Settings loaded from TOML.
//!
//! ```toml
//! [normalizer]
//! default_limit = 25
//!
//! [audit]
//! enabled = true
//! capacity = 5000
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audit::AuditConfig;
use crate::error::{Error, Result};
use crate::response::NormalizerConfig;

/// Top-level settings for a [`GuardedPipeline`](crate::web::GuardedPipeline).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Response normalization
    pub normalizer: NormalizerConfig,
    /// Decision auditing
    pub audit: AuditConfig,
}

impl Settings {
    /// Reads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read, is not valid TOML,
    /// or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
            source: Some(Box::new(e)),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on parse or validation failure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).map_err(|e| Error::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `normalizer.default_limit` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.normalizer.default_limit == 0 {
            return Err(Error::config(
                "normalizer.default_limit must be greater than 0",
            ));
        }
        Ok(())
    }
}
