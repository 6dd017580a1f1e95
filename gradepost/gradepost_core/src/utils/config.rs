//! Configuration for the post-policy subsystem.
//!
//! Configuration is read from TOML. Every key is optional; omitted keys take
//! the defaults below.
//!
//! ```toml
//! feature_setting_key = "post_policies_enabled"
//! default_post_manually = false
//! max_create_attempts = 3
//! log_level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::LogLevel;

/// Setting key the feature toggle reads and writes.
pub const DEFAULT_FEATURE_SETTING_KEY: &str = "post_policies_enabled";

/// Attempts made to win a contested scope before giving up.
pub const DEFAULT_MAX_CREATE_ATTEMPTS: u32 = 3;

/// Configuration for the post-policy subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostPolicyConfig {
    /// Name of the setting backing the feature toggle.
    pub feature_setting_key: String,

    /// `post_manually` value given to lazily created course defaults.
    pub default_post_manually: bool,

    /// Attempts made when concurrent writers race on the same scope.
    pub max_create_attempts: u32,

    /// Level used for policy subsystem logging.
    pub log_level: LogLevel,
}

impl Default for PostPolicyConfig {
    fn default() -> Self {
        Self {
            feature_setting_key: DEFAULT_FEATURE_SETTING_KEY.to_string(),
            default_post_manually: false,
            max_create_attempts: DEFAULT_MAX_CREATE_ATTEMPTS,
            log_level: LogLevel::Info,
        }
    }
}

impl PostPolicyConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<()> {
        if self.feature_setting_key.trim().is_empty() {
            return Err(Error::Config(
                "feature_setting_key must not be empty".to_string(),
            ));
        }
        if self.max_create_attempts == 0 {
            return Err(Error::Config(
                "max_create_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
