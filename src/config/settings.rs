//! Settings loading and validation.
//!
//! Settings live in a TOML file (by default `~/.kubetools/kubetools.toml`).
//! A missing file is not an error: every section has defaults.
//!
//! # Example
//!
//! ```no_run
//! use kubetools::config::Settings;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (settings, _found) = Settings::load_or_default("kubetools.toml")?;
//!     settings.logging.init(0, false);
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::{LoggingConfig, LOG_FORMATS};
use super::validation::ValidationPolicy;
use crate::domain::deployment::DEFAULT_NAMESPACE;
use crate::domain::naming;
use crate::error::{ConfigError, Result};

/// Settings for `kubetools show`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Namespace assumed for documents that do not set one.
    pub default_namespace: String,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Main settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Validation policy.
    #[serde(default)]
    pub validation: ValidationPolicy,

    #[serde(default)]
    pub show: ShowConfig,
}

impl Settings {
    /// Parse settings from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load settings, falling back to defaults when the file does not exist.
    ///
    /// The flag tells whether a file was found.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::load(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    fn validate(&self) -> Result<()> {
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "logging.level",
            }
            .into());
        }
        if self.validation.allowed_api_versions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "validation.allowed_api_versions",
                reason: "must list at least one apiVersion".to_string(),
            }
            .into());
        }
        if let Err(reason) = naming::check_dns1123_label(&self.show.default_namespace) {
            return Err(ConfigError::InvalidValue {
                field: "show.default_namespace",
                reason,
            }
            .into());
        }
        Ok(())
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "settings",
                reason: e.to_string(),
            }
            .into()
        })
    }
}
