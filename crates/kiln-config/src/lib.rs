//! Build configuration for Kiln models, read from TOML.
//!
//! Every key is optional; an empty document yields [`ModelConfig::default`].

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// ModelConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub discriminator: DiscriminatorConfig,
    pub dispatch: DispatchConfig,
}

impl ModelConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = fs::read_to_string(path)?;

        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.discriminator.validate()?;
        self.dispatch.validate()
    }
}

///
/// DiscriminatorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscriminatorConfig {
    /// Register the discriminator convention.
    pub enabled: bool,

    /// Name of the shadow property declared on hierarchy roots.
    pub property_name: String,

    /// Provider side table the discriminator attributes live in.
    pub provider: String,
}

impl DiscriminatorConfig {
    pub const DEFAULT_PROPERTY_NAME: &str = "Discriminator";
    pub const DEFAULT_PROVIDER: &str = "document";

    fn validate(&self) -> Result<(), ConfigError> {
        check_identifier("discriminator.property_name", &self.property_name)?;
        check_identifier("discriminator.provider", &self.provider)
    }
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            property_name: Self::DEFAULT_PROPERTY_NAME.to_string(),
            provider: Self::DEFAULT_PROVIDER.to_string(),
        }
    }
}

///
/// DispatchConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Maximum nesting of convention events.
    pub max_depth: usize,
}

impl DispatchConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

// non-empty, ASCII, no whitespace
fn check_identifier(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{key} must not be empty")));
    }
    if !value.is_ascii() || value.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(ConfigError::Invalid(format!(
            "{key} must be ASCII without whitespace, got '{value}'"
        )));
    }

    Ok(())
}
