use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context as _};
use serde::{Deserialize, Serialize};

use crate::context::ContextBuilder;
use crate::Context;

fn default_cache_period_secs() -> u64 {
    30 * 60
}

/// A TOML-deserializable mirror of the scalar [`ContextBuilder`] inputs.
///
/// Collaborators with behavior (codec, compression, factories, repository
/// context) aren't data and so aren't configuration; [`ContextConfig::into_builder`]
/// seeds a builder with everything this type *can* express, leaving those
/// collaborators for the caller to attach before calling `build()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Product subject every generated/verified license must match.
    pub subject: String,
    /// Default keystore type new manager builders inherit.
    pub keystore_type: String,
    /// Default encryption algorithm name.
    pub encryption_algorithm: String,
    /// Cache TTL, in seconds.
    #[serde(default = "default_cache_period_secs")]
    pub cache_period_secs: u64,
}

impl ContextConfig {
    /// Environment variable that, if set, overrides the config file path.
    pub const ENV_CONFIG_PATH: &'static str = "LICENSURE_CONFIG";

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: ContextConfig =
            toml::from_str(content).with_context(|| "failed to parse licensure context config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        Self::from_str(&contents)
    }

    /// Validate structural invariants beyond what serde already enforces.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.subject.trim().is_empty() {
            return Err(anyhow!("subject must be non-empty"));
        }
        if self.keystore_type.trim().is_empty() {
            return Err(anyhow!("keystore_type must be non-empty"));
        }
        if self.encryption_algorithm.trim().is_empty() {
            return Err(anyhow!("encryption_algorithm must be non-empty"));
        }
        Ok(())
    }

    /// Seed a [`ContextBuilder`] with this configuration's scalar fields.
    #[must_use]
    pub fn into_builder(self) -> ContextBuilder {
        Context::builder()
            .subject(self.subject)
            .keystore_type(self.keystore_type)
            .encryption_algorithm(self.encryption_algorithm)
            .cache_period(Duration::from_secs(self.cache_period_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        subject = "App"
        keystore_type = "raw-ed25519"
        encryption_algorithm = "AES-256-GCM"
        cache_period_secs = 60
    "#;

    #[test]
    fn parses_a_well_formed_document() {
        let config = ContextConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.subject, "App");
        assert_eq!(config.cache_period_secs, 60);
    }

    #[test]
    fn cache_period_defaults_when_absent() {
        let config = ContextConfig::from_str(
            r#"
            subject = "App"
            keystore_type = "raw-ed25519"
            encryption_algorithm = "AES-256-GCM"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_period_secs, 30 * 60);
    }

    #[test]
    fn rejects_empty_subject() {
        let config = ContextConfig::from_str(
            r#"
            subject = ""
            keystore_type = "raw-ed25519"
            encryption_algorithm = "AES-256-GCM"
            "#,
        );
        assert!(config.is_err());
    }
}
