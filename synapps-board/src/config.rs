//! Sync configuration loaded with figment
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. Environment variables prefixed with `SYNAPPS_`

use crate::error::ConfigError;
use crate::reconcile::InstructionScope;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SYNAPPS_";

/// How reconciled gestures are persisted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Which entities of a touched list get an update instruction
    pub instruction_scope: InstructionScope,
    /// Per-call timeout for persistence calls; `None` waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl SyncConfig {
    /// Load from defaults and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load from defaults, a TOML file, then the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "loading sync config file");

        let figment = Figment::new()
            .merge(Serialized::defaults(SyncConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::extract(figment)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(SyncConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: SyncConfig = figment.extract()?;
        debug!(?config, "sync config loaded");
        Ok(config)
    }

    /// Set the instruction scope
    pub fn with_instruction_scope(mut self, scope: InstructionScope) -> Self {
        self.instruction_scope = scope;
        self
    }

    /// Set the per-call timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The per-call timeout, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_defaults() {
        let config = SyncConfig::load().unwrap();
        assert_eq!(config.instruction_scope, InstructionScope::Full);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    #[serial]
    fn test_env_overrides_defaults() {
        std::env::set_var("SYNAPPS_INSTRUCTION_SCOPE", "changed");
        std::env::set_var("SYNAPPS_REQUEST_TIMEOUT_MS", "250");

        let config = SyncConfig::load();

        std::env::remove_var("SYNAPPS_INSTRUCTION_SCOPE");
        std::env::remove_var("SYNAPPS_REQUEST_TIMEOUT_MS");

        let config = config.unwrap();
        assert_eq!(config.instruction_scope, InstructionScope::Changed);
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_request_timeout_saturates() {
        let config = SyncConfig::default().with_request_timeout(Duration::MAX);
        assert_eq!(config.request_timeout_ms, Some(u64::MAX));

        let config = SyncConfig::default().with_request_timeout(Duration::from_millis(1500));
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    #[serial]
    fn test_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("synapps.toml");
        fs::write(&path, "instruction_scope = \"changed\"\n").unwrap();

        let config = SyncConfig::load_from(&path).unwrap();
        assert_eq!(config.instruction_scope, InstructionScope::Changed);
        assert!(config.request_timeout_ms.is_none());
    }

    #[test]
    #[serial]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = SyncConfig::load_from(temp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    #[serial]
    fn test_invalid_scope_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("synapps.toml");
        fs::write(&path, "instruction_scope = \"sometimes\"\n").unwrap();

        let result = SyncConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
