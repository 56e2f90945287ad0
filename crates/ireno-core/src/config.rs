//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! field has a default so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use crate::storage::StorageKeys;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Where the assistant backend lives.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    /// Per-request timeout. A request that exceeds it is treated as a
    /// backend failure.
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Durable store settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory of the file-backed store. `None` uses the platform data dir.
    pub directory: Option<String>,
    pub state_key: String,
    pub legacy_key: String,
    /// Upper bound on the bytes held by the store; `None` means unbounded.
    pub quota_bytes: Option<u64>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            directory: None,
            state_key: StorageKeys::DEFAULT_STATE_KEY.to_string(),
            legacy_key: StorageKeys::DEFAULT_LEGACY_KEY.to_string(),
            quota_bytes: Some(5 * 1024 * 1024),
        }
    }
}

impl StorageSettings {
    pub fn keys(&self) -> StorageKeys {
        StorageKeys {
            state_key: self.state_key.clone(),
            legacy_key: self.legacy_key.clone(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Directory for rolling log files. `None` uses the platform data dir.
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://ops.internal:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "http://ops.internal:8080");
        assert_eq!(config.backend.timeout_secs, 60);
        assert_eq!(config.storage, StorageSettings::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_storage_keys() {
        let keys = StorageSettings::default().keys();
        assert_eq!(keys, StorageKeys::default());
    }
}
