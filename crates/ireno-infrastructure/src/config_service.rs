//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `~/.config/ireno/config.toml`, then applies
//! environment overrides. A missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use ireno_core::config::AppConfig;
use ireno_core::error::{IrenoError, Result};

use crate::paths::IrenoPaths;

/// Overrides `backend.base_url`.
pub const ENV_BACKEND_URL: &str = "IRENO_BACKEND_URL";
/// Overrides `storage.directory`.
pub const ENV_STATE_DIR: &str = "IRENO_STATE_DIR";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "IRENO_LOG";

/// Loads the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// A service reading the platform config file.
    pub fn new() -> Result<Self> {
        let path = IrenoPaths::config_file().map_err(|e| IrenoError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// A service reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (defaults if absent) and applies environment overrides.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_file(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Writes `config` to the file, creating the parent directory.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

fn apply_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(ENV_BACKEND_URL) {
        config.backend.base_url = url;
    }
    if let Some(dir) = lookup(ENV_STATE_DIR) {
        config.storage.directory = Some(dir);
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
}
