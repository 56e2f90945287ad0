//! Unified path management for IRENO assistant files.
//!
//! All locations are resolved through the `dirs` crate so they follow the
//! platform conventions (XDG on Linux, `Library` on macOS, `AppData` on
//! Windows).
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/ireno/             # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/ireno/        # Data directory
//! ├── store/                   # Key-value store (one file per key)
//! ├── exports/                 # Conversation exports
//! └── logs/                    # Rolling application logs
//!     └── ireno.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "ireno";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

/// Platform paths for the assistant.
pub struct IrenoPaths;

impl IrenoPaths {
    /// Returns the configuration directory (e.g., `~/.config/ireno/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the data directory (e.g., `~/.local/share/ireno/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::DirNotFound("data"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default directory of the file-backed key-value store.
    pub fn store_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store"))
    }

    /// Default directory for conversation exports.
    ///
    /// Prefers the user's download directory, like a browser download would.
    pub fn export_dir() -> Result<PathBuf, PathError> {
        match dirs::download_dir() {
            Some(dir) => Ok(dir),
            None => Ok(Self::data_dir()?.join("exports")),
        }
    }

    /// Default directory for rolling log files.
    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
