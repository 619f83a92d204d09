//! Error types for settings resolution and override loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Root lookup errors
    #[error("project root not found: none of {markers:?} within {depth} parent directories")]
    RootNotFound { markers: Vec<String>, depth: usize },

    #[error("failed to read directory {path} while looking up the project root")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Environment and override loading errors
    #[error("invalid environment: {0}")]
    Environment(String),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Whether this error means the project root could not be located.
    ///
    /// Callers treat these as fatal: every path in the settings hangs off the root.
    pub fn is_unresolved_root(&self) -> bool {
        matches!(self, Self::RootNotFound { .. } | Self::ReadDir { .. })
    }
}
