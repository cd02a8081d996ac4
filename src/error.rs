//! Configuration error types
//!
//! The simulation itself is total; only loading tuning/settings can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the expected shape
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but make no sense for the game
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Read a JSON config file into `T`
pub(crate) fn load_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}
