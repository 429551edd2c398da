//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the CLI layer.
#[derive(Debug, Error)]
pub enum CliError {
    /// A configured input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Settings file could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    SettingsRead {
        /// Settings path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for the expected schema.
    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        /// Settings path.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A settings value fails validation.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Configuration validation error from the core layer.
    #[error(transparent)]
    Config(#[from] fanchart_core::types::CoreError),

    /// Pipeline failure.
    #[error(transparent)]
    Compute(#[from] fanchart_compute::ComputeError),
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;
