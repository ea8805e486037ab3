use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating engine settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting holds a value outside its allowed range.
    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Could not determine home directory")]
    NoHomeDir,
}
