//! # Configuration Error Types

use std::io;
use std::path::PathBuf;

use starfield_procedural::GenerationError;
use thiserror::Error;

/// Errors raised while loading configuration or writing output.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The document is not valid TOML for a [`StarfieldConfig`](crate::StarfieldConfig).
    #[error("invalid configuration document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    /// The document parsed but describes parameters the generator rejects.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] GenerationError),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
