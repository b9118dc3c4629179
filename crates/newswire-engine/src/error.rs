//! Error types for the engine.
//!
//! Only setup can fail: validating configuration, reading files and decoding
//! document records. Scoring, classification and clustering are total.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while reading documents or training data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file did not contain a valid document record.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An input path that must be a directory is not one.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur while setting up an engine run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input could not be loaded.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = IngestError::io(
            "/data/a.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to read /data/a.json: gone");
    }

    #[test]
    fn engine_error_is_transparent() {
        let err: EngineError = IngestError::NotADirectory("/tmp/x".into()).into();
        assert_eq!(err.to_string(), "not a directory: /tmp/x");
    }
}
