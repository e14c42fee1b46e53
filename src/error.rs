//! Custom error types for bdd-lint.
//!
//! The detectors themselves never fail; errors only come from loading a
//! corpus or a configuration file.

use std::path::PathBuf;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing an analysis run.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to decode a serialized feature corpus.
    #[error("Failed to load corpus {path}: {source}")]
    Corpus {
        /// Path to the corpus file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Corpus file exceeds the size the loader will read.
    #[error("Corpus file {path} too large: {size} bytes (max: {max} bytes)")]
    CorpusTooLarge {
        /// Path to the corpus file.
        path: PathBuf,
        /// Actual file size in bytes.
        size: u64,
        /// Largest accepted size in bytes.
        max: u64,
    },

    /// Failed to read or access a file.
    #[error("IO error for {path}: {source}")]
    Io {
        /// Path to the file that caused the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration is present but unusable.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Configuration file is not valid TOML for the expected schema.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a corpus decoding error for a specific file.
    pub fn corpus(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corpus {
            path: path.into(),
            source,
        }
    }

    /// Create an oversized-corpus error for a specific file.
    pub fn corpus_too_large(path: impl Into<PathBuf>, size: u64, max: u64) -> Self {
        Self::CorpusTooLarge {
            path: path.into(),
            size,
            max,
        }
    }

    /// Create an IO error for a specific file.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::corpus("/path/to/corpus.json", source);
        let msg = err.to_string();
        assert!(msg.contains("/path/to/corpus.json"));
        assert!(msg.contains("EOF"));
    }

    #[test]
    fn test_corpus_too_large_display() {
        let err = Error::corpus_too_large("/path/to/huge.json", 2048, 1024);
        assert_eq!(
            err.to_string(),
            "Corpus file /path/to/huge.json too large: 2048 bytes (max: 1024 bytes)"
        );
        assert!(!matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/path/to/missing.json", io_err);
        let msg = err.to_string();
        assert!(msg.contains("/path/to/missing.json"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("invalid severity level");
        assert!(err.to_string().contains("invalid severity level"));
    }

    #[test]
    fn test_toml_from() {
        let toml_err = toml::from_str::<toml::Table>("invalid { toml").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::Toml(_)));
    }
}
