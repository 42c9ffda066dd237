//! Error types for SparkConf
//!
//! Every failure of the sizing core is reported as a typed error; no
//! numeric sentinel ever stands in for a failed computation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SparkConf operations
#[derive(Error, Debug)]
pub enum SparkConfError {
    /// Memory string with an unparsable coefficient or unknown unit
    #[error("Invalid memory format '{input}': {reason}")]
    InvalidMemoryFormat { input: String, reason: String },

    /// Non-positive node or core counts, or missing topology fields
    #[error("Invalid cluster topology: {0}")]
    InvalidTopology(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error while reading an input file
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Topology file could not be decoded
    #[error("Topology file error: {0}")]
    TopologyFile(String),

    /// Host or scheduler detection produced no usable value
    #[error("Detection error: {0}")]
    DetectionError(String),
}

impl SparkConfError {
    /// Create an invalid memory format error
    pub fn invalid_memory(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMemoryFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid topology error
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error was caused by bad user input to the sizing core
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMemoryFormat { .. } | Self::InvalidTopology(_)
        )
    }
}

/// Result type alias for SparkConf operations
pub type Result<T> = std::result::Result<T, SparkConfError>;

impl From<serde_json::Error> for SparkConfError {
    fn from(err: serde_json::Error) -> Self {
        SparkConfError::TopologyFile(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SparkConfError::io(path, e))
    }
}
