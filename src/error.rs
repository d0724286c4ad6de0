//! Error types for parqshard
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Nothing in this tool retries: every error is fatal for the operation
//! that produced it, except a missing per-phase input file, which the
//! conversion driver treats as a skip rather than an error.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for parqshard
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Input not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid dataset '{path}': {message}")]
    InvalidDataset { path: PathBuf, message: String },

    #[error("Dataset contains no records")]
    EmptyDataset,

    // ============================================================================
    // Chunk Sizing Errors
    // ============================================================================
    #[error(
        "Estimated record size {estimated_mb:.4} MB exceeds the effective \
         per-file budget of {budget_mb:.2} MB; no chunk layout fits the limit"
    )]
    DegenerateChunkSize { estimated_mb: f64, budget_mb: f64 },

    #[error("Size estimation failed: {message}")]
    SizeEstimation { message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Schema inference failed: {message}")]
    SchemaInference { message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Validation error: {message}")]
    Validation { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a file-not-found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an invalid-dataset error
    pub fn invalid_dataset(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidDataset {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a size-estimation error
    pub fn estimation(message: impl Into<String>) -> Self {
        Self::SizeEstimation {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type alias for parqshard
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::not_found("missing/data.json");
        assert_eq!(err.to_string(), "Input not found: missing/data.json");

        let err = Error::invalid_dataset("bad.json", "top-level value must be an array");
        assert_eq!(
            err.to_string(),
            "Invalid dataset 'bad.json': top-level value must be an array"
        );
    }

    #[test]
    fn test_degenerate_chunk_size_display() {
        let err = Error::DegenerateChunkSize {
            estimated_mb: 12.5,
            budget_mb: 8.1,
        };
        let msg = err.to_string();
        assert!(msg.contains("12.5000 MB"));
        assert!(msg.contains("8.10 MB"));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
