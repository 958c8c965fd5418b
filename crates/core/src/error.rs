//! Error types for autowriter operations.
//!
//! This module defines the main error type [`AutowriterError`] which covers
//! failures at the LLM and CMS boundaries, template rendering, configuration
//! and preset I/O. Structural problems found in generated markup are *not*
//! errors; they are reported as [`crate::StructuralWarning`] values.
//!
//! # Example
//!
//! ```rust
//! use autowriter_core::{AutowriterError, Result};
//!
//! fn require_keyword(keyword: &str) -> Result<&str> {
//!     if keyword.trim().is_empty() {
//!         return Err(AutowriterError::MissingInput("keyword"));
//!     }
//!     Ok(keyword.trim())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the generation and publishing pipeline.
#[derive(Error, Debug)]
pub enum AutowriterError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The LLM did not return usable text.
    ///
    /// `body` holds the truncated response body so the caller can show it
    /// to the user. There is no automatic retry.
    #[error("Generation failed with status {status}: {body}")]
    Generation { status: u16, body: String },

    /// The CMS answered with a non-success status.
    ///
    /// Raised by every WordPress call; `body` is truncated to 1000 characters.
    #[error("WordPress request failed with status {status}: {body}")]
    Publish { status: u16, body: String },

    /// A prompt template is malformed or a slot has no value.
    #[error("Template error: {0}")]
    Template(String),

    /// A required pipeline input is empty.
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    /// Settings errors.
    ///
    /// Returned when the settings file cannot be parsed or a site is unknown.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// JSON encoding or decoding errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AutowriterError {
    fn from(err: serde_json::Error) -> Self {
        AutowriterError::Serialization(err.to_string())
    }
}

/// Result type alias for AutowriterError.
pub type Result<T> = std::result::Result<T, AutowriterError>;

/// Truncates a response body to `max_chars` characters for error reporting.
pub(crate) fn truncate_body(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
