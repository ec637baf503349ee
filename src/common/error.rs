//! Error types for the harness
//!
//! Connection and assertion problems are recorded per test case and never
//! abort a run; only setup-level failures do.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Connection Errors ===
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    // === Assertion Errors ===
    #[error("Assertion failed: expected {expected}, got {actual}")]
    AssertionFailed { expected: String, actual: String },

    // === Setup Errors ===
    #[error("Setup aborted: {0}")]
    SetupAbort(String),

    #[error("Server under test not ready after {0} seconds")]
    ReadyTimeout(u64),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an assertion failure with expected/actual detail
    pub fn assertion_failed(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::AssertionFailed {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// Setup-level aborts exit with 2 so callers can tell "the harness never
    /// got to run" apart from "cases ran and failed" (exit 1).
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::SetupAbort(_) | Error::ReadyTimeout(_) => 2,
            _ => 1,
        }
    }
}
