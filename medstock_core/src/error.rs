//! Error types for the medstock_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for medstock_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Medication store exists but cannot be read back
    #[error("Medication store error: {0}")]
    Store(String),

    /// Last-run date file exists but does not hold a date
    #[error("Last-run date error: {0}")]
    LastRun(String),

    /// Notification provider answered with a non-success status
    #[error("Notification rejected with status {status}: {body}")]
    Notify { status: u16, body: String },

    /// Bad user input (index out of range, unknown action, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
