//! Core error types for focushub-core.
//!
//! One thiserror enum per concern, wrapped by [`CoreError`] for callers
//! that only need to report a failure.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focushub-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persisted state errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generation service errors
    #[error("Generation service error: {0}")]
    Generation(#[from] GenerationError),

    /// Challenge session errors
    #[error("Challenge error: {0}")]
    Challenge(#[from] ChallengeError),

    /// Application shell errors
    #[error("{0}")]
    Shell(#[from] ShellError),

    /// Validation errors outside a challenge (blocklist, ledger)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Persisted state errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Value could not be encoded as JSON
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Generation service failures. Every variant is a recoverable service
/// failure: the caller shows it and offers retry or cancellation.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend answered but the payload does not match the operation schema
    #[error("Malformed {operation} response: {message}")]
    Schema {
        operation: &'static str,
        message: String,
    },

    /// Backend answered without any candidate text
    #[error("Empty {0} response")]
    EmptyResponse(&'static str),

    /// No API key available
    #[error("No API key configured (set GEMINI_API_KEY or run `focushub auth set-key`)")]
    MissingApiKey,

    /// Configured endpoint is not a valid URL
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors raised by a challenge session in response to user actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    /// User input rejected by a local check. Transient.
    #[error("{0}")]
    Validation(String),

    /// Action does not apply to the current phase
    #[error("'{action}' is not available during the {phase} phase")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },

    /// A generation request is still outstanding
    #[error("A request is already pending")]
    Busy,

    /// Phase content (problem or prompt) has not loaded
    #[error("Phase content has not loaded; retry or cancel")]
    ContentMissing,

    /// Retry requested without a failed request to repeat
    #[error("Nothing to retry")]
    NothingToRetry,

    /// Proceed requested before the session completed
    #[error("Challenge is not completed yet")]
    NotCompleted,
}

/// Application shell errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// Session-scoped action with no session open
    #[error("No challenge is in progress")]
    NoActiveSession,

    /// Only one challenge may run at a time
    #[error("A challenge for '{0}' is already in progress")]
    SessionActive(String),

    /// Unknown blocklist entry id
    #[error("Unknown entry: {0}")]
    UnknownEntry(String),
}

/// Validation errors for settings, blocklist and ledger input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
