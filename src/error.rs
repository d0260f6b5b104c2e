//! Error types for the dashboard engine.

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the action-item store / telemetry endpoints.
///
/// Authorization rejections arrive as `Rejected` like any other
/// non-success response; the engine treats them uniformly as a logged
/// no-op, never as fatal.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Request to {endpoint} failed: {reason}")]
    Http { endpoint: String, reason: String },

    #[error("Store rejected {endpoint} request: {message}")]
    Rejected { endpoint: String, message: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lifecycle command errors.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Action item {id} not found")]
    NotFound { id: String },

    #[error("Cannot {command} item {id} while {from}")]
    InvalidTransition {
        id: String,
        from: String,
        command: String,
    },

    #[error("Submission for item {id} has no data")]
    EmptySubmission { id: String },
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
