//! Unified error handling
//!
//! Application-level error type shared by every service in the engine:
//! - [`AppError`] - application error enum
//! - [`AppResult`] - result alias
//!
//! Validation and transaction errors propagate to the caller for
//! user-visible messaging; badge recomputation errors are contained by the
//! detached task that runs them and only ever reach the logger.

use thiserror::Error;

/// Application error enum
///
/// | Variant | Meaning |
/// |---------|---------|
/// | `Validation` | input rejected before any write; message lists every violated constraint |
/// | `NotFound` | a referenced document does not exist |
/// | `Conflict` | a document that must not exist already does |
/// | `Transaction` | the store transaction failed (contention retries exhausted) |
/// | `Database` | store-level failure outside a transaction |
/// | `Internal` | anything else (filesystem, serialization, ...) |
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a transaction error
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization error: {e}"))
    }
}

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
