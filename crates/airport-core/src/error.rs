//! Error types for object store backends

use thiserror::Error;

/// Result type for object store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while writing to an object store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Credential material missing, unreadable or malformed
    #[error("Credential error: {0}")]
    Credentials(String),

    /// The store rejected our identity (token exchange or 401/403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered the write with a non-success status
    #[error("Write rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the store
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The write did not complete (content not fully consumed)
    #[error("Incomplete write: {0}")]
    Incomplete(String),

    /// Timeout waiting for the store
    #[error("Object store timed out")]
    Timeout,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether the failure is attributable to credentials or authentication
    pub fn is_auth(&self) -> bool {
        matches!(self, StoreError::Credentials(_) | StoreError::Auth(_))
    }
}
