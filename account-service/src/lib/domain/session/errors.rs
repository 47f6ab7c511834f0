use thiserror::Error;

/// Error for session operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session ID: {0}")]
    InvalidSessionId(String),

    #[error("Session store error: {0}")]
    StoreError(String),
}
