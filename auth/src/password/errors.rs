use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error: a mismatch, including an
/// unreadable stored hash, is reported as `false` by the hasher.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
