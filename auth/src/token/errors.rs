use thiserror::Error;

use crate::jwt::JwtError;

/// Error for secret set construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretSetError {
    #[error("Current signing secret must not be empty")]
    EmptyCurrentSecret,
}

/// Why a token failed verification against one secret.
///
/// A signature mismatch is the only failure that makes retired secrets
/// worth trying; everything else is final.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    #[error("Token signature does not match the signing secret")]
    SignatureMismatch,

    #[error(transparent)]
    Invalid(JwtError),
}

impl From<JwtError> for VerificationFailure {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::InvalidSignature => VerificationFailure::SignatureMismatch,
            other => VerificationFailure::Invalid(other),
        }
    }
}
