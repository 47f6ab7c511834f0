use thiserror::Error;

/// Terminal rejection of a request's credentials.
///
/// Absent and invalid credentials stay distinct so each authenticator can
/// answer them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    /// No usable credential was presented.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// A credential was presented but did not identify a known account.
    /// Covers bad tokens and deleted accounts alike.
    #[error("Invalid token")]
    InvalidCredential,
}

/// Error for request authentication
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error(transparent)]
    Rejected(#[from] AuthRejection),

    /// The identity or session store failed; not an authentication verdict.
    #[error("Authentication error: {0}")]
    Infrastructure(String),
}
