use async_trait::async_trait;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::AuthenticatedUser;
use crate::domain::authentication::models::Credentials;

/// Port for request authentication.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Authenticate with a bearer token only.
    ///
    /// # Errors
    /// * `Rejected(AuthenticationRequired)` - No bearer token presented
    /// * `Rejected(InvalidCredential)` - Token invalid or account unknown
    /// * `Infrastructure` - Identity store failed
    async fn authenticate_strict(
        &self,
        bearer_token: Option<&str>,
    ) -> Result<AuthenticatedUser, AuthError>;

    /// Authenticate with a bearer token, falling back to the session.
    ///
    /// The session path always reissues a token.
    ///
    /// # Errors
    /// * `Rejected(AuthenticationRequired)` - Neither path identified an account
    /// * `Infrastructure` - Identity or session store failed
    async fn authenticate_flexible(
        &self,
        credentials: Credentials<'_>,
    ) -> Result<AuthenticatedUser, AuthError>;
}
