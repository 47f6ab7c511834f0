use async_trait::async_trait;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;

/// Server-side session storage.
///
/// Expiry is owned by the store: an expired record is reported as absent.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a new session record.
    ///
    /// # Errors
    /// * `StoreError` - Storage operation failed
    async fn create(&self, session: Session) -> Result<Session, SessionError>;

    /// Retrieve a live session by identifier.
    ///
    /// # Returns
    /// Optional session (None if unknown or expired)
    ///
    /// # Errors
    /// * `StoreError` - Storage operation failed
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, SessionError>;

    /// Remove every expired session.
    ///
    /// # Returns
    /// Number of sessions removed
    ///
    /// # Errors
    /// * `StoreError` - Storage operation failed
    async fn delete_expired(&self) -> Result<u64, SessionError>;
}
