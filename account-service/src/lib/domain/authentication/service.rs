use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Resolution;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::errors::AuthRejection;
use crate::domain::authentication::models::Admission;
use crate::domain::authentication::models::AdmissionStep;
use crate::domain::authentication::models::AuthenticatedUser;
use crate::domain::authentication::models::Credentials;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionStore;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Admission order of the flexible authenticator. The bearer token is
/// authoritative whenever it identifies an account.
const FLEXIBLE_PIPELINE: [AdmissionStep; 2] = [AdmissionStep::BearerToken, AdmissionStep::Session];

/// Resolves request credentials into an authenticated account.
///
/// Accounts are loaded fresh from the repository on every call; nothing is
/// cached between requests and nothing is written.
pub struct AuthService<UR, SS>
where
    UR: UserRepository,
    SS: SessionStore,
{
    users: Arc<UR>,
    sessions: Arc<SS>,
    authenticator: Arc<Authenticator>,
}

impl<UR, SS> AuthService<UR, SS>
where
    UR: UserRepository,
    SS: SessionStore,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - Identity loader
    /// * `sessions` - Server-side session store
    /// * `authenticator` - Token codec holding the process secrets
    pub fn new(users: Arc<UR>, sessions: Arc<SS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            users,
            sessions,
            authenticator,
        }
    }

    async fn admit(
        &self,
        step: AdmissionStep,
        credentials: Credentials<'_>,
    ) -> Result<Admission, AuthError> {
        match step {
            AdmissionStep::BearerToken => self.admit_bearer(credentials.bearer_token).await,
            AdmissionStep::Session => self.admit_session(credentials.session_id).await,
        }
    }

    async fn admit_bearer(&self, token: Option<&str>) -> Result<Admission, AuthError> {
        let Some(token) = token else {
            return Ok(Admission::NotAttempted);
        };

        let (claims, needs_refresh) = match self.authenticator.resolve_token(token) {
            Resolution::Accepted {
                claims,
                needs_refresh,
            } => (claims, needs_refresh),
            Resolution::Rejected(rejection) => {
                tracing::warn!(reason = ?rejection, "Bearer token rejected");
                return Ok(Admission::Rejected(AuthRejection::InvalidCredential));
            }
        };

        let Ok(user_id) = UserId::from_string(&claims.user_id) else {
            tracing::warn!("Bearer token subject is not a valid user ID");
            return Ok(Admission::Rejected(AuthRejection::InvalidCredential));
        };

        let Some(user) = self.load_user(&user_id).await? else {
            tracing::warn!(user_id = %user_id, "Bearer token subject no longer exists");
            return Ok(Admission::Rejected(AuthRejection::InvalidCredential));
        };

        let reissued_token = if needs_refresh {
            let token = self.issue_for(&user)?;
            tracing::info!(user_id = %user.id, "Reissued token signed with retired secret");
            Some(token)
        } else {
            None
        };

        Ok(Admission::Accepted(AuthenticatedUser {
            user,
            reissued_token,
        }))
    }

    async fn admit_session(&self, session_id: Option<&str>) -> Result<Admission, AuthError> {
        let Some(raw_id) = session_id else {
            return Ok(Admission::NotAttempted);
        };

        let Ok(session_id) = SessionId::from_string(raw_id) else {
            tracing::debug!("Session cookie is not a valid session ID");
            return Ok(Admission::Rejected(AuthRejection::AuthenticationRequired));
        };

        let session = self.sessions.find(&session_id).await.map_err(|e| {
            tracing::error!(error = %e, "Session lookup failed");
            AuthError::Infrastructure(e.to_string())
        })?;

        let Some(session) = session else {
            tracing::debug!("Session unknown or expired");
            return Ok(Admission::Rejected(AuthRejection::AuthenticationRequired));
        };

        let Some(user) = self.load_user(&session.user_id).await? else {
            tracing::warn!(user_id = %session.user_id, "Session subject no longer exists");
            return Ok(Admission::Rejected(AuthRejection::AuthenticationRequired));
        };

        let token = self.issue_for(&user)?;
        tracing::info!(user_id = %user.id, "Issued token for session user");

        Ok(Admission::Accepted(AuthenticatedUser {
            user,
            reissued_token: Some(token),
        }))
    }

    async fn load_user(&self, user_id: &UserId) -> Result<Option<User>, AuthError> {
        self.users.find_by_id(user_id).await.map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Identity lookup failed");
            AuthError::Infrastructure(e.to_string())
        })
    }

    /// Tokens always carry the account's current creator flag.
    fn issue_for(&self, user: &User) -> Result<String, AuthError> {
        self.authenticator
            .issue_token(user.id, user.is_creator)
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Token issuance failed");
                AuthError::Infrastructure(e.to_string())
            })
    }
}

#[async_trait]
impl<UR, SS> AuthServicePort for AuthService<UR, SS>
where
    UR: UserRepository,
    SS: SessionStore,
{
    async fn authenticate_strict(
        &self,
        bearer_token: Option<&str>,
    ) -> Result<AuthenticatedUser, AuthError> {
        match self.admit_bearer(bearer_token).await? {
            Admission::Accepted(authenticated) => Ok(authenticated),
            Admission::Rejected(rejection) => Err(rejection.into()),
            Admission::NotAttempted => Err(AuthRejection::AuthenticationRequired.into()),
        }
    }

    async fn authenticate_flexible(
        &self,
        credentials: Credentials<'_>,
    ) -> Result<AuthenticatedUser, AuthError> {
        for step in FLEXIBLE_PIPELINE {
            match self.admit(step, credentials).await? {
                Admission::Accepted(authenticated) => return Ok(authenticated),
                Admission::Rejected(rejection) => {
                    tracing::debug!(step = ?step, reason = %rejection, "Admission step rejected");
                }
                Admission::NotAttempted => {}
            }
        }

        Err(AuthRejection::AuthenticationRequired.into())
    }
}

#[cfg(test)]
mod tests {
    use auth::SecretSet;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::session::errors::SessionError;
    use crate::domain::session::models::Session;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::AccountType;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::FullName;
    use crate::domain::user::models::SubscriptionStatus;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
        }
    }

    mock! {
        pub TestSessionStore {}

        #[async_trait]
        impl SessionStore for TestSessionStore {
            async fn create(&self, session: Session) -> Result<Session, SessionError>;
            async fn find(&self, id: &SessionId) -> Result<Option<Session>, SessionError>;
            async fn delete_expired(&self) -> Result<u64, SessionError>;
        }
    }

    const CURRENT_SECRET: &str = "s2";
    const RETIRED_SECRET: &str = "s1";

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(
            &SecretSet::new(CURRENT_SECRET, vec![RETIRED_SECRET]).unwrap(),
        ))
    }

    fn token_signed_with(secret: &str, user_id: UserId, is_creator: bool) -> String {
        Authenticator::new(&SecretSet::single(secret).unwrap())
            .issue_token(user_id, is_creator)
            .unwrap()
    }

    fn user(is_creator: bool) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            email: EmailAddress::new("cook@example.com".to_string()).unwrap(),
            phone: None,
            full_name: FullName::new("Julia Child".to_string()).unwrap(),
            password_hash: None,
            is_creator,
            account_type: AccountType::FreeTrial,
            trial_ends_at: None,
            subscription_status: SubscriptionStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn repository_with(user: User) -> MockTestUserRepository {
        let mut repository = MockTestUserRepository::new();
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .returning(move |_| Ok(Some(user.clone())));
        repository
    }

    fn service(
        users: MockTestUserRepository,
        sessions: MockTestSessionStore,
    ) -> AuthService<MockTestUserRepository, MockTestSessionStore> {
        AuthService::new(Arc::new(users), Arc::new(sessions), authenticator())
    }

    fn assert_rejected(result: Result<AuthenticatedUser, AuthError>, expected: AuthRejection) {
        match result {
            Err(AuthError::Rejected(rejection)) => assert_eq!(rejection, expected),
            Err(other) => panic!("Expected {:?}, got {:?}", expected, other),
            Ok(authenticated) => panic!(
                "Expected {:?}, got user {}",
                expected, authenticated.user.id
            ),
        }
    }

    #[tokio::test]
    async fn test_strict_without_token_requires_authentication() {
        let service = service(MockTestUserRepository::new(), MockTestSessionStore::new());

        assert_rejected(
            service.authenticate_strict(None).await,
            AuthRejection::AuthenticationRequired,
        );
    }

    #[tokio::test]
    async fn test_strict_current_token_accepts_without_reissue() {
        let user = user(false);
        let token = token_signed_with(CURRENT_SECRET, user.id, false);
        let service = service(repository_with(user.clone()), MockTestSessionStore::new());

        let authenticated = service
            .authenticate_strict(Some(&token))
            .await
            .expect("Authentication failed");

        assert_eq!(authenticated.user.id, user.id);
        assert!(authenticated.reissued_token.is_none());
    }

    #[tokio::test]
    async fn test_strict_retired_token_reissues_with_current_creator_flag() {
        let user = user(true);
        // Token predates the account becoming a creator.
        let token = token_signed_with(RETIRED_SECRET, user.id, false);
        let service = service(repository_with(user.clone()), MockTestSessionStore::new());

        let authenticated = service
            .authenticate_strict(Some(&token))
            .await
            .expect("Authentication failed");

        let reissued = authenticated.reissued_token.expect("Expected reissued token");
        let claims = authenticator()
            .token_codec()
            .verify(&reissued)
            .expect("Reissued token should verify with current secret");
        assert_eq!(claims.user_id, user.id.to_string());
        assert!(claims.is_creator);
    }

    #[tokio::test]
    async fn test_strict_invalid_token_rejected_without_lookup() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_id().times(0);
        let service = service(users, MockTestSessionStore::new());

        assert_rejected(
            service.authenticate_strict(Some("not-a-token")).await,
            AuthRejection::InvalidCredential,
        );
    }

    #[tokio::test]
    async fn test_strict_unknown_signer_rejected() {
        let token = token_signed_with("someone-else", UserId::new(), false);
        let service = service(MockTestUserRepository::new(), MockTestSessionStore::new());

        assert_rejected(
            service.authenticate_strict(Some(&token)).await,
            AuthRejection::InvalidCredential,
        );
    }

    #[tokio::test]
    async fn test_strict_deleted_user_looks_like_invalid_token() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_id().times(1).returning(|_| Ok(None));
        let token = token_signed_with(CURRENT_SECRET, UserId::new(), false);
        let service = service(users, MockTestSessionStore::new());

        assert_rejected(
            service.authenticate_strict(Some(&token)).await,
            AuthRejection::InvalidCredential,
        );
    }

    #[tokio::test]
    async fn test_strict_non_uuid_subject_rejected() {
        let token = Authenticator::new(&SecretSet::single(CURRENT_SECRET).unwrap())
            .issue_token("42", false)
            .unwrap();
        let service = service(MockTestUserRepository::new(), MockTestSessionStore::new());

        assert_rejected(
            service.authenticate_strict(Some(&token)).await,
            AuthRejection::InvalidCredential,
        );
    }

    #[tokio::test]
    async fn test_strict_store_failure_is_infrastructure_error() {
        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));
        let token = token_signed_with(CURRENT_SECRET, UserId::new(), false);
        let service = service(users, MockTestSessionStore::new());

        let result = service.authenticate_strict(Some(&token)).await;
        assert!(matches!(result, Err(AuthError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_flexible_without_credentials_requires_authentication() {
        let mut sessions = MockTestSessionStore::new();
        sessions.expect_find().times(0);
        let service = service(MockTestUserRepository::new(), sessions);

        assert_rejected(
            service.authenticate_flexible(Credentials::default()).await,
            AuthRejection::AuthenticationRequired,
        );
    }

    #[tokio::test]
    async fn test_flexible_session_issues_exactly_one_token() {
        let user = user(false);
        let session = Session::start(user.id, Duration::hours(1));
        let session_id = session.id.to_string();

        let mut sessions = MockTestSessionStore::new();
        sessions
            .expect_find()
            .times(1)
            .returning(move |_| Ok(Some(session.clone())));
        let service = service(repository_with(user.clone()), sessions);

        let authenticated = service
            .authenticate_flexible(Credentials {
                bearer_token: None,
                session_id: Some(&session_id),
            })
            .await
            .expect("Authentication failed");

        assert_eq!(authenticated.user.id, user.id);
        let token = authenticated.reissued_token.expect("Expected issued token");
        assert!(authenticator().resolve_token(&token).is_accepted());
    }

    #[tokio::test]
    async fn test_flexible_token_wins_over_session() {
        let token_user = user(false);
        let token = token_signed_with(CURRENT_SECRET, token_user.id, false);
        let session = Session::start(UserId::new(), Duration::hours(1));
        let session_id = session.id.to_string();

        let mut sessions = MockTestSessionStore::new();
        sessions.expect_find().times(0);
        let service = service(repository_with(token_user.clone()), sessions);

        let authenticated = service
            .authenticate_flexible(Credentials {
                bearer_token: Some(&token),
                session_id: Some(&session_id),
            })
            .await
            .expect("Authentication failed");

        assert_eq!(authenticated.user.id, token_user.id);
        assert!(authenticated.reissued_token.is_none());
    }

    #[tokio::test]
    async fn test_flexible_invalid_token_falls_back_to_session() {
        let user = user(false);
        let session = Session::start(user.id, Duration::hours(1));
        let session_id = session.id.to_string();

        let mut sessions = MockTestSessionStore::new();
        sessions
            .expect_find()
            .times(1)
            .returning(move |_| Ok(Some(session.clone())));
        let service = service(repository_with(user.clone()), sessions);

        let authenticated = service
            .authenticate_flexible(Credentials {
                bearer_token: Some("expired-or-garbage"),
                session_id: Some(&session_id),
            })
            .await
            .expect("Authentication failed");

        assert_eq!(authenticated.user.id, user.id);
        assert!(authenticated.reissued_token.is_some());
    }

    #[tokio::test]
    async fn test_flexible_unknown_session_requires_authentication() {
        let mut sessions = MockTestSessionStore::new();
        sessions.expect_find().times(1).returning(|_| Ok(None));
        let service = service(MockTestUserRepository::new(), sessions);
        let session_id = SessionId::new().to_string();

        assert_rejected(
            service
                .authenticate_flexible(Credentials {
                    bearer_token: None,
                    session_id: Some(&session_id),
                })
                .await,
            AuthRejection::AuthenticationRequired,
        );
    }

    #[tokio::test]
    async fn test_flexible_invalid_token_without_session_requires_authentication() {
        let service = service(MockTestUserRepository::new(), MockTestSessionStore::new());

        assert_rejected(
            service
                .authenticate_flexible(Credentials {
                    bearer_token: Some("garbage"),
                    session_id: None,
                })
                .await,
            AuthRejection::AuthenticationRequired,
        );
    }

    #[tokio::test]
    async fn test_flexible_session_store_failure_is_infrastructure_error() {
        let mut sessions = MockTestSessionStore::new();
        sessions
            .expect_find()
            .times(1)
            .returning(|_| Err(SessionError::StoreError("timeout".to_string())));
        let service = service(MockTestUserRepository::new(), sessions);
        let session_id = SessionId::new().to_string();

        let result = service
            .authenticate_flexible(Credentials {
                bearer_token: None,
                session_id: Some(&session_id),
            })
            .await;
        assert!(matches!(result, Err(AuthError::Infrastructure(_))));
    }
}
