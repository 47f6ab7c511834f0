use crate::jwt::JwtError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Resolution;
use crate::token::SecretSet;
use crate::token::TokenCodec;

/// Authentication coordinator combining password verification and tokens.
///
/// Owns the password hasher and the token codec built from the process
/// secret set. Shared behind an `Arc` by request handlers.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Token signed with the current secret
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secrets` - Current and retired token signing secrets
    pub fn new(secrets: &SecretSet) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(secrets),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// An account without a stored hash never authenticates with a password,
    /// but is rejected only after the same hashing work as a mismatch. Pass
    /// `None` for unknown accounts too.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash, if the account has one
    /// * `user_id` - Subject for the issued token
    /// * `is_creator` - Creator flag for the issued token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or no hash is stored
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: Option<&str>,
        user_id: impl ToString,
        is_creator: bool,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let Some(stored_hash) = stored_hash else {
            self.password_hasher.verify_missing(password);
            return Err(AuthenticationError::InvalidCredentials);
        };

        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_codec.issue(user_id, is_creator)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// Used after registration and whenever a request was already
    /// authenticated by other means (token refresh, session fallback).
    pub fn issue_token(&self, user_id: impl ToString, is_creator: bool) -> Result<String, JwtError> {
        self.token_codec.issue(user_id, is_creator)
    }

    /// Resolve a presented token, trying retired secrets after a signature
    /// mismatch.
    pub fn resolve_token(&self, token: &str) -> Resolution {
        self.token_codec.resolve(token)
    }

    pub fn token_codec(&self) -> &TokenCodec {
        &self.token_codec
    }
}
