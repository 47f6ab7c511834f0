//! Account authentication library
//!
//! Provides the authentication primitives used by the account service:
//! - Password hashing (bcrypt, cost 12, with Argon2 verification for legacy hashes)
//! - Account token issuance and verification (HS256 JWT, 30 day lifetime)
//! - Secret rotation: tokens signed with a retired secret are accepted and
//!   flagged for refresh
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Token Rotation
//! ```
//! use auth::{Resolution, SecretSet, TokenCodec};
//!
//! let old = TokenCodec::new(&SecretSet::single("s1").unwrap());
//! let token = old.issue("user123", false).unwrap();
//!
//! let rotated = TokenCodec::new(&SecretSet::new("s2", vec!["s1"]).unwrap());
//! assert!(matches!(
//!     rotated.resolve(&token),
//!     Resolution::Accepted { needs_refresh: true, .. }
//! ));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, SecretSet};
//!
//! let secrets = SecretSet::single("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secrets);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", Some(&hash), "user123", false).unwrap();
//!
//! // Every request: resolve token
//! assert!(auth.resolve_token(&result.access_token).is_accepted());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenClaims;
pub use jwt::TOKEN_LIFETIME_DAYS;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::BCRYPT_COST;
pub use token::Rejection;
pub use token::Resolution;
pub use token::SecretSet;
pub use token::SecretSetError;
pub use token::TokenCodec;
pub use token::VerificationFailure;
