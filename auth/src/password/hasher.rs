use std::sync::OnceLock;

use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordVerifier;
use argon2::Argon2;

use super::errors::PasswordError;

/// Work factor for new password hashes.
pub const BCRYPT_COST: u32 = 12;

/// Hash checked when there is no stored hash, so that path costs as much as
/// a real mismatch.
static PLACEHOLDER_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Stored hash formats this hasher can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashScheme {
    Bcrypt,
    Argon2,
}

impl HashScheme {
    fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$") {
            Some(Self::Bcrypt)
        } else if hash.starts_with("$argon2") {
            Some(Self::Argon2)
        } else {
            None
        }
    }
}

/// Password hashing implementation.
///
/// New hashes are bcrypt with a fixed cost of 12. Verification also accepts
/// Argon2 PHC strings so accounts hashed under the previous scheme can still
/// sign in.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher using the production work factor
    pub fn new() -> Self {
        Self { cost: BCRYPT_COST }
    }

    /// Hash a plaintext password for storage.
    ///
    /// Each call generates a fresh random salt, so hashing the same password
    /// twice yields two different strings of the same length.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt format bcrypt hash (`$2b$12$...`)
    ///
    /// # Errors
    /// * `HashingFailed` - The bcrypt primitive failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored hash (bcrypt or Argon2 PHC string)
    ///
    /// # Returns
    /// True if the password matches. Any mismatch, including a malformed or
    /// unrecognized stored hash, returns false.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match HashScheme::detect(hash) {
            Some(HashScheme::Bcrypt) => bcrypt::verify(password, hash).unwrap_or(false),
            Some(HashScheme::Argon2) => PasswordHash::new(hash)
                .map(|parsed| {
                    Argon2::default()
                        .verify_password(password.as_bytes(), &parsed)
                        .is_ok()
                })
                .unwrap_or(false),
            None => false,
        }
    }

    /// Spend one verification's worth of work without a stored hash.
    ///
    /// Used for unknown accounts and accounts without a password. Always
    /// returns false.
    pub fn verify_missing(&self, password: &str) -> bool {
        let placeholder = PLACEHOLDER_HASH
            .get_or_init(|| bcrypt::hash("placeholder-account-password", self.cost).ok());

        if let Some(hash) = placeholder {
            let _ = bcrypt::verify(password, hash);
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
