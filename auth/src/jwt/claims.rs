use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Fixed lifetime of every issued token.
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

/// Claims carried by an account token.
///
/// Serialized with the camel-case field names clients already hold in
/// their stored tokens (`userId`, `isCreator`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (account identifier)
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Whether the account may publish community content
    #[serde(rename = "isCreator", default)]
    pub is_creator: bool,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for an account, valid for [`TOKEN_LIFETIME_DAYS`].
    ///
    /// # Arguments
    /// * `user_id` - Account identifier
    /// * `is_creator` - Creator capability flag
    /// * `issued_at` - Issuance instant
    ///
    /// # Returns
    /// Claims with `iat` set to `issued_at` and `exp` 30 days later
    pub fn for_user(user_id: impl ToString, is_creator: bool, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + Duration::days(TOKEN_LIFETIME_DAYS);

        Self {
            user_id: user_id.to_string(),
            is_creator,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}
