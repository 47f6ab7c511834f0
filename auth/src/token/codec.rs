use chrono::DateTime;
use chrono::Utc;

use super::errors::VerificationFailure;
use super::secrets::SecretSet;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;

/// Issues and verifies account tokens against a [`SecretSet`].
///
/// The secret set is fixed at construction; rotating secrets means building
/// a new codec.
pub struct TokenCodec {
    pub(super) current: JwtHandler,
    pub(super) retired: Vec<JwtHandler>,
}

impl TokenCodec {
    pub fn new(secrets: &SecretSet) -> Self {
        Self {
            current: JwtHandler::new(secrets.current().as_bytes()),
            retired: secrets
                .retired()
                .iter()
                .map(|secret| JwtHandler::new(secret.as_bytes()))
                .collect(),
        }
    }

    /// Issue a token signed with the current secret, valid for 30 days.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, user_id: impl ToString, is_creator: bool) -> Result<String, JwtError> {
        self.issue_at(user_id, is_creator, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        user_id: impl ToString,
        is_creator: bool,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = TokenClaims::for_user(user_id, is_creator, issued_at);
        self.current.encode(&claims)
    }

    /// Verify a token with the current secret only.
    ///
    /// # Errors
    /// * `SignatureMismatch` - Token was signed with a different secret
    /// * `Invalid` - Token is malformed, expired, or uses another algorithm
    pub fn verify(&self, token: &str) -> Result<TokenClaims, VerificationFailure> {
        self.current
            .decode::<TokenClaims>(token)
            .map_err(VerificationFailure::from)
    }

    /// Number of retired secrets this codec still accepts.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn codec(current: &str) -> TokenCodec {
        TokenCodec::new(&SecretSet::single(current).unwrap())
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let codec = codec("current_secret_at_least_32_bytes_long");

        for (subject, is_creator) in [("user-1", false), ("user-2", true)] {
            let token = codec.issue(subject, is_creator).expect("Failed to issue token");
            let claims = codec.verify(&token).expect("Failed to verify token");

            assert_eq!(claims.user_id, subject);
            assert_eq!(claims.is_creator, is_creator);
            assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
        }
    }

    #[test]
    fn test_verify_distinguishes_signature_mismatch() {
        let issuer = codec("secret_one_at_least_32_bytes_long!!");
        let verifier = codec("secret_two_at_least_32_bytes_long!!");

        let token = issuer.issue("user-1", false).unwrap();

        assert_eq!(
            verifier.verify(&token),
            Err(VerificationFailure::SignatureMismatch)
        );
    }

    #[test]
    fn test_verify_expired_is_not_signature_mismatch() {
        let codec = codec("current_secret_at_least_32_bytes_long");
        let token = codec
            .issue_at("user-1", false, Utc::now() - Duration::days(31))
            .unwrap();

        assert_eq!(
            codec.verify(&token),
            Err(VerificationFailure::Invalid(JwtError::TokenExpired))
        );
    }

    #[test]
    fn test_verify_malformed_token() {
        let codec = codec("current_secret_at_least_32_bytes_long");

        assert!(matches!(
            codec.verify("not-a-token"),
            Err(VerificationFailure::Invalid(JwtError::DecodingFailed(_)))
        ));
    }
}
