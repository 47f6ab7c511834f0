use super::codec::TokenCodec;
use super::errors::VerificationFailure;
use crate::jwt::JwtError;
use crate::jwt::TokenClaims;

/// Outcome of resolving a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token is valid. `needs_refresh` is set when it was signed with a
    /// retired secret and should be replaced by one signed with the current
    /// secret.
    Accepted {
        claims: TokenClaims,
        needs_refresh: bool,
    },
    Rejected(Rejection),
}

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Malformed, expired, or otherwise invalid under the current secret.
    /// Retired secrets were not consulted.
    Invalid(JwtError),

    /// Signature matched neither the current nor any retired secret.
    UnknownSigner,
}

impl Resolution {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Resolution::Accepted { .. })
    }
}

impl TokenCodec {
    /// Resolve a raw token into accepted claims or a rejection.
    ///
    /// The current secret is tried first. Only a signature mismatch falls
    /// through to the retired secrets, in order; the first one that verifies
    /// wins and marks the token for refresh. Any other failure under the
    /// current secret rejects immediately.
    pub fn resolve(&self, token: &str) -> Resolution {
        match self.verify(token) {
            Ok(claims) => {
                tracing::debug!(user_id = %claims.user_id, "Token verified with current secret");
                Resolution::Accepted {
                    claims,
                    needs_refresh: false,
                }
            }
            Err(VerificationFailure::SignatureMismatch) => self.resolve_with_retired(token),
            Err(VerificationFailure::Invalid(e)) => {
                tracing::debug!(error = %e, "Token rejected without retired secret retry");
                Resolution::Rejected(Rejection::Invalid(e))
            }
        }
    }

    fn resolve_with_retired(&self, token: &str) -> Resolution {
        for (position, handler) in self.retired.iter().enumerate() {
            if let Ok(claims) = handler.decode::<TokenClaims>(token) {
                tracing::debug!(
                    user_id = %claims.user_id,
                    retired_position = position,
                    "Token verified with retired secret"
                );
                return Resolution::Accepted {
                    claims,
                    needs_refresh: true,
                };
            }
        }

        tracing::debug!(
            retired_count = self.retired.len(),
            "Token signature matched no known secret"
        );
        Resolution::Rejected(Rejection::UnknownSigner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use chrono::Utc;

    use super::*;
    use crate::token::SecretSet;

    fn codec(current: &str, retired: &[&str]) -> TokenCodec {
        TokenCodec::new(&SecretSet::new(current, retired.iter().copied()).unwrap())
    }

    #[test]
    fn test_current_secret_accepts_without_refresh() {
        let codec = codec("s2", &["s1"]);
        let token = codec.issue("user-1", true).unwrap();

        match codec.resolve(&token) {
            Resolution::Accepted {
                claims,
                needs_refresh,
            } => {
                assert_eq!(claims.user_id, "user-1");
                assert!(claims.is_creator);
                assert!(!needs_refresh);
            }
            other => panic!("Expected accepted token, got {:?}", other),
        }
    }

    #[test]
    fn test_rotation_scenario() {
        let before_rotation = codec("s1", &[]);
        let token = before_rotation.issue("user-1", false).unwrap();

        let rotated = codec("s2", &["s1"]);
        match rotated.resolve(&token) {
            Resolution::Accepted {
                claims,
                needs_refresh,
            } => {
                assert_eq!(claims.user_id, "user-1");
                assert!(needs_refresh);
            }
            other => panic!("Expected accepted token, got {:?}", other),
        }

        let retired_removed = codec("s2", &[]);
        assert_eq!(
            retired_removed.resolve(&token),
            Resolution::Rejected(Rejection::UnknownSigner)
        );
    }

    #[test]
    fn test_first_matching_retired_secret_wins() {
        let token = codec("s1", &[]).issue("user-1", false).unwrap();
        let rotated = codec("s3", &["s0", "s1", "s2"]);

        assert!(matches!(
            rotated.resolve(&token),
            Resolution::Accepted {
                needs_refresh: true,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_retired_list_rejects_signature_mismatch() {
        let token = codec("other", &[]).issue("user-1", false).unwrap();
        let codec = codec("s2", &[]);

        assert_eq!(codec.retired_count(), 0);
        assert_eq!(
            codec.resolve(&token),
            Resolution::Rejected(Rejection::UnknownSigner)
        );
    }

    #[test]
    fn test_expired_token_is_not_retried() {
        let codec = codec("s2", &["s1"]);
        let token = codec
            .issue_at("user-1", false, Utc::now() - Duration::days(31))
            .unwrap();

        assert_eq!(
            codec.resolve(&token),
            Resolution::Rejected(Rejection::Invalid(JwtError::TokenExpired))
        );
    }

    #[test]
    fn test_malformed_token_is_not_retried() {
        let codec = codec("s2", &["s1"]);

        assert!(matches!(
            codec.resolve("garbage"),
            Resolution::Rejected(Rejection::Invalid(JwtError::DecodingFailed(_)))
        ));
    }

    #[test]
    fn test_expired_token_under_retired_secret_is_rejected() {
        let old = codec("s1", &[]);
        let token = old
            .issue_at("user-1", false, Utc::now() - Duration::days(31))
            .unwrap();

        let rotated = codec("s2", &["s1"]);
        assert!(!rotated.resolve(&token).is_accepted());
    }

    #[test]
    fn test_concurrent_resolution_yields_identical_claims() {
        let codec = Arc::new(codec("s2", &["s1"]));
        let token = codec.issue("user-1", true).unwrap();

        let results: Vec<Resolution> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let codec = Arc::clone(&codec);
                    let token = token.as_str();
                    scope.spawn(move || codec.resolve(token))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results[0].is_accepted());
        assert_eq!(results[0], results[1]);
    }
}
