use std::fmt;

use super::errors::SecretSetError;

/// Signing secrets for account tokens.
///
/// One current secret signs every new token. Retired secrets are only kept
/// to accept tokens issued before a rotation, and are tried in the order
/// given. The current secret never appears in the retired list.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretSet {
    current: String,
    retired: Vec<String>,
}

impl SecretSet {
    /// Build a secret set.
    ///
    /// Retired entries that are empty, equal to the current secret, or
    /// repeated are dropped; the remaining order is kept.
    ///
    /// # Arguments
    /// * `current` - Secret used for all new signatures
    /// * `retired` - Previously used secrets, most relevant first
    ///
    /// # Errors
    /// * `EmptyCurrentSecret` - `current` is empty
    pub fn new<I, S>(current: impl Into<String>, retired: I) -> Result<Self, SecretSetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = current.into();
        if current.is_empty() {
            return Err(SecretSetError::EmptyCurrentSecret);
        }

        let mut kept: Vec<String> = Vec::new();
        for secret in retired.into_iter().map(Into::into) {
            if secret.is_empty() || secret == current || kept.contains(&secret) {
                continue;
            }
            kept.push(secret);
        }

        Ok(Self {
            current,
            retired: kept,
        })
    }

    /// Secret set with no retired secrets.
    pub fn single(current: impl Into<String>) -> Result<Self, SecretSetError> {
        Self::new(current, Vec::<String>::new())
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn retired(&self) -> &[String] {
        &self.retired
    }
}

// Secrets stay out of logs.
impl fmt::Debug for SecretSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretSet")
            .field("current_len", &self.current.len())
            .field("retired_count", &self.retired.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_current_secret() {
        let result = SecretSet::new("", vec!["old"]);
        assert_eq!(result, Err(SecretSetError::EmptyCurrentSecret));
    }

    #[test]
    fn test_current_secret_never_retired() {
        let secrets = SecretSet::new("s2", vec!["s1", "s2", "s0"]).unwrap();

        assert_eq!(secrets.current(), "s2");
        assert_eq!(secrets.retired(), &["s1".to_string(), "s0".to_string()]);
    }

    #[test]
    fn test_drops_empty_and_duplicate_retired_secrets() {
        let secrets = SecretSet::new("s3", vec!["s1", "", "s2", "s1"]).unwrap();

        assert_eq!(secrets.retired(), &["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let secrets = SecretSet::new("top-secret-value", vec!["older-secret"]).unwrap();
        let debug = format!("{:?}", secrets);

        assert!(!debug.contains("top-secret-value"));
        assert!(!debug.contains("older-secret"));
        assert!(debug.contains("retired_count: 1"));
    }
}
