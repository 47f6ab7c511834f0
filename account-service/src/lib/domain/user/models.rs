use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::FullNameError;
use crate::user::errors::PasswordError;
use crate::user::errors::PhoneError;
use crate::user::errors::UnknownVariantError;
use crate::user::errors::UserIdError;

/// Length of the free trial granted at registration.
pub const TRIAL_PERIOD_DAYS: i64 = 30;

/// User aggregate entity.
///
/// Represents a registered community member.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub full_name: FullName,
    /// Absent for accounts created through an external identity provider.
    pub password_hash: Option<String>,
    pub is_creator: bool,
    pub account_type: AccountType,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new free-trial account from a registration.
    ///
    /// # Arguments
    /// * `command` - Validated registration data
    /// * `password_hash` - Hash of the registration password
    /// * `now` - Registration instant
    pub fn register(command: RegisterUserCommand, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            email: command.email,
            phone: Some(command.phone),
            full_name: command.full_name,
            password_hash: Some(password_hash),
            is_creator: false,
            account_type: AccountType::FreeTrial,
            trial_ends_at: Some(now + Duration::days(TRIAL_PERIOD_DAYS)),
            subscription_status: SubscriptionStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser and stored lower-cased so lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Phone number value type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_LENGTH: usize = 10;

    /// Create a new phone number.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 10 characters after trimming
    pub fn new(phone: String) -> Result<Self, PhoneError> {
        let phone = phone.trim().to_string();
        let length = phone.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PhoneError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display name value type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    /// # Errors
    /// * `Empty` - Name is empty after trimming
    pub fn new(name: String) -> Result<Self, FullNameError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(FullNameError::Empty);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password accepted at registration.
///
/// Never printed; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;

    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    pub fn new(password: String) -> Result<Self, PasswordError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Plan an account is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    FreeTrial,
    Premium,
    Creator,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::FreeTrial => "free_trial",
            AccountType::Premium => "premium",
            AccountType::Creator => "creator",
        }
    }
}

impl FromStr for AccountType {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free_trial" => Ok(AccountType::FreeTrial),
            "premium" => Ok(AccountType::Premium),
            "creator" => Ok(AccountType::Creator),
            other => Err(UnknownVariantError::AccountType(other.to_string())),
        }
    }
}

/// Billing state of an account's subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(UnknownVariantError::SubscriptionStatus(other.to_string())),
        }
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub full_name: FullName,
    pub password: Password,
}

impl RegisterUserCommand {
    /// Construct a new registration command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `phone` - Validated phone number
    /// * `full_name` - Validated display name
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(
        email: EmailAddress,
        phone: PhoneNumber,
        full_name: FullName,
        password: Password,
    ) -> Self {
        Self {
            email,
            phone,
            full_name,
            password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Cook@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "cook@example.com");
    }

    #[test]
    fn test_email_rejects_invalid_format() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_phone_minimum_length() {
        assert_eq!(
            PhoneNumber::new("12345".to_string()),
            Err(PhoneError::TooShort { min: 10, actual: 5 })
        );
        assert!(PhoneNumber::new("+1 555 0100".to_string()).is_ok());
    }

    #[test]
    fn test_full_name_rejects_blank() {
        assert_eq!(FullName::new("   ".to_string()), Err(FullNameError::Empty));
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(matches!(
            Password::new("short".to_string()),
            Err(PasswordError::TooShort { min: 8, actual: 5 })
        ));
        assert!(Password::new("long_enough".to_string()).is_ok());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter2hunter2".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter2"));
    }

    #[test]
    fn test_register_starts_free_trial() {
        let now = Utc::now();
        let command = RegisterUserCommand::new(
            EmailAddress::new("cook@example.com".to_string()).unwrap(),
            PhoneNumber::new("5550100123".to_string()).unwrap(),
            FullName::new("Julia Child".to_string()).unwrap(),
            Password::new("password123".to_string()).unwrap(),
        );

        let user = User::register(command, "$2b$12$hash".to_string(), now);

        assert_eq!(user.account_type, AccountType::FreeTrial);
        assert_eq!(user.subscription_status, SubscriptionStatus::Active);
        assert!(!user.is_creator);
        assert_eq!(user.trial_ends_at, Some(now + Duration::days(30)));
    }

    #[test]
    fn test_unknown_stored_variants_are_rejected() {
        assert_eq!(
            "gold".parse::<AccountType>(),
            Err(UnknownVariantError::AccountType("gold".to_string()))
        );
        assert!("paused".parse::<SubscriptionStatus>().is_err());
    }
}
