use crate::domain::authentication::errors::AuthRejection;
use crate::domain::user::models::User;

/// Identity attached to a request once authentication succeeds.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    /// Replacement token to hand back to the client, if one was issued.
    pub reissued_token: Option<String>,
}

/// Credentials found on an incoming request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Credentials<'a> {
    pub bearer_token: Option<&'a str>,
    pub session_id: Option<&'a str>,
}

/// One way of admitting a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionStep {
    BearerToken,
    Session,
}

/// Outcome of a single admission step.
#[derive(Debug, Clone)]
pub enum Admission {
    /// The step's credential was not presented.
    NotAttempted,
    Rejected(AuthRejection),
    Accepted(AuthenticatedUser),
}
