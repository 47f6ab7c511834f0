use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::session::models::Session;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    // Unknown and malformed emails answer exactly like a wrong password.
    let email =
        EmailAddress::new(body.email).map_err(|_| ApiError::from(UserError::InvalidCredentials))?;

    let user = match state.user_service.get_user_by_email(&email).await {
        Ok(user) => Some(user),
        Err(UserError::NotFoundByEmail(_)) => None,
        Err(e) => return Err(ApiError::from(e)),
    };

    // An unknown email still pays for a password check.
    let token = verify_password(&state, user.as_ref(), body.password).await?;
    let user = user.ok_or_else(|| ApiError::from(UserError::InvalidCredentials))?;

    let jar = match start_session(&state, &user).await {
        Some(cookie) => jar.add(cookie),
        None => jar,
    };

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                user: (&user).into(),
                token,
                message: "Login successful".to_string(),
            },
        ),
    ))
}

/// Check the password on the blocking pool and issue a token.
async fn verify_password(
    state: &AppState,
    user: Option<&User>,
    password: String,
) -> Result<String, ApiError> {
    let authenticator = Arc::clone(&state.authenticator);
    let stored_hash = user.and_then(|user| user.password_hash.clone());
    let user_id = user.map(|user| user.id.to_string()).unwrap_or_default();
    let is_creator = user.is_some_and(|user| user.is_creator);

    let result = tokio::task::spawn_blocking(move || {
        authenticator.authenticate(&password, stored_hash.as_deref(), user_id, is_creator)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("Password verification task failed: {}", e)))?;

    result.map(|r| r.access_token).map_err(|e| match e {
        auth::AuthenticationError::InvalidCredentials => {
            ApiError::from(UserError::InvalidCredentials)
        }
        auth::AuthenticationError::PasswordError(err) => {
            ApiError::InternalServerError(format!("Password verification failed: {}", err))
        }
        auth::AuthenticationError::JwtError(err) => {
            ApiError::InternalServerError(format!("Token generation failed: {}", err))
        }
    })
}

/// Persist a session and build its cookie. Failure never fails the login.
async fn start_session(state: &AppState, user: &User) -> Option<Cookie<'static>> {
    let session = Session::start(user.id, state.session.ttl());

    match state.session_store.create(session).await {
        Ok(session) => Some(
            Cookie::build((state.session.cookie_name.clone(), session.id.to_string()))
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.session.secure_cookie)
                .path("/")
                .build(),
        ),
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "Failed to save session");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub token: String,
    pub message: String,
}
