use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::authentication::models::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Deadline for the storage read behind this route.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Current account, re-read from storage rather than taken from the token.
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = authenticated.user.id;

    let user = tokio::time::timeout(LOOKUP_TIMEOUT, state.user_service.get_user(&user_id))
        .await
        .map_err(|_| {
            tracing::error!(user_id = %user_id, "Current user lookup timed out");
            ApiError::GatewayTimeout("Database connection timeout".to_string())
        })?
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserResponseData {
            user: (&user).into(),
        },
    ))
}
