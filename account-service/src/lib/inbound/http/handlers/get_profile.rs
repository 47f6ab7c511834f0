use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::authentication::models::AuthenticatedUser;

pub async fn get_profile(
    Extension(authenticated): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserResponseData {
            user: (&authenticated.user).into(),
        },
    ))
}
