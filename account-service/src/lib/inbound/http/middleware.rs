use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use super::handlers::ApiError;
use crate::domain::authentication::models::AuthenticatedUser;
use crate::domain::authentication::models::Credentials;
use crate::inbound::http::router::AppState;

/// Response header carrying a replacement token.
pub const NEW_TOKEN_HEADER: &str = "x-new-token";

/// Middleware that admits requests carrying a valid bearer token only.
///
/// 401 without a bearer token, 403 when the token or its account is invalid.
pub async fn authenticate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let bearer_token = bearer_token(req.headers()).map(str::to_owned);

    let authenticated = state
        .auth_service
        .authenticate_strict(bearer_token.as_deref())
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    Ok(run_authenticated(req, next, authenticated).await)
}

/// Middleware that admits requests by bearer token, falling back to the
/// session cookie.
pub async fn authenticate_flexible(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let bearer_token = bearer_token(req.headers()).map(str::to_owned);
    let session_id = CookieJar::from_headers(req.headers())
        .get(&state.session.cookie_name)
        .map(|cookie| cookie.value().to_owned());

    let credentials = Credentials {
        bearer_token: bearer_token.as_deref(),
        session_id: session_id.as_deref(),
    };

    let authenticated = state
        .auth_service
        .authenticate_flexible(credentials)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    Ok(run_authenticated(req, next, authenticated).await)
}

async fn run_authenticated(
    mut req: Request,
    next: Next,
    authenticated: AuthenticatedUser,
) -> Response {
    let reissued_token = authenticated.reissued_token.clone();
    req.extensions_mut().insert(authenticated);

    let mut response = next.run(req).await;

    if let Some(token) = reissued_token {
        attach_new_token(response.headers_mut(), &token);
    }

    response
}

/// `Access-Control-Expose-Headers` for this header is set by the CORS layer.
fn attach_new_token(headers: &mut HeaderMap, token: &str) {
    match HeaderValue::from_str(token) {
        Ok(value) => {
            headers.insert(NEW_TOKEN_HEADER, value);
        }
        Err(e) => tracing::error!(error = %e, "Reissued token is not a valid header value"),
    }
}

/// Token from an `Authorization: Bearer <token>` header.
///
/// The scheme name is case-insensitive. A missing header, another scheme or
/// an empty token all count as no token.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with_authorization("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(
            bearer_token(&headers_with_authorization("bearer abc.def.ghi")),
            Some("abc.def.ghi")
        );
        assert_eq!(
            bearer_token(&headers_with_authorization("BEARER abc.def.ghi")),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_bearer_token_absent() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with_authorization("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with_authorization("Bearer ")), None);
    }

    #[test]
    fn test_attach_new_token() {
        let mut headers = HeaderMap::new();
        attach_new_token(&mut headers, "abc.def.ghi");

        assert_eq!(headers.get("X-New-Token").unwrap(), "abc.def.ghi");
        assert_eq!(headers.len(), 1);
    }
}
