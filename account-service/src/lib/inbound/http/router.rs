use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::HeaderName;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_current_user::get_current_user;
use super::handlers::get_profile::get_profile;
use super::handlers::login::login;
use super::handlers::register_user::register_user;
use super::middleware::authenticate;
use super::middleware::authenticate_flexible;
use super::middleware::NEW_TOKEN_HEADER;
use crate::config::SessionConfig;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::authentication::service::AuthService;
use crate::domain::session::ports::SessionStore;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    pub session_store: Arc<dyn SessionStore>,
    pub authenticator: Arc<Authenticator>,
    pub session: SessionConfig,
}

impl AppState {
    /// Wire the domain services over one user repository and session store.
    ///
    /// # Arguments
    /// * `users` - Account persistence, also the identity loader
    /// * `sessions` - Server-side session persistence
    /// * `authenticator` - Password hasher and token codec
    /// * `session` - Session cookie settings
    pub fn new<UR, SS>(
        users: Arc<UR>,
        sessions: Arc<SS>,
        authenticator: Arc<Authenticator>,
        session: SessionConfig,
    ) -> Self
    where
        UR: UserRepository,
        SS: SessionStore,
    {
        let user_service = Arc::new(UserService::new(Arc::clone(&users)));
        let auth_service = Arc::new(AuthService::new(
            users,
            Arc::clone(&sessions),
            Arc::clone(&authenticator),
        ));

        Self {
            user_service,
            auth_service,
            session_store: sessions,
            authenticator,
            session,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register_user))
        .route("/api/auth/login", post(login));

    let flexible_routes = Router::new()
        .route("/api/auth/user", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_flexible,
        ));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(NEW_TOKEN_HEADER)]);

    Router::new()
        .merge(public_routes)
        .merge(flexible_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors_layer)
        .with_state(state)
}
