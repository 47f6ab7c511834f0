use std::sync::Arc;

use account_service::config::Config;
use account_service::config::StorageBackend;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::outbound::sessions::InMemorySessionStore;
use account_service::outbound::sessions::spawn_cleanup_scheduler;
use account_service::outbound::sessions::PostgresSessionStore;
use anyhow::Context;
use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let secrets = config.auth_secrets()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        retired_secrets = secrets.retired().len(),
        session_cookie = %config.session.cookie_name,
        session_ttl_hours = config.session.ttl_hours,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(&secrets));

    let state = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!(storage = "memory", "Using in-memory storage, data is lost on restart");
            AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemorySessionStore::new()),
                authenticator,
                config.session.clone(),
            )
        }
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .context("storage.backend is postgres but no [database] section is configured")?;

            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            AppState::new(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresSessionStore::new(pg_pool)),
                authenticator,
                config.session.clone(),
            )
        }
    };

    spawn_cleanup_scheduler(
        Arc::clone(&state.session_store),
        config.session.cleanup_interval(),
    );
    tracing::info!(
        interval_minutes = config.session.cleanup_interval_minutes,
        "Session cleanup scheduled"
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, create_router(state)).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
