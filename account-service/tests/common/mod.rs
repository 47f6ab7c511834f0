#![allow(dead_code)]

use std::sync::Arc;

use account_service::config::SessionConfig;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::sessions::InMemorySessionStore;
use auth::Authenticator;
use auth::SecretSet;
use auth::TokenCodec;
use serde_json::json;
use serde_json::Value;

pub const CURRENT_SECRET: &str = "test-current-secret-for-jwt-signing";
pub const RETIRED_SECRET: &str = "test-retired-secret-for-jwt-signing";
pub const UNKNOWN_SECRET: &str = "test-unknown-secret-for-jwt-signing";

/// Test application that spawns a real server on in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub current_codec: TokenCodec,
    pub retired_codec: TokenCodec,
    pub unknown_codec: TokenCodec,
}

/// Account created through the registration route
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let secrets = SecretSet::new(CURRENT_SECRET, vec![RETIRED_SECRET])
            .expect("Failed to build secret set");
        let authenticator = Arc::new(Authenticator::new(&secrets));

        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionStore::new()),
            authenticator,
            SessionConfig::default(),
        );
        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            current_codec: codec(CURRENT_SECRET),
            retired_codec: codec(RETIRED_SECRET),
            unknown_codec: codec(UNKNOWN_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return its id and token
    pub async fn register(&self, email: &str) -> RegisteredUser {
        let password = "pass_word!".to_string();
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "phone": "5550100123",
                "password": password,
                "full_name": "Test Cook"
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        RegisteredUser {
            id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_lowercase(),
            password,
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    /// Log in, storing the session cookie in the client
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

fn codec(secret: &str) -> TokenCodec {
    TokenCodec::new(&SecretSet::single(secret).expect("Failed to build secret set"))
}
