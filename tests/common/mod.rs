use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use inventory_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    AppState,
};

/// Helper harness for spinning up an application state backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let cfg = test_config();

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(db_arc, cfg, event_sender);

        let router = Router::new()
            .nest("/api/v1", inventory_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_json: false,
        auto_migrate: false,
        cors_allowed_origins: None,
        cors_allow_any_origin: false,
        // A single connection so every query sees the same in-memory database
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 5,
        db_idle_timeout_secs: 600,
        db_acquire_timeout_secs: 5,
        event_channel_capacity: 256,
    }
}

/// Decode a response body into JSON.
#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
