//! Inventory API Library
//!
//! This crate provides the core functionality for the inventory API:
//! products and their lookup data, stock batches, stock lines, marshalled
//! read views and batched stock-level adjustment.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod queries;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub products: services::ProductService,
    pub stocks: services::StockService,
    pub stock_lines: services::StockLineService,
    pub reference_data: services::ReferenceDataService,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        Self {
            products: services::ProductService::new(db.clone(), event_sender.clone()),
            stocks: services::StockService::new(db.clone(), event_sender.clone()),
            stock_lines: services::StockLineService::new(db.clone(), event_sender.clone()),
            reference_data: services::ReferenceDataService::new(db.clone()),
            db,
            config,
            event_sender,
        }
    }
}

// Common response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// All /api/v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Products API
        .nest("/products", handlers::products::products_routes())
        // Stock API
        .nest("/stocks", handlers::stocks::stocks_routes())
        .nest("/stock-lines", handlers::stock_lines::stock_lines_routes())
        // Lookup data API
        .nest("/categories", handlers::lookups::categories_routes())
        .nest("/statuses", handlers::lookups::statuses_routes())
        .nest("/tax-categories", handlers::lookups::tax_categories_routes())
        .nest("/taxes", handlers::lookups::taxes_routes())
        .nest("/labels", handlers::lookups::labels_routes())
        .nest("/uoms", handlers::lookups::uoms_routes())
        .nest("/barcodes", handlers::lookups::barcodes_routes())
        .nest("/notes", handlers::lookups::notes_routes())
}

pub async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "inventory-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    // Check database connectivity
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

// Request logging middleware
pub async fn request_logging_middleware(
    request: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    tracing::info!(method = %method, uri = %uri, "Incoming request");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = status.as_u16(),
        elapsed_ms = duration.as_millis() as u64,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_carries_data() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert!(response.message.is_none());
    }

    #[test]
    fn error_response_carries_message() {
        let response = ApiResponse::<()>::error("oops".into());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("oops"));
    }

    #[test]
    fn validation_errors_are_listed() {
        let response = ApiResponse::<()>::validation_errors(vec!["missing".into()]);
        assert!(!response.success);
        assert_eq!(response.errors, Some(vec!["missing".to_string()]));
    }
}
