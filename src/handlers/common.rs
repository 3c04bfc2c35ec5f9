use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Upper bound on page size, applied when the query asks for more.
const MAX_PER_PAGE: u64 = 100;

/// Pagination parameters for list operations
#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page", deserialize_with = "clamped_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

fn clamped_per_page<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let requested = u64::deserialize(deserializer)?;
    Ok(requested.clamp(1, MAX_PER_PAGE))
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Calculate zero-based offset for pagination
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }
}

/// Standard pagination response metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Standard paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, per_page, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        let params = PaginationParams {
            page: 1,
            per_page: 20,
        };
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            page: 3,
            per_page: 10,
        };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let params = PaginationParams {
            page: 0,
            per_page: 10,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn per_page_is_clamped_to_bounds() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page":1,"per_page":5000}"#).unwrap();
        assert_eq!(params.per_page, 100);

        let params: PaginationParams = serde_json::from_str(r#"{"page":1,"per_page":0}"#).unwrap();
        assert_eq!(params.per_page, 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PaginationMeta::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 10, 11).total_pages, 2);
    }
}
