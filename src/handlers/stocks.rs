use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;

use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::handlers::products::DateRangeParams;
use crate::queries::stock_queries::{
    ListStocksByDateOfStockUpdatedQuery, ListStocksByStatusNameQuery, ListStocksUpdatedBetweenQuery,
};
use crate::queries::Query as StoreQuery;
use crate::services::stocks::StockInput;
use crate::{ApiResponse, AppState};

/// Creates the router for stock endpoints
pub fn stocks_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stocks).post(create_stock))
        .route(
            "/:id",
            get(get_stock).put(update_stock).delete(delete_stock),
        )
        .route("/:id/marshalled", get(get_marshalled_stock))
        .route("/find/reference/:reference", get(find_by_reference))
        .route(
            "/find/delivery-note/:delivery_note_ref",
            get(find_by_delivery_note_ref),
        )
        .route("/find/updated-on/:date", get(find_by_date_of_stock_updated))
        .route("/find/updated-between", get(find_updated_between))
        .route("/find/status/:name", get(find_by_status_name))
}

async fn create_stock(
    State(state): State<AppState>,
    Json(payload): Json<StockInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let stock = state
        .stocks
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(ApiResponse::success(stock)))
}

async fn list_stocks(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (items, total) = state
        .stocks
        .list(pagination.per_page, pagination.offset())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        items,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

async fn get_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let stock = state.stocks.get(id).await.map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(stock)))
}

/// Get the fully marshalled stock view
#[utoipa::path(
    get,
    path = "/api/v1/stocks/{id}/marshalled",
    params(("id" = i64, Path, description = "Stock id")),
    responses(
        (status = 200, description = "Marshalled stock", body = crate::models::views::StockView),
        (status = 404, description = "Stock not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "A grouped line references missing product or uom", body = crate::errors::ErrorResponse)
    ),
    tag = "Stocks"
)]
pub async fn get_marshalled_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .stocks
        .marshalled_stock(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(view)))
}

async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let stock = state
        .stocks
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(stock)))
}

async fn delete_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state.stocks.delete(id).await.map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn find_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let stock = state
        .stocks
        .find_by_reference(&reference)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(stock)))
}

async fn find_by_delivery_note_ref(
    State(state): State<AppState>,
    Path(delivery_note_ref): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let stock = state
        .stocks
        .find_by_delivery_note_ref(delivery_note_ref)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(stock)))
}

async fn find_by_date_of_stock_updated(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let stocks = ListStocksByDateOfStockUpdatedQuery {
        date,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(stocks)))
}

async fn find_updated_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let stocks = ListStocksUpdatedBetweenQuery {
        from: range.from,
        to: range.to,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(stocks)))
}

async fn find_by_status_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let stocks = ListStocksByStatusNameQuery {
        status_name: name,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(stocks)))
}
