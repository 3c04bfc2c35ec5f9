use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::handlers::products::DateRangeParams;
use crate::queries::stock_line_queries::{
    ListInvisibleStockLinesQuery, ListStockLinesByInfrastructureIdQuery,
    ListStockLinesByLocationIdQuery, ListStockLinesByProductBarcodeQuery,
    ListStockLinesByProductExpiryBetweenQuery, ListStockLinesByProductIdQuery,
    ListStockLinesByProductMpnQuery, ListStockLinesByProductNameQuery,
    ListStockLinesByProductReferenceQuery, ListStockLinesByProductSearchKeyQuery,
    ListStockLinesByProductSkuQuery, ListStockLinesBySupplierRefQuery,
    ListVisibleStockLinesQuery,
};
use crate::queries::Query as StoreQuery;
use crate::services::stock_lines::{StockAdjustment, StockLineInput};
use crate::{ApiResponse, AppState};

/// Creates the router for stock line endpoints
pub fn stock_lines_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stock_lines).post(create_stock_line))
        .route(
            "/:id",
            get(get_stock_line)
                .put(update_stock_line)
                .delete(delete_stock_line),
        )
        .route("/:id/marshalled", get(get_marshalled_stock_line))
        .route("/marshalled", get(get_marshalled_stock_lines))
        .route("/adjust", put(adjust_stock_levels))
        .route("/find/reference/:reference", get(find_by_reference))
        .route("/find/product/:product_id", get(find_by_product_id))
        .route("/find/product-name/:name", get(find_by_product_name))
        .route("/find/product-sku/:sku", get(find_by_product_sku))
        .route(
            "/find/product-reference/:reference",
            get(find_by_product_reference),
        )
        .route(
            "/find/product-search-key/:search_key",
            get(find_by_product_search_key),
        )
        .route("/find/product-mpn/:mpn", get(find_by_product_mpn))
        .route("/find/product-barcode/:code", get(find_by_product_barcode))
        .route("/find/visible", get(find_visible))
        .route("/find/invisible", get(find_invisible))
        .route("/find/supplier/:supplier_ref", get(find_by_supplier_ref))
        .route(
            "/find/infrastructure/:infrastructure_id",
            get(find_by_infrastructure_id),
        )
        .route("/find/location/:location_id", get(find_by_location_id))
        .route("/find/expiring", get(find_by_product_expiry_between))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MarshalledIdsParams {
    /// Comma-separated stock line ids
    pub ids: String,
}

async fn create_stock_line(
    State(state): State<AppState>,
    Json(payload): Json<StockLineInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let line = state
        .stock_lines
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(ApiResponse::success(line)))
}

async fn list_stock_lines(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (items, total) = state
        .stock_lines
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

async fn get_stock_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state.stock_lines.get(id).await.map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(line)))
}

async fn update_stock_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockLineInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let line = state
        .stock_lines
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(line)))
}

async fn delete_stock_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .stock_lines
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

/// Get one marshalled stock line
#[utoipa::path(
    get,
    path = "/api/v1/stock-lines/{id}/marshalled",
    params(("id" = i64, Path, description = "Stock line id")),
    responses(
        (status = 200, description = "Marshalled stock line", body = crate::models::views::StockLineView),
        (status = 404, description = "Stock line not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Line references missing product or uom", body = crate::errors::ErrorResponse)
    ),
    tag = "Stock lines"
)]
pub async fn get_marshalled_stock_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .stock_lines
        .marshalled_stock_line(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(view)))
}

/// Get several marshalled stock lines at once
#[utoipa::path(
    get,
    path = "/api/v1/stock-lines/marshalled",
    params(MarshalledIdsParams),
    responses((status = 200, description = "Marshalled stock lines")),
    tag = "Stock lines"
)]
pub async fn get_marshalled_stock_lines(
    State(state): State<AppState>,
    Query(params): Query<MarshalledIdsParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let ids: Vec<i64> = params
        .ids
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse::<i64>()
                .map_err(|_| ApiError::ValidationError(format!("invalid id '{}'", s.trim())))
        })
        .collect::<Result<_, _>>()?;

    let views = state
        .stock_lines
        .marshalled_stock_lines(ids)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(views)))
}

/// Apply a batch of stock level decrements
#[utoipa::path(
    put,
    path = "/api/v1/stock-lines/adjust",
    request_body = Vec<StockAdjustment>,
    responses(
        (status = 200, description = "Batch processed; per-item outcomes inside", body = crate::services::stock_lines::StockAdjustmentOutcome),
        (status = 400, description = "Empty batch", body = crate::errors::ErrorResponse)
    ),
    tag = "Stock lines"
)]
pub async fn adjust_stock_levels(
    State(state): State<AppState>,
    Json(batch): Json<Vec<StockAdjustment>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let outcome = state
        .stock_lines
        .adjust_stock_levels(batch)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(outcome)))
}

async fn find_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state
        .stock_lines
        .find_by_reference(&reference)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(line)))
}

async fn find_by_product_id(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductIdQuery {
        product_id,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_product_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductNameQuery {
        product_name: name,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_product_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductSkuQuery {
        sku,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_product_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductReferenceQuery {
        reference,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_product_search_key(
    State(state): State<AppState>,
    Path(search_key): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductSearchKeyQuery {
        search_key,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_product_mpn(
    State(state): State<AppState>,
    Path(mpn): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductMpnQuery {
        mpn,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_visible(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListVisibleStockLinesQuery {
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_invisible(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListInvisibleStockLinesQuery {
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_product_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductBarcodeQuery {
        code,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_supplier_ref(
    State(state): State<AppState>,
    Path(supplier_ref): Path<i64>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesBySupplierRefQuery {
        supplier_ref,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_infrastructure_id(
    State(state): State<AppState>,
    Path(infrastructure_id): Path<i64>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByInfrastructureIdQuery {
        infrastructure_id,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_location_id(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByLocationIdQuery {
        location_id,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}

async fn find_by_product_expiry_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = ListStockLinesByProductExpiryBetweenQuery {
        from: range.from,
        to: range.to,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(lines)))
}
