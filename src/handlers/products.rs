use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::queries::product_queries::{
    GetProductByBarcodeCodeQuery, GetProductByMpnQuery, GetProductByNameQuery,
    GetProductByReferenceQuery, GetProductBySearchKeyQuery, GetProductBySkuQuery,
    ListInvisibleProductsQuery, ListProductsByCategoryIdQuery, ListProductsByCategoryNameQuery,
    ListProductsByDateOfExpiryQuery, ListProductsByDateOfMfdQuery, ListProductsByStatusNameQuery,
    ListProductsExpiringBetweenQuery, ListVisibleProductsQuery, SearchProductsByNameQuery,
};
use crate::queries::Query as StoreQuery;
use crate::services::products::ProductInput;
use crate::{ApiResponse, AppState};

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/marshalled", get(get_marshalled_product))
        .route("/:id/notes", get(get_product_notes))
        .route("/find/name/:name", get(find_by_name))
        .route("/find/name-containing/:name", get(find_by_name_containing))
        .route("/find/reference/:reference", get(find_by_reference))
        .route("/find/sku/:sku", get(find_by_sku))
        .route("/find/search-key/:search_key", get(find_by_search_key))
        .route("/find/mpn/:mpn", get(find_by_mpn))
        .route("/find/barcode/:code", get(find_by_barcode))
        .route("/find/category/:category_id", get(find_by_category_id))
        .route("/find/category-name/:name", get(find_by_category_name))
        .route("/find/status/:name", get(find_by_status_name))
        .route("/find/mfd/:date", get(find_by_date_of_mfd))
        .route("/find/expiry/:date", get(find_by_date_of_expiry))
        .route("/find/expiring", get(find_expiring_between))
        .route("/find/visible", get(find_visible))
        .route("/find/invisible", get(find_invisible))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DateRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .products
        .create(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(ApiResponse::success(product)))
}

/// List products with pagination
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(PaginationParams),
    responses((status = 200, description = "Paginated products")),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (items, total) = state
        .products
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

/// Get one product row (relations unresolved)
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state.products.get(id).await.map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

/// Get the fully marshalled product view
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/marshalled",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Marshalled product", body = crate::models::views::ProductView),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_marshalled_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .products
        .marshalled_product(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(view)))
}

async fn get_product_notes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let notes = state
        .products
        .notes_for_product(id, pagination.per_page, pagination.offset())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(notes)))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    request_body = ProductInput,
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .products
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state.products.delete(id).await.map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn find_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = GetProductByNameQuery { name }
        .execute(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

async fn find_by_name_containing(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = SearchProductsByNameQuery {
        name_contains: name,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

async fn find_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = GetProductByReferenceQuery { reference }
        .execute(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

async fn find_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = GetProductBySkuQuery { sku }
        .execute(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

async fn find_by_search_key(
    State(state): State<AppState>,
    Path(search_key): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = GetProductBySearchKeyQuery { search_key }
        .execute(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

async fn find_by_mpn(
    State(state): State<AppState>,
    Path(mpn): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = GetProductByMpnQuery { mpn }
        .execute(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

/// Resolve a product by its barcode code
#[utoipa::path(
    get,
    path = "/api/v1/products/find/barcode/{code}",
    params(("code" = String, Path, description = "Barcode code")),
    responses(
        (status = 200, description = "Product found"),
        (status = 404, description = "No visible product carries this barcode", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn find_by_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = GetProductByBarcodeCodeQuery { code }
        .execute(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(product)))
}

async fn find_by_category_id(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListProductsByCategoryIdQuery {
        category_id,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

async fn find_by_category_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListProductsByCategoryNameQuery {
        category_name: name,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

async fn find_by_status_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListProductsByStatusNameQuery {
        status_name: name,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

async fn find_by_date_of_mfd(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListProductsByDateOfMfdQuery {
        date,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

async fn find_by_date_of_expiry(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListProductsByDateOfExpiryQuery {
        date,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

/// Products expiring within an inclusive date range
#[utoipa::path(
    get,
    path = "/api/v1/products/find/expiring",
    params(DateRangeParams, PaginationParams),
    responses((status = 200, description = "Products expiring in range")),
    tag = "Products"
)]
pub async fn find_expiring_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListProductsExpiringBetweenQuery {
        from: range.from,
        to: range.to,
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

async fn find_visible(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListVisibleProductsQuery {
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}

async fn find_invisible(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = ListInvisibleProductsQuery {
        limit: pagination.per_page,
        offset: pagination.offset(),
    }
    .execute(&state.db)
    .await
    .map_err(map_service_error)?;
    Ok(success_response(ApiResponse::success(products)))
}
