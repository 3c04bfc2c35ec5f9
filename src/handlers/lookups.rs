//! CRUD routes for the lookup resources. All of these follow the same
//! shape; a macro keeps the handler bodies from being copied eight times.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::services::reference_data::{
    BarcodeInput, CategoryInput, LabelInput, NoteInput, StatusInput, TaxCategoryInput, TaxInput,
    UomInput,
};
use crate::{ApiResponse, AppState};

macro_rules! lookup_handlers {
    ($create:ident, $list:ident, $get:ident, $update:ident, $delete:ident,
     $input:ty, $svc_create:ident, $svc_list:ident, $svc_get:ident,
     $svc_update:ident, $svc_delete:ident) => {
        async fn $create(
            State(state): State<AppState>,
            Json(payload): Json<$input>,
        ) -> Result<impl axum::response::IntoResponse, ApiError> {
            validate_input(&payload)?;
            let model = state
                .reference_data
                .$svc_create(payload)
                .await
                .map_err(map_service_error)?;
            Ok(created_response(ApiResponse::success(model)))
        }

        async fn $list(
            State(state): State<AppState>,
            Query(pagination): Query<PaginationParams>,
        ) -> Result<impl axum::response::IntoResponse, ApiError> {
            let (items, total) = state
                .reference_data
                .$svc_list(pagination.per_page, pagination.offset())
                .await
                .map_err(map_service_error)?;
            Ok(success_response(PaginatedResponse::new(
                items,
                pagination.page,
                pagination.per_page,
                total,
            )))
        }

        async fn $get(
            State(state): State<AppState>,
            Path(id): Path<i64>,
        ) -> Result<impl axum::response::IntoResponse, ApiError> {
            let model = state
                .reference_data
                .$svc_get(id)
                .await
                .map_err(map_service_error)?;
            Ok(success_response(ApiResponse::success(model)))
        }

        async fn $update(
            State(state): State<AppState>,
            Path(id): Path<i64>,
            Json(payload): Json<$input>,
        ) -> Result<impl axum::response::IntoResponse, ApiError> {
            validate_input(&payload)?;
            let model = state
                .reference_data
                .$svc_update(id, payload)
                .await
                .map_err(map_service_error)?;
            Ok(success_response(ApiResponse::success(model)))
        }

        async fn $delete(
            State(state): State<AppState>,
            Path(id): Path<i64>,
        ) -> Result<impl axum::response::IntoResponse, ApiError> {
            state
                .reference_data
                .$svc_delete(id)
                .await
                .map_err(map_service_error)?;
            Ok(no_content_response())
        }
    };
}

lookup_handlers!(
    create_category,
    list_categories,
    get_category,
    update_category,
    delete_category,
    CategoryInput,
    create_category,
    list_categories,
    get_category,
    update_category,
    delete_category
);

lookup_handlers!(
    create_status,
    list_statuses,
    get_status,
    update_status,
    delete_status,
    StatusInput,
    create_status,
    list_statuses,
    get_status,
    update_status,
    delete_status
);

lookup_handlers!(
    create_tax_category,
    list_tax_categories,
    get_tax_category,
    update_tax_category,
    delete_tax_category,
    TaxCategoryInput,
    create_tax_category,
    list_tax_categories,
    get_tax_category,
    update_tax_category,
    delete_tax_category
);

lookup_handlers!(
    create_tax,
    list_taxes,
    get_tax,
    update_tax,
    delete_tax,
    TaxInput,
    create_tax,
    list_taxes,
    get_tax,
    update_tax,
    delete_tax
);

lookup_handlers!(
    create_label,
    list_labels,
    get_label,
    update_label,
    delete_label,
    LabelInput,
    create_label,
    list_labels,
    get_label,
    update_label,
    delete_label
);

lookup_handlers!(
    create_uom,
    list_uoms,
    get_uom,
    update_uom,
    delete_uom,
    UomInput,
    create_uom,
    list_uoms,
    get_uom,
    update_uom,
    delete_uom
);

lookup_handlers!(
    create_barcode,
    list_barcodes,
    get_barcode,
    update_barcode,
    delete_barcode,
    BarcodeInput,
    create_barcode,
    list_barcodes,
    get_barcode,
    update_barcode,
    delete_barcode
);

lookup_handlers!(
    create_note,
    list_notes,
    get_note,
    update_note,
    delete_note,
    NoteInput,
    create_note,
    list_notes,
    get_note,
    update_note,
    delete_note
);

pub fn categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

pub fn statuses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_statuses).post(create_status))
        .route(
            "/:id",
            get(get_status).put(update_status).delete(delete_status),
        )
}

pub fn tax_categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tax_categories).post(create_tax_category))
        .route(
            "/:id",
            get(get_tax_category)
                .put(update_tax_category)
                .delete(delete_tax_category),
        )
}

pub fn taxes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_taxes).post(create_tax))
        .route("/:id", get(get_tax).put(update_tax).delete(delete_tax))
}

pub fn labels_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_labels).post(create_label))
        .route(
            "/:id",
            get(get_label).put(update_label).delete(delete_label),
        )
}

pub fn uoms_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_uoms).post(create_uom))
        .route("/:id", get(get_uom).put(update_uom).delete(delete_uom))
}

pub fn barcodes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_barcodes).post(create_barcode))
        .route(
            "/:id",
            get(get_barcode).put(update_barcode).delete(delete_barcode),
        )
}

pub fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", get(get_note).put(update_note).delete(delete_note))
}
