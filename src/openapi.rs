use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = r#"
# Inventory Management API

An API for managing products, their lookup data, stock batches and stock lines.

## Features

- **Products**: CRUD plus lookups by name, reference, SKU, MPN, barcode, category, status and dates
- **Stock**: batches of stock lines grouped under a delivery, with marshalled read views
- **Stock lines**: per-batch product quantities with supplier and location data
- **Stock adjustment**: batched decrement of stock levels with per-item outcomes
- **Marshalled views**: read models with every relation resolved in a single response

## Error Handling

Errors use a consistent envelope with appropriate HTTP status codes:

```json
{
  "error": "Product with id 42 not found",
  "status": 404
}
```

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20) query parameters.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product management endpoints"),
        (name = "Stocks", description = "Stock batch endpoints"),
        (name = "Stock lines", description = "Stock line and adjustment endpoints")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::get_marshalled_product,
        crate::handlers::products::find_by_barcode,
        crate::handlers::products::find_expiring_between,

        // Stocks
        crate::handlers::stocks::get_marshalled_stock,

        // Stock lines
        crate::handlers::stock_lines::get_marshalled_stock_line,
        crate::handlers::stock_lines::get_marshalled_stock_lines,
        crate::handlers::stock_lines::adjust_stock_levels,

        // Lookup CRUD intentionally omitted from OpenAPI paths for now
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,

            // Inputs
            crate::services::products::ProductInput,
            crate::services::stocks::StockInput,
            crate::services::stock_lines::StockLineInput,
            crate::services::stock_lines::StockAdjustment,
            crate::services::stock_lines::StockAdjustmentOutcome,
            crate::services::stock_lines::StockAdjustmentFailure,
            crate::services::stock_lines::StockAdjustmentErrorKind,
            crate::services::reference_data::CategoryInput,
            crate::services::reference_data::StatusInput,
            crate::services::reference_data::TaxCategoryInput,
            crate::services::reference_data::TaxInput,
            crate::services::reference_data::LabelInput,
            crate::services::reference_data::UomInput,
            crate::services::reference_data::BarcodeInput,
            crate::services::reference_data::NoteInput,

            // Marshalled views
            crate::models::views::ProductView,
            crate::models::views::ProductRef,
            crate::models::views::StockView,
            crate::models::views::StockLineView,
            crate::models::views::BarcodeView,
            crate::models::views::CategoryView,
            crate::models::views::TaxCategoryView,
            crate::models::views::StatusView,
            crate::models::views::LabelView,
            crate::models::views::NoteView,
            crate::models::views::UomView,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Inventory API"));
        assert!(json.contains("/api/v1/products"));
        assert!(json.contains("/api/v1/stock-lines/adjust"));
    }
}
