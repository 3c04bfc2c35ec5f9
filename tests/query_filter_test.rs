//! Integration tests for the lookup and filter endpoints.
//!
//! Tests cover:
//! - Case-insensitive name matching
//! - Visibility scoping of customer-facing lookups
//! - Inverted date ranges short-circuiting to empty results
//! - Joined lookups (barcode, category name)

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};

async fn post(app: &TestApp, uri: &str, payload: Value) -> Value {
    let response = app.request(Method::POST, uri, Some(payload)).await;
    assert_eq!(response.status(), 201, "seeding {uri} should succeed");
    response_json(response).await
}

#[tokio::test]
async fn name_lookup_is_case_insensitive() {
    let app = TestApp::new().await;
    post(&app, "/api/v1/products", json!({ "name": "Widget" })).await;

    let response = app
        .request(Method::GET, "/api/v1/products/find/name/WIDGET", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Widget");
}

#[tokio::test]
async fn invisible_products_are_hidden_from_name_lookup() {
    let app = TestApp::new().await;
    post(
        &app,
        "/api/v1/products",
        json!({ "name": "Hidden gadget", "visible": false }),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/products/find/name/Hidden%20gadget",
            None,
        )
        .await;
    assert_eq!(response.status(), 404);

    // But the invisible listing still reaches it
    let response = app
        .request(Method::GET, "/api/v1/products/find/invisible", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Hidden gadget"));
}

#[tokio::test]
async fn name_containing_matches_substring() {
    let app = TestApp::new().await;
    post(&app, "/api/v1/products", json!({ "name": "Copper pipe" })).await;
    post(&app, "/api/v1/products", json!({ "name": "Copper wire" })).await;
    post(&app, "/api/v1/products", json!({ "name": "Steel rod" })).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/products/find/name-containing/copper",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn barcode_lookup_joins_through_barcode_table() {
    let app = TestApp::new().await;

    let barcode = post(
        &app,
        "/api/v1/barcodes",
        json!({ "code": "7350053850019" }),
    )
    .await;
    let barcode_id = barcode["data"]["id"].as_i64().unwrap();

    post(
        &app,
        "/api/v1/products",
        json!({ "name": "Scanned item", "barcode_id": barcode_id }),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/products/find/barcode/7350053850019",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Scanned item");

    let response = app
        .request(Method::GET, "/api/v1/products/find/barcode/0000", None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn category_name_lookup_is_case_insensitive() {
    let app = TestApp::new().await;

    let category = post(&app, "/api/v1/categories", json!({ "name": "Plumbing" })).await;
    let category_id = category["data"]["id"].as_i64().unwrap();

    post(
        &app,
        "/api/v1/products",
        json!({ "name": "Elbow joint", "category_id": category_id }),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/products/find/category-name/PLUMBING",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["name"], "Elbow joint");
}

#[tokio::test]
async fn inverted_expiry_range_returns_empty() {
    let app = TestApp::new().await;
    post(
        &app,
        "/api/v1/products",
        json!({ "name": "Perishable", "date_of_expiry": "2026-06-15" }),
    )
    .await;

    // from > to short-circuits instead of erroring
    let response = app
        .request(
            Method::GET,
            "/api/v1/products/find/expiring?from=2026-12-31&to=2026-01-01",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"], json!([]));

    // A well-formed range finds it
    let response = app
        .request(
            Method::GET,
            "/api/v1/products/find/expiring?from=2026-01-01&to=2026-12-31",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["name"], "Perishable");
}

#[tokio::test]
async fn sku_lookup_returns_single_product() {
    let app = TestApp::new().await;
    post(
        &app,
        "/api/v1/products",
        json!({ "name": "Tagged", "sku": "TAG-9" }),
    )
    .await;

    let response = app
        .request(Method::GET, "/api/v1/products/find/sku/TAG-9", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Tagged");
}

#[tokio::test]
async fn stock_line_lookups_scope_through_the_owning_product() {
    let app = TestApp::new().await;

    let uom = post(&app, "/api/v1/uoms", json!({ "name": "each" })).await;
    let uom_id = uom["data"]["id"].as_i64().unwrap();

    let product = post(
        &app,
        "/api/v1/products",
        json!({
            "name": "Traceable",
            "reference": "PR-88",
            "search_key": "trace",
            "mpn": "MPN-12"
        }),
    )
    .await;
    let product_id = product["data"]["id"].as_i64().unwrap();

    let line = post(
        &app,
        "/api/v1/stock-lines",
        json!({ "product_id": product_id, "uom_id": uom_id, "units": "5" }),
    )
    .await;
    let line_id = line["data"]["id"].as_i64().unwrap();

    for uri in [
        "/api/v1/stock-lines/find/product-reference/PR-88",
        "/api/v1/stock-lines/find/product-search-key/trace",
        "/api/v1/stock-lines/find/product-mpn/MPN-12",
        "/api/v1/stock-lines/find/visible",
    ] {
        let response = app.request(Method::GET, uri, None).await;
        assert_eq!(response.status(), 200, "{uri}");
        let body = response_json(response).await;
        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![line_id], "{uri}");
    }

    let response = app
        .request(Method::GET, "/api/v1/stock-lines/find/invisible", None)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["data"], json!([]));
}

#[tokio::test]
async fn hidden_products_pull_their_lines_from_visible_lookups() {
    let app = TestApp::new().await;

    let uom = post(&app, "/api/v1/uoms", json!({ "name": "crate" })).await;
    let uom_id = uom["data"]["id"].as_i64().unwrap();

    let product = post(
        &app,
        "/api/v1/products",
        json!({ "name": "Shadow stock", "reference": "SH-1", "visible": false }),
    )
    .await;
    let product_id = product["data"]["id"].as_i64().unwrap();

    let line = post(
        &app,
        "/api/v1/stock-lines",
        json!({ "product_id": product_id, "uom_id": uom_id, "units": "2" }),
    )
    .await;
    let line_id = line["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::GET,
            "/api/v1/stock-lines/find/product-reference/SH-1",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["data"], json!([]));

    let response = app
        .request(Method::GET, "/api/v1/stock-lines/find/invisible", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["id"].as_i64(), Some(line_id));
}

#[tokio::test]
async fn tax_type_is_validated() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/taxes",
            Some(json!({ "name": "VAT", "rate": "20", "tax_type": "PERCENT" })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(
            Method::POST,
            "/api/v1/taxes",
            Some(json!({ "name": "VAT", "rate": "20", "tax_type": "PERCENTAGE" })),
        )
        .await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn note_requires_existing_product() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/notes",
            Some(json!({ "matter": "Orphan note", "product_id": 424242 })),
        )
        .await;
    assert_eq!(response.status(), 400);
}
