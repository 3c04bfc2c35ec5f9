//! Integration tests for the product endpoints.
//!
//! Tests cover:
//! - Product CRUD and validation
//! - Visibility defaulting
//! - The marshalled product view with resolved relations
//! - Notes attached to a product

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};

async fn create_product(app: &TestApp, payload: Value) -> Value {
    let response = app
        .request(Method::POST, "/api/v1/products", Some(payload))
        .await;
    assert_eq!(response.status(), 201, "product creation should succeed");
    response_json(response).await
}

#[tokio::test]
async fn create_and_fetch_product() {
    let app = TestApp::new().await;

    let body = create_product(
        &app,
        json!({
            "name": "Hammer",
            "sku": "HAM-001",
            "description": "Claw hammer"
        }),
    )
    .await;

    assert!(body["success"].as_bool().unwrap_or(false));
    let product = &body["data"];
    let id = product["id"].as_i64().expect("product id");
    assert_eq!(product["name"], "Hammer");
    assert_eq!(product["sku"], "HAM-001");
    // Visibility defaults to true when omitted
    assert_eq!(product["visible"], true);

    let response = app
        .request(Method::GET, &format!("/api/v1/products/{}", id), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Hammer");
}

#[tokio::test]
async fn create_through_the_service_persists_the_row() {
    let app = TestApp::new().await;

    // Insert without a preset id; defaults and timestamps are filled in
    let input: inventory_api::services::products::ProductInput =
        serde_json::from_value(json!({ "name": "Direct insert" })).unwrap();
    let product = app
        .state
        .products
        .create(input)
        .await
        .expect("service-level create");

    assert!(product.id > 0);
    assert!(product.visible);
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/api/v1/products", Some(json!({ "name": "" })))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn missing_product_returns_not_found() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/products/9999", None).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn update_replaces_fields() {
    let app = TestApp::new().await;

    let body = create_product(&app, json!({ "name": "Nail", "sku": "N-1" })).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/products/{}", id),
            Some(json!({ "name": "Galvanized nail", "visible": false })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Galvanized nail");
    assert_eq!(body["data"]["visible"], false);
    // sku was omitted from the replacement payload, so it is cleared
    assert_eq!(body["data"]["sku"], Value::Null);
}

#[tokio::test]
async fn delete_removes_product() {
    let app = TestApp::new().await;

    let body = create_product(&app, json!({ "name": "Ephemeral" })).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request(Method::DELETE, &format!("/api/v1/products/{}", id), None)
        .await;
    assert_eq!(response.status(), 204);

    let response = app
        .request(Method::GET, &format!("/api/v1/products/{}", id), None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn marshalled_product_resolves_relations() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "name": "Tools" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let category_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/statuses",
            Some(json!({ "name": "Active" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let status_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/tax-categories",
            Some(json!({ "name": "Standard rate" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let tax_category_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/barcodes",
            Some(json!({ "code": "5012345678900", "barcode_type": "EAN13" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let barcode_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let body = create_product(
        &app,
        json!({
            "name": "Screwdriver",
            "category_id": category_id,
            "status_id": status_id,
            "tax_category_id": tax_category_id,
            "barcode_id": barcode_id
        }),
    )
    .await;
    let product_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/notes",
            Some(json!({ "matter": "Check supplier pricing", "product_id": product_id })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products/{}/marshalled", product_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let view = &body["data"];

    assert_eq!(view["name"], "Screwdriver");
    assert_eq!(view["category"]["name"], "Tools");
    assert_eq!(view["status"]["name"], "Active");
    assert_eq!(view["tax_category"]["name"], "Standard rate");
    assert_eq!(view["barcode"]["code"], "5012345678900");
    assert_eq!(view["notes"][0]["matter"], "Check supplier pricing");
}

#[tokio::test]
async fn marshalled_product_tolerates_absent_relations() {
    let app = TestApp::new().await;

    let body = create_product(&app, json!({ "name": "Loose bolt" })).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products/{}/marshalled", id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let view = &body["data"];

    assert_eq!(view["category"], Value::Null);
    assert_eq!(view["status"], Value::Null);
    assert_eq!(view["barcode"], Value::Null);
    assert_eq!(view["labels"], json!([]));
    assert_eq!(view["notes"], json!([]));
}

#[tokio::test]
async fn repeated_marshalling_returns_the_same_view() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "name": "Fasteners" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let category_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let body = create_product(
        &app,
        json!({ "name": "Wing nut", "category_id": category_id }),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/products/{}/marshalled", id);
    let first = response_json(app.request(Method::GET, &uri, None).await).await;
    let second = response_json(app.request(Method::GET, &uri, None).await).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn product_notes_are_paginated_in_id_order() {
    let app = TestApp::new().await;

    let body = create_product(&app, json!({ "name": "Annotated" })).await;
    let id = body["data"]["id"].as_i64().unwrap();

    for matter in ["first", "second", "third"] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/notes",
                Some(json!({ "matter": matter, "product_id": id })),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products/{}/notes?page=1&per_page=2", id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let notes = body["data"].as_array().expect("notes array");
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["matter"], "first");
    assert_eq!(notes[1]["matter"], "second");
}
