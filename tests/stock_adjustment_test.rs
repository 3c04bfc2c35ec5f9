//! Integration tests for batched stock-level adjustment.
//!
//! Tests cover:
//! - Happy-path decrements through the HTTP surface
//! - Partial batches: one bad item never aborts the rest
//! - Insufficient stock leaves the line untouched
//! - Zero-quantity items count as updated without a write
//! - Concurrent batches against the same line cannot lose updates

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use inventory_api::services::stock_lines::StockAdjustment;

/// Seeds a product, a uom and one stock line with the given units.
/// Returns the stock line id.
async fn seed_line(app: &TestApp, units: &str) -> i64 {
    let response = app
        .request(Method::POST, "/api/v1/uoms", Some(json!({ "name": "pcs" })))
        .await;
    assert_eq!(response.status(), 201);
    let uom_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Adjustable widget" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let product_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/stock-lines",
            Some(json!({
                "units": units,
                "product_id": product_id,
                "uom_id": uom_id
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn line_units(app: &TestApp, id: i64) -> Value {
    let response = app
        .request(Method::GET, &format!("/api/v1/stock-lines/{}", id), None)
        .await;
    assert_eq!(response.status(), 200);
    response_json(response).await["data"]["units"].clone()
}

#[tokio::test]
async fn adjustment_decrements_units() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "10").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/stock-lines/adjust",
            Some(json!([{ "stock_line_id": line_id, "quantity": "2" }])),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let outcome = &body["data"];
    assert_eq!(outcome["updated"][0]["units"], "8");
    assert_eq!(outcome["failures"], json!([]));

    assert_eq!(line_units(&app, line_id).await, "8");
}

#[tokio::test]
async fn one_bad_item_does_not_abort_the_batch() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "10").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/stock-lines/adjust",
            Some(json!([
                { "stock_line_id": line_id, "quantity": "3" },
                { "stock_line_id": 9999, "quantity": "1" },
                { "stock_line_id": line_id, "quantity": "4" }
            ])),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let outcome = &body["data"];

    let updated = outcome["updated"].as_array().unwrap();
    assert_eq!(updated.len(), 2);
    assert_eq!(updated[0]["units"], "7");
    assert_eq!(updated[1]["units"], "3");

    let failures = outcome["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["stock_line_id"], 9999);
    assert_eq!(failures[0]["kind"], "validation");

    assert_eq!(line_units(&app, line_id).await, "3");
}

#[tokio::test]
async fn insufficient_stock_leaves_line_untouched() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "5").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/stock-lines/adjust",
            Some(json!([{ "stock_line_id": line_id, "quantity": "7" }])),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let outcome = &body["data"];
    assert_eq!(outcome["updated"], json!([]));
    assert_eq!(outcome["failures"][0]["kind"], "insufficient_stock");

    assert_eq!(line_units(&app, line_id).await, "5");
}

#[tokio::test]
async fn negative_quantity_is_a_validation_failure() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "5").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/stock-lines/adjust",
            Some(json!([{ "stock_line_id": line_id, "quantity": "-1" }])),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["failures"][0]["kind"], "validation");
    assert_eq!(line_units(&app, line_id).await, "5");
}

#[tokio::test]
async fn zero_quantity_counts_as_updated() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "5").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/stock-lines/adjust",
            Some(json!([{ "stock_line_id": line_id, "quantity": "0" }])),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let outcome = &body["data"];
    assert_eq!(outcome["updated"][0]["units"], "5");
    assert_eq!(outcome["failures"], json!([]));
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::PUT, "/api/v1/stock-lines/adjust", Some(json!([])))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn concurrent_batches_do_not_lose_updates() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "10").await;

    let service_a = app.state.stock_lines.clone();
    let service_b = app.state.stock_lines.clone();

    let task_a = tokio::spawn(async move {
        service_a
            .adjust_stock_levels(vec![StockAdjustment {
                stock_line_id: line_id,
                quantity: dec!(3),
            }])
            .await
    });
    let task_b = tokio::spawn(async move {
        service_b
            .adjust_stock_levels(vec![StockAdjustment {
                stock_line_id: line_id,
                quantity: dec!(4),
            }])
            .await
    });

    let outcome_a = task_a.await.expect("task a").expect("batch a");
    let outcome_b = task_b.await.expect("task b").expect("batch b");
    assert!(outcome_a.failures.is_empty());
    assert!(outcome_b.failures.is_empty());

    let line = app.state.stock_lines.get(line_id).await.expect("line");
    assert_eq!(line.units, dec!(3));
}
