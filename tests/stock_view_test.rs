//! Integration tests for stock batches and their marshalled views.
//!
//! Tests cover:
//! - Grouping stock lines under a batch in a caller-chosen order
//! - The marshalled stock view preserving that order
//! - The reduced product embed inside line views
//! - Bulk marshalled stock lines in requested-id order

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

struct Seeded {
    product_id: i64,
    line_ids: Vec<i64>,
}

/// Seeds a tax category, product, uom and `count` stock lines.
async fn seed_lines(app: &TestApp, count: usize) -> Seeded {
    let response = app
        .request(
            Method::POST,
            "/api/v1/tax-categories",
            Some(json!({ "name": "Standard" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let tax_category_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Grouped widget", "tax_category_id": tax_category_id })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let product_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(Method::POST, "/api/v1/uoms", Some(json!({ "name": "box" })))
        .await;
    assert_eq!(response.status(), 201);
    let uom_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let mut line_ids = Vec::with_capacity(count);
    for n in 0..count {
        let response = app
            .request(
                Method::POST,
                "/api/v1/stock-lines",
                Some(json!({
                    "reference": format!("SL-{n}"),
                    "units": "10",
                    "product_id": product_id,
                    "uom_id": uom_id
                })),
            )
            .await;
        assert_eq!(response.status(), 201);
        line_ids.push(response_json(response).await["data"]["id"].as_i64().unwrap());
    }

    Seeded {
        product_id,
        line_ids,
    }
}

#[tokio::test]
async fn marshalled_stock_preserves_grouping_order() {
    let app = TestApp::new().await;
    let seeded = seed_lines(&app, 3).await;
    let (a, b, c) = (
        seeded.line_ids[0],
        seeded.line_ids[1],
        seeded.line_ids[2],
    );

    // Group in an order that differs from insertion order
    let response = app
        .request(
            Method::POST,
            "/api/v1/stocks",
            Some(json!({
                "reference": "STK-1",
                "delivery_note_ref": 42,
                "stock_line_ids": [c, a, b]
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let stock_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stocks/{}/marshalled", stock_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let view = &body["data"];

    assert_eq!(view["reference"], "STK-1");
    assert_eq!(view["delivery_note_ref"], 42);

    let ids: Vec<i64> = view["stock_lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![c, a, b]);

    // Each line embeds the reduced product with its tax category
    let first = &view["stock_lines"][0];
    assert_eq!(first["product"]["id"], seeded.product_id);
    assert_eq!(first["product"]["name"], "Grouped widget");
    assert_eq!(first["product"]["tax_category"]["name"], "Standard");
    assert_eq!(first["uom"]["name"], "box");
}

#[tokio::test]
async fn updating_a_stock_replaces_its_grouping() {
    let app = TestApp::new().await;
    let seeded = seed_lines(&app, 2).await;
    let (a, b) = (seeded.line_ids[0], seeded.line_ids[1]);

    let response = app
        .request(
            Method::POST,
            "/api/v1/stocks",
            Some(json!({ "stock_line_ids": [a, b] })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let stock_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/stocks/{}", stock_id),
            Some(json!({ "stock_line_ids": [b] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stocks/{}/marshalled", stock_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let ids: Vec<i64> = body["data"]["stock_lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![b]);
}

#[tokio::test]
async fn unknown_line_ids_fail_stock_creation() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/stocks",
            Some(json!({ "stock_line_ids": [12345] })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn marshalled_stock_lines_follow_requested_order() {
    let app = TestApp::new().await;
    let seeded = seed_lines(&app, 3).await;
    let (a, b, c) = (
        seeded.line_ids[0],
        seeded.line_ids[1],
        seeded.line_ids[2],
    );

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stock-lines/marshalled?ids={},{},{}", c, a, b),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![c, a, b]);
}

#[tokio::test]
async fn unresolvable_ids_are_dropped_from_bulk_marshalling() {
    let app = TestApp::new().await;
    let seeded = seed_lines(&app, 2).await;
    let (a, b) = (seeded.line_ids[0], seeded.line_ids[1]);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stock-lines/marshalled?ids={},9999,{}", b, a),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![b, a]);
}

#[tokio::test]
async fn non_numeric_ids_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/stock-lines/marshalled?ids=1,abc",
            None,
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn stock_find_by_reference() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/stocks",
            Some(json!({ "reference": "STK-REF-7" })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request(
            Method::GET,
            "/api/v1/stocks/find/reference/STK-REF-7",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["reference"], "STK-REF-7");

    let response = app
        .request(Method::GET, "/api/v1/stocks/find/reference/missing", None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn deleting_a_stock_keeps_its_lines() {
    let app = TestApp::new().await;
    let seeded = seed_lines(&app, 1).await;
    let line = seeded.line_ids[0];

    let response = app
        .request(
            Method::POST,
            "/api/v1/stocks",
            Some(json!({ "stock_line_ids": [line] })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let stock_id = response_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .request(Method::DELETE, &format!("/api/v1/stocks/{}", stock_id), None)
        .await;
    assert_eq!(response.status(), 204);

    // The grouped line survives its batch
    let response = app
        .request(Method::GET, &format!("/api/v1/stock-lines/{}", line), None)
        .await;
    assert_eq!(response.status(), 200);
}
