//! Common test utilities

#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use finance_projections::api::{self, AppState};
use finance_projections::event_store::EventStore;
use finance_projections::Aggregator;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::util::ServiceExt;

/// Full application over a fresh in-memory store
pub fn test_app() -> Router {
    test_app_with(Aggregator::new())
}

pub fn test_app_with(aggregator: Aggregator) -> Router {
    api::build_app(AppState::new(EventStore::new(), aggregator))
}

/// Send a request and decode the JSON response (Null for empty bodies)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, value)
}

/// Create a product and return its id
pub async fn create_product(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/v1/products", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "product creation failed: {}", body);
    body["product_id"].as_str().unwrap().to_string()
}

/// Projection JSON for week `week` with the given totals
pub fn projection(week: u32, revenue: i64, costs: i64) -> Value {
    json!({
        "week": week,
        "total_revenue": revenue.to_string(),
        "total_costs": costs.to_string(),
        "weekly_profit": (revenue - costs).to_string(),
    })
}

/// Read a decimal field serialized as a string
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}
