//! API Integration Tests

use axum::http::StatusCode;
use finance_projections::Aggregator;
use rust_decimal_macros::dec;
use serde_json::json;

mod common;

use common::{create_product, decimal, projection, send};

#[tokio::test]
async fn test_health() {
    let app = common::test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_forecast_with_actual_e2e() {
    let app = common::test_app();

    // 1. Create product
    let id = create_product(&app, "Harbour Festival").await;

    // 2. Load projections (weeks deliberately out of order)
    let weeks = json!({
        "weeks": [
            projection(3, 100, 50),
            projection(1, 100, 150),
            projection(2, 100, 50),
            projection(4, 100, 50),
        ]
    });
    let (status, body) = send(&app, "PUT", &format!("/api/v1/products/{}/projections", id), Some(weeks)).await;
    assert_eq!(status, StatusCode::OK, "projections failed: {}", body);
    assert_eq!(body["version"], 2);

    // Report before actuals: break-even in week 3
    let (status, report) = send(&app, "GET", &format!("/api/v1/products/{}/report", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["break_even_week"], 3);
    assert_eq!(decimal(&report["total_revenue"]), dec!(400));
    assert_eq!(decimal(&report["variance_revenue"]), dec!(0));

    // 3. Record actual for week 1
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/products/{}/actuals/1", id),
        Some(json!({ "revenue": "200", "expenses": "50" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "actual failed: {}", body);

    // 4. Report reflects the actual
    let (status, report) = send(&app, "GET", &format!("/api/v1/products/{}/report", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["product_id"], id.as_str());
    assert_eq!(decimal(&report["total_revenue"]), dec!(500));
    assert_eq!(decimal(&report["variance_revenue"]), dec!(100));
    assert_eq!(report["break_even_week"], 1);
    assert_eq!(report["weeks_with_actuals"], 1);
    assert_eq!(decimal(&report["actuals_coverage_percent"]), dec!(25));

    // Weekly rows end at the total profit
    let (status, rows) = send(&app, "GET", &format!("/api/v1/products/{}/weeks", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows["weeks"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["source"], "actual");
    assert_eq!(
        decimal(&rows[3]["cumulative_profit"]),
        decimal(&report["total_profit"])
    );
}

#[tokio::test]
async fn test_product_listing_and_detail() {
    let app = common::test_app();
    let first = create_product(&app, "Alpha").await;
    let second = create_product(&app, "Beta").await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/products/{}", second),
        Some(json!({ "name": "Beta Live" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 2);

    let (status, list) = send(&app, "GET", "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2);
    assert_eq!(list["products"][0]["id"], first.as_str());
    assert_eq!(list["products"][1]["name"], "Beta Live");

    let (status, detail) = send(&app, "GET", &format!("/api/v1/products/{}", first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Alpha");
    assert_eq!(detail["projections"], json!([]));
    assert_eq!(detail["actuals"], json!([]));
}

#[tokio::test]
async fn test_orphan_actual_reported_as_warning() {
    let app = common::test_app();
    let id = create_product(&app, "Expo").await;

    let weeks: Vec<_> = (1..=10).map(|w| projection(w, 100, 40)).collect();
    send(&app, "PUT", &format!("/api/v1/products/{}/projections", id), Some(json!({ "weeks": weeks }))).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/products/{}/actuals/99", id),
        Some(json!({ "revenue": "5000", "expenses": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, report) = send(&app, "GET", &format!("/api/v1/products/{}/report", id), None).await;
    assert_eq!(decimal(&report["total_revenue"]), dec!(1000));
    assert_eq!(report["weeks_with_actuals"], 0);
    assert_eq!(report["warnings"], json!([{ "kind": "orphan_actual", "week": 99 }]));
}

#[tokio::test]
async fn test_remove_actual() {
    let app = common::test_app();
    let id = create_product(&app, "Gala").await;
    let uri = format!("/api/v1/products/{}/actuals/2", id);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "actual_not_found");

    send(&app, "PUT", &uri, Some(json!({ "expenses": "12.5" }))).await;
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_quarters_and_history() {
    let app = common::test_app_with(Aggregator::new().with_weeks_per_quarter(2));
    let id = create_product(&app, "Season").await;

    let weeks: Vec<_> = (1..=5).map(|w| projection(w, 10, 4)).collect();
    send(&app, "PUT", &format!("/api/v1/products/{}/projections", id), Some(json!({ "weeks": weeks }))).await;

    let (status, body) = send(&app, "GET", &format!("/api/v1/products/{}/quarters", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weeks_per_quarter"], 2);
    let quarters = body["quarters"].as_array().unwrap();
    assert_eq!(quarters.len(), 3);
    assert_eq!(quarters[2]["week_count"], 1);
    let revenue: rust_decimal::Decimal = quarters.iter().map(|q| decimal(&q["revenue"])).sum();
    assert_eq!(revenue, dec!(50));

    let (status, history) = send(&app, "GET", &format!("/api/v1/products/{}/history", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = history["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["event_type"], "ProductCreated");
    assert_eq!(entries[1]["event_type"], "ProjectionsReplaced");
    assert!(entries[0]["context"]["correlation_id"].is_string());
}

#[tokio::test]
async fn test_invalid_input_rejected() {
    let app = common::test_app();
    let id = create_product(&app, "Tour").await;
    let projections_uri = format!("/api/v1/products/{}/projections", id);

    // Duplicate week
    let body = json!({ "weeks": [projection(1, 10, 5), projection(1, 12, 5)] });
    let (status, error) = send(&app, "PUT", &projections_uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error_code"], "invalid_input");

    // Zero week number fails to deserialize
    let body = json!({ "weeks": [projection(0, 10, 5)] });
    let (status, error) = send(&app, "PUT", &projections_uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error_code"], "invalid_input");

    // Bad week in path
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/products/{}/actuals/-3", id),
        Some(json!({ "revenue": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Actual without figures
    let (status, _) = send(&app, "PUT", &format!("/api/v1/products/{}/actuals/1", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Blank name
    let (status, _) = send(&app, "POST", "/api/v1/products", Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored by the rejected writes
    let (_, detail) = send(&app, "GET", &format!("/api/v1/products/{}", id), None).await;
    assert_eq!(detail["version"], 1);
}

#[tokio::test]
async fn test_unknown_product() {
    let app = common::test_app();
    let missing = uuid::Uuid::new_v4();

    for path in ["", "/report", "/weeks", "/quarters", "/history"] {
        let (status, body) = send(&app, "GET", &format!("/api/v1/products/{}{}", missing, path), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {}", path);
        assert_eq!(body["error_code"], "product_not_found");
    }

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/products/{}/projections", missing),
        Some(json!({ "weeks": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_forecast_report() {
    let app = common::test_app();
    let id = create_product(&app, "Blank").await;

    let (status, report) = send(&app, "GET", &format!("/api/v1/products/{}/report", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["week_count"], 0);
    assert_eq!(report["break_even_week"], 1);
    assert_eq!(decimal(&report["profit_margin"]), dec!(0));
    assert_eq!(decimal(&report["actuals_coverage_percent"]), dec!(0));
}

#[tokio::test]
async fn test_report_rejects_unrepresentable_totals() {
    let app = common::test_app();
    let id = create_product(&app, "Mega Tour").await;
    let max = rust_decimal::Decimal::MAX.to_string();
    let huge = |week: u32| {
        json!({ "week": week, "total_revenue": max, "total_costs": "0", "weekly_profit": max })
    };

    let body = json!({ "weeks": [huge(1), huge(2)] });
    let (status, _) = send(&app, "PUT", &format!("/api/v1/products/{}/projections", id), Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    for path in ["/report", "/weeks", "/quarters"] {
        let (status, error) = send(&app, "GET", &format!("/api/v1/products/{}{}", id, path), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "GET {}", path);
        assert_eq!(error["error_code"], "invalid_input");
    }
}

#[tokio::test]
async fn test_projection_profit_must_match_totals() {
    let app = common::test_app();
    let id = create_product(&app, "Fair").await;

    let mut week = projection(1, 100, 150);
    week["weekly_profit"] = json!("500");
    let (status, error) = send(
        &app,
        "PUT",
        &format!("/api/v1/products/{}/projections", id),
        Some(json!({ "weeks": [week] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error_code"], "invalid_input");
}
