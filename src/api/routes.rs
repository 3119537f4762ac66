//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{Aggregate, Product};
use crate::domain::{
    ActualMetric, CostBreakdown, DomainError, RequestContext, RevenueBreakdown, WeekNumber,
    WeeklyProjection,
};
use crate::error::AppError;
use crate::event_store::EventStore;
use crate::handlers::{
    load_product, CreateProductCommand, CreateProductHandler, CreateProductResult,
    ProductUpdateResult, RecordActualCommand, RecordActualHandler, RemoveActualCommand,
    RemoveActualHandler, RenameProductCommand, RenameProductHandler, ReplaceProjectionsCommand,
    ReplaceProjectionsHandler,
};
use crate::report::{AggregateReport, Aggregator, QuarterSummary, WeeklyRow};

// =========================================================================
// Shared state
// =========================================================================

/// State shared by every route
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: EventStore,
    pub aggregator: Aggregator,
}

impl AppState {
    pub fn new(store: EventStore, aggregator: Aggregator) -> Self {
        Self { store, aggregator }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameProductRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceProjectionsRequest {
    pub weeks: Vec<WeeklyProjection>,
}

/// Body of `PUT /products/:id/actuals/:week`; the week comes from the path
#[derive(Debug, Deserialize)]
pub struct RecordActualRequest {
    #[serde(default)]
    pub revenue: Option<Decimal>,
    #[serde(default)]
    pub expenses: Option<Decimal>,
    #[serde(default)]
    pub revenue_breakdown: RevenueBreakdown,
    #[serde(default)]
    pub cost_breakdown: CostBreakdown,
}

impl RecordActualRequest {
    fn into_actual(self, week: WeekNumber) -> ActualMetric {
        ActualMetric {
            week,
            revenue: self.revenue,
            expenses: self.expenses,
            revenue_breakdown: self.revenue_breakdown,
            cost_breakdown: self.cost_breakdown,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub week_count: usize,
    pub actuals_count: usize,
    pub version: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            week_count: product.projections().len(),
            actuals_count: product.actuals().len(),
            version: product.version(),
            updated_at: product.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub version: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub projections: Vec<WeeklyProjection>,
    pub actuals: Vec<ActualMetric>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub product_id: Uuid,
    #[serde(flatten)]
    pub report: AggregateReport,
}

#[derive(Debug, Serialize)]
pub struct WeeklyRowsResponse {
    pub product_id: Uuid,
    pub weeks: Vec<WeeklyRow>,
}

#[derive(Debug, Serialize)]
pub struct QuarterlyResponse {
    pub product_id: Uuid,
    pub weeks_per_quarter: u32,
    pub quarters: Vec<QuarterSummary>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub event_id: Uuid,
    pub event_type: String,
    pub version: i64,
    pub data: serde_json::Value,
    pub context: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub product_id: Uuid,
    pub entries: Vec<HistoryEntry>,
}

/// Unwrap a JSON body, reporting malformed input as `invalid_input`
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

fn parse_week(raw: &str) -> Result<WeekNumber, AppError> {
    raw.parse::<WeekNumber>()
        .map_err(|e| AppError::Domain(DomainError::from(e)))
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:product_id", get(get_product).patch(rename_product))
        .route("/products/:product_id/projections", put(replace_projections))
        .route(
            "/products/:product_id/actuals/:week",
            put(record_actual).delete(remove_actual),
        )
        .route("/products/:product_id/report", get(get_report))
        .route("/products/:product_id/weeks", get(get_weekly_rows))
        .route("/products/:product_id/quarters", get(get_quarters))
        .route("/products/:product_id/history", get(get_history))
}

// =========================================================================
// Products
// =========================================================================

/// Create a new product
async fn create_product(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateProductResult>), AppError> {
    let request = json_body(payload)?;
    let handler = CreateProductHandler::new(state.store);

    let result = handler
        .execute(CreateProductCommand::new(request.name), &context)
        .await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// List products in creation order
async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, AppError> {
    let ids = state
        .store
        .list_aggregate_ids(Product::aggregate_type())
        .await;

    let mut products = Vec::with_capacity(ids.len());
    for id in ids {
        let product = load_product(&state.store, id).await?;
        products.push(ProductSummary::from(&product));
    }

    let total = products.len();
    Ok(Json(ProductListResponse { products, total }))
}

/// Get a product with its projections and actuals
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductDetailResponse>, AppError> {
    let product = load_product(&state.store, product_id).await?;

    Ok(Json(ProductDetailResponse {
        id: product.id(),
        name: product.name().to_string(),
        version: product.version(),
        created_at: product.created_at(),
        updated_at: product.updated_at(),
        projections: product.projections().to_vec(),
        actuals: product.actuals().values().cloned().collect(),
    }))
}

/// Rename a product
async fn rename_product(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(product_id): Path<Uuid>,
    payload: Result<Json<RenameProductRequest>, JsonRejection>,
) -> Result<Json<ProductUpdateResult>, AppError> {
    let request = json_body(payload)?;
    let handler = RenameProductHandler::new(state.store);

    let result = handler
        .execute(RenameProductCommand::new(product_id, request.name), &context)
        .await?;

    Ok(Json(result))
}

// =========================================================================
// Forecast and actuals
// =========================================================================

/// Replace the weekly projections
async fn replace_projections(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(product_id): Path<Uuid>,
    payload: Result<Json<ReplaceProjectionsRequest>, JsonRejection>,
) -> Result<Json<ProductUpdateResult>, AppError> {
    let request = json_body(payload)?;
    let handler = ReplaceProjectionsHandler::new(state.store, state.aggregator);

    let result = handler
        .execute(
            ReplaceProjectionsCommand::new(product_id, request.weeks),
            &context,
        )
        .await?;

    Ok(Json(result))
}

/// Record or update the actual for a week
async fn record_actual(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path((product_id, week)): Path<(Uuid, String)>,
    payload: Result<Json<RecordActualRequest>, JsonRejection>,
) -> Result<Json<ProductUpdateResult>, AppError> {
    let week = parse_week(&week)?;
    let actual = json_body(payload)?.into_actual(week);
    let handler = RecordActualHandler::new(state.store, state.aggregator);

    let result = handler
        .execute(RecordActualCommand::new(product_id, actual), &context)
        .await?;

    Ok(Json(result))
}

/// Remove the actual for a week
async fn remove_actual(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path((product_id, week)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    let week = parse_week(&week)?;
    let handler = RemoveActualHandler::new(state.store);

    handler
        .execute(RemoveActualCommand::new(product_id, week), &context)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Reports
// =========================================================================

/// Aggregate report: totals, break-even week, variance and coverage
async fn get_report(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ReportResponse>, AppError> {
    let product = load_product(&state.store, product_id).await?;
    let report = state
        .aggregator
        .aggregate(product.projections(), product.actuals())?;

    Ok(Json(ReportResponse { product_id, report }))
}

/// Per-week rows with cumulative profit
async fn get_weekly_rows(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<WeeklyRowsResponse>, AppError> {
    let product = load_product(&state.store, product_id).await?;
    let weeks = state
        .aggregator
        .weekly_rows(product.projections(), product.actuals())?;

    Ok(Json(WeeklyRowsResponse { product_id, weeks }))
}

/// Quarterly rollup
async fn get_quarters(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<QuarterlyResponse>, AppError> {
    let product = load_product(&state.store, product_id).await?;
    let quarters = state
        .aggregator
        .quarterly_rollup(product.projections(), product.actuals())?;

    Ok(Json(QuarterlyResponse {
        product_id,
        weeks_per_quarter: state.aggregator.weeks_per_quarter(),
        quarters,
    }))
}

/// Stored events for the product, oldest first
async fn get_history(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let events = state.store.get_events(product_id).await;
    if events.is_empty() {
        return Err(AppError::ProductNotFound(product_id.to_string()));
    }

    let entries = events
        .into_iter()
        .map(|event| HistoryEntry {
            event_id: event.id,
            event_type: event.event_type,
            version: event.version,
            data: event.event_data,
            context: event.context,
            created_at: event.created_at,
        })
        .collect();

    Ok(Json(HistoryResponse {
        product_id,
        entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_replace_projections_request_deserialize() {
        let json = r#"{
            "weeks": [
                {
                    "week": 1,
                    "total_revenue": "1200.00",
                    "total_costs": "900",
                    "weekly_profit": "300",
                    "revenue": { "ticket": "1000", "merchandise": "200" }
                }
            ]
        }"#;

        let request: ReplaceProjectionsRequest = serde_json::from_str(json).unwrap();
        let week = &request.weeks[0];

        assert_eq!(week.weekly_profit, dec!(300));
        assert_eq!(week.revenue.ticket(), dec!(1000));
        assert_eq!(week.revenue.digital(), Decimal::ZERO);
        assert!(week.costs.is_empty());
    }

    #[test]
    fn test_projection_rejects_zero_week() {
        let json = r#"{ "weeks": [ { "week": 0, "total_revenue": "1", "total_costs": "1", "weekly_profit": "0" } ] }"#;
        assert!(serde_json::from_str::<ReplaceProjectionsRequest>(json).is_err());
    }

    #[test]
    fn test_record_actual_request_defaults() {
        let request: RecordActualRequest = serde_json::from_str(r#"{ "expenses": "40" }"#).unwrap();
        let actual = request.into_actual(WeekNumber::new(5).unwrap());

        assert_eq!(actual.week.value(), 5);
        assert!(actual.revenue.is_none());
        assert_eq!(actual.expenses, Some(dec!(40)));
        assert!(!actual.is_blank());
    }

    #[test]
    fn test_parse_week() {
        assert_eq!(parse_week("7").unwrap().value(), 7);
        assert!(matches!(
            parse_week("0"),
            Err(AppError::Domain(DomainError::InvalidWeek(_)))
        ));
        assert!(parse_week("next").is_err());
    }
}
