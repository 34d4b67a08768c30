use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::models::{DerivedMetrics, PoolCategory, PoolRecord, RiskLevel};
use crate::services::{compare, pipeline, scoring, summary, PoolCollector, PoolStore};
use crate::services::pipeline::{PoolQuery, SortDir, SortKey};
use crate::sources::price::PriceClient;

pub struct AppState {
    pub store: Arc<PoolStore>,
    pub collector: Arc<PoolCollector>,
    pub price: Arc<PriceClient>,
}

type ApiError = (StatusCode, String);

fn bad_request(msg: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, msg.into())
}

/// Record projection the dashboard tables render: raw fields the UI
/// shows plus every derived metric.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolView {
    pub id: String,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    pub price: f64,
    pub fee_rate: f64,
    pub open_time: String,
    pub pool_types: Vec<String>,
}

impl PoolView {
    fn from_record(pool: &PoolRecord) -> Self {
        Self {
            id: pool.id.clone(),
            metrics: DerivedMetrics::from_record(pool),
            price: pool.price,
            fee_rate: pool.fee_rate,
            open_time: pool.open_time.clone(),
            pool_types: pool.pool_types.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PoolsParams {
    category: Option<String>,
    search: Option<String>,
    min_tvl: Option<f64>,
    max_tvl: Option<f64>,
    min_apr: Option<f64>,
    max_apr: Option<f64>,
    risk: Option<String>,
    sort: Option<SortKey>,
    direction: Option<SortDir>,
    page: Option<usize>,
}

impl PoolsParams {
    fn to_query(&self) -> Result<PoolQuery, ApiError> {
        let category = match self.category.as_deref() {
            None | Some("all") => None,
            Some(s) => Some(
                PoolCategory::parse(s)
                    .ok_or_else(|| bad_request(format!("unknown category: {}", s)))?,
            ),
        };
        let risk = match self.risk.as_deref() {
            None | Some("all") => None,
            Some(s) => Some(
                RiskLevel::parse(s)
                    .ok_or_else(|| bad_request(format!("unknown risk level: {}", s)))?,
            ),
        };

        Ok(PoolQuery {
            category,
            search: self.search.clone(),
            min_tvl: self.min_tvl,
            max_tvl: self.max_tvl,
            min_apr: self.min_apr,
            max_apr: self.max_apr,
            risk,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PoolListResponse {
    pools: Vec<PoolView>,
    total: usize,
    page: usize,
    page_count: usize,
    fetched_at: Option<DateTime<Utc>>,
}

/// GET /pools - filtered, sorted, paginated listing
async fn get_pools(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PoolsParams>,
) -> Result<Json<PoolListResponse>, ApiError> {
    let query = params.to_query()?;
    let pools = state.store.get_all();

    let filtered = pipeline::apply(
        &pools,
        &query,
        params.sort.unwrap_or(SortKey::Apr),
        params.direction.unwrap_or(SortDir::Desc),
    );
    let page = pipeline::paginate(&filtered, params.page.unwrap_or(1));

    Ok(Json(PoolListResponse {
        pools: page.items.iter().map(|p| PoolView::from_record(p)).collect(),
        total: page.total,
        page: page.page,
        page_count: page.page_count,
        fetched_at: state.store.fetched_at(),
    }))
}

#[derive(Debug, Deserialize)]
struct DetailParams {
    /// Deposit size (quote units) for the yield projection.
    amount: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PoolDetailResponse {
    #[serde(flatten)]
    view: PoolView,
    apr_7d: f64,
    apr_30d: f64,
    fee_apr_24h: f64,
    volume_7d: f64,
    volume_30d: f64,
    quote_price_usd: Option<f64>,
    projection: Option<scoring::YieldProjection>,
}

/// GET /pools/{id} - one pool with extended stats and an optional
/// yield projection for ?amount=
async fn get_pool_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DetailParams>,
) -> Result<Json<PoolDetailResponse>, ApiError> {
    let pool = state
        .store
        .get(&id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown pool: {}", id)))?;

    // Price unavailable is not an error; the projection is just omitted
    let quote_price_usd = state.price.usd_price().await;
    let projection = match (params.amount, quote_price_usd) {
        (Some(amount), Some(price)) if amount > 0.0 => {
            Some(scoring::project_yield(pool.day.apr, amount, price))
        }
        _ => None,
    };

    Ok(Json(PoolDetailResponse {
        view: PoolView::from_record(&pool),
        apr_7d: pool.week.apr,
        apr_30d: pool.month.apr,
        fee_apr_24h: pool.day.fee_apr,
        volume_7d: pool.week.volume,
        volume_30d: pool.month.volume,
        quote_price_usd,
        projection,
    }))
}

#[derive(Debug, Deserialize)]
struct CompareParams {
    /// Comma-separated pool ids, at most three.
    ids: String,
}

/// GET /compare?ids=a,b,c - side-by-side metric comparison
async fn get_compare(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompareParams>,
) -> Result<Json<compare::Comparison>, ApiError> {
    let mut pools = Vec::new();
    for id in params.ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let pool = state
            .store
            .get(id)
            .ok_or_else(|| bad_request(format!("unknown pool: {}", id)))?;
        pools.push(pool);
    }

    let comparison = compare::compare(&pools).map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(comparison))
}

/// GET /overview - aggregate stats over the current snapshot
async fn get_overview(State(state): State<Arc<AppState>>) -> Json<summary::Overview> {
    Json(summary::overview(&state.store.get_all()))
}

/// GET /stats - collector counters
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.collector.stats();

    Json(serde_json::json!({
        "snapshot_pools": state.store.len(),
        "generation": state.store.generation(),
        "fetched_at": state.store.fetched_at(),
        "total_requests": stats.total_requests.load(Ordering::Relaxed),
        "successful": stats.successful.load(Ordering::Relaxed),
        "failed": stats.failed.load(Ordering::Relaxed),
        "pools_kept": stats.pools_kept.load(Ordering::Relaxed),
    }))
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

pub fn create_rest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pools", get(get_pools))
        .route("/pools/:id", get(get_pool_detail))
        .route("/compare", get(get_compare))
        .route("/overview", get(get_overview))
        .route("/stats", get(get_stats))
        .route("/health", get(health))
        .with_state(state)
}
