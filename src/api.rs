use std::collections::HashMap;
use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::ConfigHandle;
use crate::error::RankerError;
use crate::ingest::{self, types::Candidate, IngestReport};
use crate::item::{Item, Label};
use crate::ranking;
use crate::serving;
use crate::store::ItemStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub config: ConfigHandle,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/articles", get(ranked_articles))
        .route("/api/all_articles", get(all_articles))
        .route("/api/read_articles", get(read_articles))
        .route("/api/rate_article", post(rate_article))
        .route("/api/ingest", post(ingest_batch))
        .route("/api/rebuild", post(rebuild_ranking))
        .route("/admin/set-exposure-limit", get(admin_set_exposure_limit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Wire shape for one article. `published` keeps the RFC 2822 text form the
/// feeds use, matching what the UI has always rendered.
#[derive(serde::Serialize)]
struct ArticleOut {
    id: i64,
    title: String,
    normalized_title: String,
    link: String,
    published: Option<String>,
    rating: Option<i8>,
    predicted_rating: Option<f64>,
    exposure_count: u32,
}

impl From<Item> for ArticleOut {
    fn from(it: Item) -> Self {
        Self {
            id: it.id,
            title: it.title,
            normalized_title: it.normalized_title,
            link: it.link,
            published: it
                .published_at
                .map(|dt| dt.format("%a, %d %b %Y %H:%M:%S %z").to_string()),
            rating: it.label.map(Label::as_i8),
            predicted_rating: it.score,
            exposure_count: it.exposure_count,
        }
    }
}

#[derive(serde::Serialize)]
struct ArticlesOut {
    articles: Vec<ArticleOut>,
}

fn articles_out(items: Vec<Item>) -> Json<ArticlesOut> {
    Json(ArticlesOut {
        articles: items.into_iter().map(ArticleOut::from).collect(),
    })
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_body(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(serde_json::json!({ "error": msg })))
}

/// Map a domain error onto its HTTP shape. `InsufficientData` never reaches
/// this point in practice (the orchestrator swallows it), but a mapping
/// exists so a future caller can't forget one.
fn domain_error(e: &RankerError) -> ApiError {
    let status = match e {
        RankerError::InvalidLabel(_) => StatusCode::BAD_REQUEST,
        RankerError::ItemNotFound(_) => StatusCode::NOT_FOUND,
        RankerError::InsufficientData(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, &e.to_string())
}

/// GET /api/articles — the serving query: unresolved items under the
/// exposure cap, best score first. Serving counts against each returned
/// item's exposure budget. `?limit=` overrides the configured cap for this
/// call only.
async fn ranked_articles(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<ArticlesOut>, ApiError> {
    let limit = match q.get("limit") {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|&v| v >= 1)
            .ok_or_else(|| error_body(StatusCode::BAD_REQUEST, "limit must be an integer >= 1"))?,
        None => state.config.exposure_limit(),
    };
    let items = serving::next_batch(state.store.as_ref(), limit).await;
    Ok(articles_out(items))
}

/// GET /api/all_articles — everything, newest published first.
async fn all_articles(State(state): State<AppState>) -> Json<ArticlesOut> {
    let mut items = state.store.list_all().await;
    sort_published_desc(&mut items);
    articles_out(items)
}

/// GET /api/read_articles — items resolved as read (neutral or positive).
async fn read_articles(State(state): State<AppState>) -> Json<ArticlesOut> {
    let mut items = state.store.list_read().await;
    sort_published_desc(&mut items);
    articles_out(items)
}

fn sort_published_desc(items: &mut [Item]) {
    items.sort_by(|a, b| match (&b.published_at, &a.published_at) {
        (Some(x), Some(y)) => x.cmp(y).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.id.cmp(&b.id),
    });
}

#[derive(serde::Deserialize)]
struct RateReq {
    article_id: i64,
    rating: i64,
}

/// POST /api/rate_article — submit_feedback. A valid label triggers a full
/// rescoring pass; every item's score may change, not just this one.
async fn rate_article(
    State(state): State<AppState>,
    Json(body): Json<RateReq>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let label = Label::from_i64(body.rating)
        .ok_or_else(|| domain_error(&RankerError::InvalidLabel(body.rating)))?;

    state
        .store
        .set_label(body.article_id, label)
        .await
        .map_err(|e| domain_error(&e))?;

    let updated =
        ranking::rescore_all(state.store.as_ref(), &state.config.snapshot().fit_params()).await;
    Ok(Json(
        serde_json::json!({ "message": "rating saved", "rescored": updated }),
    ))
}

/// POST /api/ingest — push a batch of candidates through the Ingestion
/// Gate, then rescore once for the whole batch.
async fn ingest_batch(
    State(state): State<AppState>,
    Json(candidates): Json<Vec<Candidate>>,
) -> Json<IngestReport> {
    let report = ingest::ingest_batch(state.store.as_ref(), candidates).await;
    ranking::rescore_all(state.store.as_ref(), &state.config.snapshot().fit_params()).await;
    Json(report)
}

/// POST /api/rebuild — explicit administrative rescoring pass.
async fn rebuild_ranking(State(state): State<AppState>) -> Json<serde_json::Value> {
    let updated =
        ranking::rescore_all(state.store.as_ref(), &state.config.snapshot().fit_params()).await;
    Json(serde_json::json!({ "updated": updated }))
}

/// GET /admin/set-exposure-limit?limit=N — runtime mutation of the serving
/// exposure cap.
async fn admin_set_exposure_limit(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let limit = q
        .get("limit")
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&v| v >= 1)
        .ok_or_else(|| error_body(StatusCode::BAD_REQUEST, "limit must be an integer >= 1"))?;
    state.config.set_exposure_limit(limit);
    Ok(format!("exposure_limit={limit}"))
}
