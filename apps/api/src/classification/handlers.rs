//! Axum route handlers for the Classification API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::classification::index::{IndexRecord, IndexStats};
use crate::classification::matcher::ClassificationResult;
use crate::classification::normalize::normalize;
use crate::classification::taxonomy::CategorySummary;
use crate::classification::tuning::MatchTuning;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchClassifyRequest {
    pub titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchClassifyResponse {
    pub results: Vec<ClassificationResult>,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyStatsResponse {
    pub stats: IndexStats,
    pub tuning: MatchTuning,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub key: String,
    pub record: IndexRecord,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/classify
///
/// Classifies a single job title. Blank titles are not an error: they classify as Unknown.
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<ClassificationResult> {
    Json(state.classifier.classify(&request.title))
}

/// POST /api/v1/classify/batch
///
/// Classifies many titles, preserving input order. Runs on the blocking pool so
/// large batches do not stall the async workers.
pub async fn handle_classify_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchClassifyRequest>,
) -> Result<Json<BatchClassifyResponse>, AppError> {
    let limit = state.config.max_batch_size;
    if request.titles.len() > limit {
        return Err(AppError::Validation(format!(
            "batch contains {} titles; the limit is {limit}",
            request.titles.len()
        )));
    }

    let classifier = state.classifier.clone();
    let results = tokio::task::spawn_blocking(move || {
        request
            .titles
            .iter()
            .map(|title| classifier.classify(title))
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("batch classification task failed: {e}")))?;

    Ok(Json(BatchClassifyResponse { results }))
}

/// GET /api/v1/taxonomy/stats
pub async fn handle_taxonomy_stats(State(state): State<AppState>) -> Json<TaxonomyStatsResponse> {
    Json(TaxonomyStatsResponse {
        stats: state.classifier.index().stats().clone(),
        tuning: state.classifier.tuning().clone(),
    })
}

/// GET /api/v1/taxonomy/categories
pub async fn handle_list_categories(State(state): State<AppState>) -> Json<Vec<CategorySummary>> {
    Json(state.categories.as_ref().clone())
}

/// GET /api/v1/taxonomy/lookup?title=...
///
/// Returns the record stored under the title's normalized key, without any fuzzy matching.
pub async fn handle_lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, AppError> {
    let key = normalize(&params.title);
    let record = state
        .classifier
        .index()
        .get(&key)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No taxonomy record for '{key}'")))?;

    Ok(Json(LookupResponse { key, record }))
}
