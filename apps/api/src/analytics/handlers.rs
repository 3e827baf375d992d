//! Axum route handlers for the Analytics API (recruiter/HR views).

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::aggregator::{
    build_comparison, build_summaries, build_trends, CandidateSummary, ComparisonEntry,
    TrendReport,
};
use crate::errors::AppError;
use crate::models::PersonalityProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub candidate_ids: Vec<String>,
    /// Specific traits to compare; all five when unset.
    pub comparison_traits: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub comparison_data: ComparisonData,
}

#[derive(Debug, Serialize)]
pub struct ComparisonData {
    pub comparison: HashMap<String, Option<ComparisonEntry>>,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub trend_info: TrendReport,
}

async fn profile_map(state: &AppState) -> HashMap<String, PersonalityProfile> {
    state
        .profiles
        .snapshot()
        .await
        .into_iter()
        .map(|p| (p.candidate_id.clone(), p))
        .collect()
}

/// GET /analytics/candidates
///
/// Summary list of all known candidates and their assessment status.
pub async fn handle_candidate_summaries(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let assessments = state.assessments.snapshot().await;
    let profiles = profile_map(&state).await;
    let summaries = build_summaries(&assessments, &profiles);
    info!("Retrieved {} candidate summaries.", summaries.len());
    Ok(Json(summaries))
}

/// POST /analytics/compare
///
/// Side-by-side trait scores for the selected candidates. Candidates without
/// a stored profile appear as null.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    if request.candidate_ids.is_empty() {
        return Err(AppError::Validation(
            "candidate_ids cannot be empty".to_string(),
        ));
    }

    info!(
        "Comparing candidates: {:?}. Specific traits: {:?}",
        request.candidate_ids, request.comparison_traits
    );
    let profiles = profile_map(&state).await;
    let comparison = build_comparison(
        &request.candidate_ids,
        request.comparison_traits.as_deref(),
        &profiles,
    );

    Ok(Json(CompareResponse {
        comparison_data: ComparisonData { comparison },
    }))
}

/// GET /analytics/trends
///
/// Aggregated per-trait averages across all stored profiles.
pub async fn handle_trends(State(state): State<AppState>) -> Result<Json<TrendsResponse>, AppError> {
    let profiles = state.profiles.snapshot().await;
    let trend_info = build_trends(&profiles);
    info!(
        "Trend calculation complete. Analyzed {} profiles.",
        trend_info.total_profiles_analyzed
    );
    Ok(Json(TrendsResponse { trend_info }))
}
