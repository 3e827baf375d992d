pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics_handlers;
use crate::assessment::handlers as assessment_handlers;
use crate::candidates;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Assessment API
        .route("/assessments/start", post(assessment_handlers::handle_start))
        .route(
            "/assessments/next_question",
            post(assessment_handlers::handle_next_question),
        )
        .route(
            "/assessments/analyze",
            post(assessment_handlers::handle_analyze),
        )
        // Candidate API
        .route(
            "/candidates/:candidate_id/profile",
            get(candidates::handle_get_profile),
        )
        // Analytics API (recruiter/HR)
        .route(
            "/analytics/candidates",
            get(analytics_handlers::handle_candidate_summaries),
        )
        .route("/analytics/compare", post(analytics_handlers::handle_compare))
        .route("/analytics/trends", get(analytics_handlers::handle_trends))
        .with_state(state)
}
