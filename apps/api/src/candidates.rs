//! Candidate-facing profile lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use crate::errors::AppError;
use crate::models::PersonalityProfile;
use crate::state::AppState;

/// GET /candidates/:candidate_id/profile
///
/// Retrieves the generated personality profile for a specific candidate.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<PersonalityProfile>, AppError> {
    match state.profiles.get(&candidate_id).await {
        Some(profile) => Ok(Json(profile)),
        None => {
            warn!("Profile not found for candidate {candidate_id}");
            Err(AppError::NotFound(format!(
                "Personality profile not found for candidate {candidate_id}"
            )))
        }
    }
}
