//! Axum route handlers for the Assessment API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assessment::service;
use crate::errors::AppError;
use crate::models::{Answer, PersonalityProfile, Question};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartAssessmentRequest {
    pub candidate_id: String,
    /// Optional config, e.g. target role. Stored opaquely on the assessment.
    pub assessment_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct StartAssessmentResponse {
    pub assessment_id: String,
    pub first_question: Question,
}

#[derive(Debug, Deserialize)]
pub struct NextQuestionRequest {
    pub assessment_id: String,
    /// The answer to the previously issued question, if any.
    pub last_answer: Option<Answer>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub assessment_id: String,
}

/// POST /assessments/start
///
/// Initiates a new personality assessment for a candidate and returns the
/// first question.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartAssessmentRequest>,
) -> Result<(StatusCode, Json<StartAssessmentResponse>), AppError> {
    if request.candidate_id.trim().is_empty() {
        return Err(AppError::Validation(
            "candidate_id cannot be empty".to_string(),
        ));
    }

    let (assessment_id, first_question) = service::start_assessment(
        &state.questions,
        state.assessments.as_ref(),
        &request.candidate_id,
        request.assessment_config,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartAssessmentResponse {
            assessment_id,
            first_question,
        }),
    ))
}

/// POST /assessments/next_question
///
/// Submits the answer to the previous question (if provided) and retrieves
/// the next question from the pool. Returns null when the assessment is
/// complete.
pub async fn handle_next_question(
    State(state): State<AppState>,
    Json(request): Json<NextQuestionRequest>,
) -> Result<Json<Option<Question>>, AppError> {
    let next = service::next_question(
        &state.questions,
        state.assessments.as_ref(),
        &request.assessment_id,
        request.last_answer,
    )
    .await?;

    if next.is_none() {
        info!(
            "No more questions for assessment {}. Assessment ended.",
            request.assessment_id
        );
    }
    Ok(Json(next))
}

/// POST /assessments/analyze
///
/// Triggers analysis of the submitted answers and returns the generated
/// profile. Re-invoking on a completed assessment returns the stored profile.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<PersonalityProfile>, AppError> {
    info!("Received request to analyze assessment {}", request.assessment_id);
    let profile = service::run_analysis(
        state.assessments.as_ref(),
        state.profiles.as_ref(),
        &state.llm,
        &request.assessment_id,
    )
    .await?;
    Ok(Json(profile))
}
