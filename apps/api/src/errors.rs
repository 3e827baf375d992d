use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assessment::parser::ParseError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid assessment state: {0}")]
    InvalidState(String),

    #[error("The question pool is empty")]
    EmptyPool,

    #[error("No answers recorded for assessment {0}")]
    NoAnswers(String),

    #[error("LLM gateway error: {0}")]
    Llm(#[from] LlmError),

    #[error("Analysis response error: {0}")]
    Analysis(#[from] ParseError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, "INVALID_STATE", msg.clone()),
            AppError::EmptyPool => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EMPTY_QUESTION_POOL",
                "Could not retrieve the first assessment question. The question pool might be empty or misconfigured.".to_string(),
            ),
            AppError::NoAnswers(id) => (
                StatusCode::BAD_REQUEST,
                "NO_ANSWERS",
                format!("Analysis failed: no answers found for assessment {id}."),
            ),
            AppError::Llm(e) => {
                tracing::error!("LLM gateway error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "LLM_ERROR",
                    "Analysis failed due to an issue contacting the language model."
                        .to_string(),
                )
            }
            AppError::Analysis(e) => {
                tracing::error!("Analysis response error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ANALYSIS_ERROR",
                    "Analysis failed due to an issue interpreting the language model output."
                        .to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("assessment xyz".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_no_answers_maps_to_400() {
        let response = AppError::NoAnswers("a1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_llm_error_maps_to_503() {
        let response = AppError::Llm(LlmError::MissingApiKey).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
