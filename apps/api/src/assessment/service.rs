//! Assessment State Machine — creation, question advancement, and the
//! analysis pipeline (prompt → gateway → parse → summary → store).

use std::collections::HashSet;

use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::assessment::parser::parse_trait_scores;
use crate::errors::AppError;
use crate::llm_client::prompts::{build_analysis_prompt, build_summary_prompt};
use crate::llm_client::LlmClient;
use crate::models::assessment::AnalysisFailure;
use crate::models::profile::MODEL_TYPE_BIG_FIVE;
use crate::models::{Assessment, AssessmentStatus, Answer, PersonalityProfile, Question};
use crate::questions::QuestionPool;
use crate::store::{AssessmentStore, ProfileStore};

/// Fallback summary when the model returns only whitespace.
const EMPTY_SUMMARY_FALLBACK: &str =
    "Profile analysis generated, showing a mix of trait expressions.";

/// Starts a new assessment and draws its first question.
pub async fn start_assessment(
    pool: &QuestionPool,
    assessments: &dyn AssessmentStore,
    candidate_id: &str,
    config: Option<Value>,
) -> Result<(String, Question), AppError> {
    let assessment_id = Uuid::new_v4().to_string();
    info!("Starting assessment {assessment_id} for candidate {candidate_id}");

    let Some(first_question) = pool.draw(&HashSet::new()) else {
        error!("Failed to get the first question from the pool. Pool might be empty.");
        return Err(AppError::EmptyPool);
    };

    let mut assessment = Assessment::new(
        assessment_id.clone(),
        candidate_id.to_string(),
        config,
    );
    assessment.record_question(first_question.clone());
    assessments.insert(assessment).await;

    info!(
        "Assessment {assessment_id} created. First question: {}",
        first_question.id
    );
    Ok((assessment_id, first_question))
}

/// Records the previous answer (if any) and draws the next unique question.
/// Returns None when the pool is exhausted, transitioning the assessment to
/// `PendingAnalysis`.
pub async fn next_question(
    pool: &QuestionPool,
    assessments: &dyn AssessmentStore,
    assessment_id: &str,
    last_answer: Option<Answer>,
) -> Result<Option<Question>, AppError> {
    let shared = assessments
        .get(assessment_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;
    let mut assessment = shared.lock().await;

    match assessment.status {
        AssessmentStatus::InProgress => {}
        // Re-advancing an already-ended assessment keeps returning the end
        // signal instead of erroring.
        AssessmentStatus::PendingAnalysis => {
            info!("Assessment {assessment_id} already ended. Awaiting analysis.");
            return Ok(None);
        }
        other => {
            return Err(AppError::InvalidState(format!(
                "Assessment {assessment_id} has status '{}'. Requires 'In Progress'.",
                other.as_str()
            )));
        }
    }

    // A mismatched answer is dropped with a warning, never an error: the
    // caller still gets the next question.
    if let Some(answer) = last_answer {
        let question_id = answer.question_id.clone();
        if assessment.record_answer(answer) {
            info!("Stored answer for question {question_id} in assessment {assessment_id}");
        } else {
            warn!(
                "Received answer for non-matching question ID ({question_id}) in assessment \
                 {assessment_id}. Ignoring answer storage."
            );
        }
    }

    if assessment.asked_question_ids.len() >= pool.len() {
        info!(
            "Assessment {assessment_id} reached max questions ({}). Ending assessment.",
            pool.len()
        );
        assessment.status = AssessmentStatus::PendingAnalysis;
        return Ok(None);
    }

    match pool.draw(&assessment.asked_question_ids) {
        Some(question) => {
            assessment.record_question(question.clone());
            info!(
                "Added next question {} to assessment {assessment_id}",
                question.id
            );
            Ok(Some(question))
        }
        None => {
            info!("No more unique questions in pool for assessment {assessment_id}. Ending assessment.");
            assessment.status = AssessmentStatus::PendingAnalysis;
            Ok(None)
        }
    }
}

/// Runs the full analysis pipeline for an assessment and stores the
/// resulting profile, keyed by candidate (overwriting any prior profile).
///
/// Already-completed assessments short-circuit to the stored profile without
/// touching the gateway. Failed states are retryable: re-invoking re-enters
/// the pipeline from scratch.
pub async fn run_analysis(
    assessments: &dyn AssessmentStore,
    profiles: &dyn ProfileStore,
    llm: &LlmClient,
    assessment_id: &str,
) -> Result<PersonalityProfile, AppError> {
    let shared = assessments
        .get(assessment_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;
    let mut assessment = shared.lock().await;

    if assessment.status == AssessmentStatus::Completed {
        info!("Analysis already completed for {assessment_id}. Retrieving stored profile.");
        return profiles
            .get(&assessment.candidate_id)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Personality profile not found for candidate {}",
                    assessment.candidate_id
                ))
            });
    }

    if assessment.answers.is_empty() {
        error!("Cannot analyze assessment {assessment_id}: No answers found.");
        assessment.status = AssessmentStatus::AnalysisFailed(AnalysisFailure::NoAnswers);
        return Err(AppError::NoAnswers(assessment_id.to_string()));
    }

    info!(
        "Starting analysis for assessment {assessment_id} (candidate: {}, model: {})",
        assessment.candidate_id,
        llm.model()
    );

    let analysis_prompt = build_analysis_prompt(&assessment.answers, &assessment.questions);
    let raw = match llm.complete(&analysis_prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Analysis call failed for {assessment_id}: {e}");
            assessment.status = AssessmentStatus::AnalysisFailed(AnalysisFailure::LlmError);
            return Err(e.into());
        }
    };

    let trait_scores = match parse_trait_scores(&raw) {
        Ok(scores) => scores,
        Err(e) => {
            error!("Failed to parse analysis response for {assessment_id}: {e}");
            assessment.status = AssessmentStatus::AnalysisFailed(AnalysisFailure::LlmError);
            return Err(e.into());
        }
    };

    let summary_prompt = build_summary_prompt(&trait_scores);
    let summary = match llm.complete(&summary_prompt).await {
        Ok(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                EMPTY_SUMMARY_FALLBACK.to_string()
            } else {
                text
            }
        }
        Err(e) => {
            error!("Summary call failed for {assessment_id}: {e}");
            assessment.status = AssessmentStatus::AnalysisFailed(AnalysisFailure::LlmError);
            return Err(e.into());
        }
    };

    let profile = PersonalityProfile {
        candidate_id: assessment.candidate_id.clone(),
        model_type: MODEL_TYPE_BIG_FIVE.to_string(),
        traits: trait_scores,
        summary,
    };
    profiles.save(profile.clone()).await;
    assessment.status = AssessmentStatus::Completed;

    info!(
        "Analysis complete for {assessment_id}. Profile stored for candidate {}.",
        profile.candidate_id
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BigFiveTrait;
    use crate::models::TraitScore;
    use crate::store::{InMemoryAssessmentStore, InMemoryProfileStore};

    fn test_pool(size: usize) -> QuestionPool {
        QuestionPool::from_questions(
            (1..=size)
                .map(|i| Question {
                    id: format!("q_{i:03}"),
                    text: format!("behavioral question {i}"),
                    targeted_trait: Some("Openness".to_string()),
                })
                .collect(),
        )
    }

    fn offline_llm() -> LlmClient {
        // No API key: any attempted gateway call fails immediately with
        // MissingApiKey, so these tests prove the gateway was never needed.
        LlmClient::new(None, "test-model".to_string())
    }

    fn answer_to(question: &Question) -> Answer {
        Answer {
            question_id: question.id.clone(),
            response: "a thorough, reflective response".to_string(),
            targeted_trait: "Openness".to_string(),
        }
    }

    fn sample_profile(candidate_id: &str) -> PersonalityProfile {
        PersonalityProfile {
            candidate_id: candidate_id.to_string(),
            model_type: MODEL_TYPE_BIG_FIVE.to_string(),
            traits: BigFiveTrait::ALL
                .into_iter()
                .map(|t| TraitScore {
                    trait_name: t,
                    score: 50,
                    insights: format!("about {t}"),
                })
                .collect(),
            summary: "balanced profile".to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_creates_in_progress_assessment_with_first_question() {
        let pool = test_pool(3);
        let store = InMemoryAssessmentStore::default();

        let (id, first) = start_assessment(&pool, &store, "cand-1", None)
            .await
            .unwrap();

        let shared = store.get(&id).await.unwrap();
        let assessment = shared.lock().await;
        assert_eq!(assessment.status, AssessmentStatus::InProgress);
        assert_eq!(assessment.questions.len(), 1);
        assert_eq!(assessment.questions[0].id, first.id);
        assert!(assessment.asked_question_ids.contains(&first.id));
    }

    #[tokio::test]
    async fn test_start_against_empty_pool_fails() {
        let pool = QuestionPool::from_questions(Vec::new());
        let store = InMemoryAssessmentStore::default();

        let err = start_assessment(&pool, &store, "cand-1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyPool));
    }

    #[tokio::test]
    async fn test_next_question_unknown_assessment() {
        let pool = test_pool(3);
        let store = InMemoryAssessmentStore::default();

        let err = next_question(&pool, &store, "missing", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mismatched_answer_is_dropped_without_error() {
        let pool = test_pool(3);
        let store = InMemoryAssessmentStore::default();
        let (id, _first) = start_assessment(&pool, &store, "cand-1", None)
            .await
            .unwrap();

        let stale_answer = Answer {
            question_id: "q_999".to_string(),
            response: "late answer".to_string(),
            targeted_trait: "Openness".to_string(),
        };
        let result = next_question(&pool, &store, &id, Some(stale_answer)).await;
        assert!(result.is_ok());

        let shared = store.get(&id).await.unwrap();
        assert!(shared.lock().await.answers.is_empty());
    }

    #[tokio::test]
    async fn test_full_run_never_repeats_and_ends_pending_analysis() {
        let pool = test_pool(4);
        let store = InMemoryAssessmentStore::default();
        let (id, first) = start_assessment(&pool, &store, "cand-1", None)
            .await
            .unwrap();

        let mut current = first;
        let mut seen = HashSet::from([current.id.clone()]);
        loop {
            let next = next_question(&pool, &store, &id, Some(answer_to(&current)))
                .await
                .unwrap();
            match next {
                Some(q) => {
                    assert!(seen.insert(q.id.clone()), "question {} repeated", q.id);
                    current = q;
                }
                None => break,
            }
        }

        let shared = store.get(&id).await.unwrap();
        let assessment = shared.lock().await;
        assert_eq!(assessment.status, AssessmentStatus::PendingAnalysis);
        assert_eq!(assessment.questions.len(), pool.len());
        assert_eq!(assessment.answers.len(), pool.len());
        assert_eq!(assessment.asked_question_ids.len(), pool.len());
    }

    #[tokio::test]
    async fn test_advance_after_exhaustion_is_idempotent_end_signal() {
        let pool = test_pool(1);
        let store = InMemoryAssessmentStore::default();
        let (id, first) = start_assessment(&pool, &store, "cand-1", None)
            .await
            .unwrap();

        let end = next_question(&pool, &store, &id, Some(answer_to(&first)))
            .await
            .unwrap();
        assert!(end.is_none());

        // Calling again in Pending Analysis still returns the end signal.
        let again = next_question(&pool, &store, &id, None).await.unwrap();
        assert!(again.is_none());

        let shared = store.get(&id).await.unwrap();
        assert_eq!(shared.lock().await.status, AssessmentStatus::PendingAnalysis);
    }

    #[tokio::test]
    async fn test_advance_on_completed_assessment_is_invalid_state() {
        let pool = test_pool(2);
        let store = InMemoryAssessmentStore::default();
        let (id, _) = start_assessment(&pool, &store, "cand-1", None)
            .await
            .unwrap();

        store.get(&id).await.unwrap().lock().await.status = AssessmentStatus::Completed;

        let err = next_question(&pool, &store, &id, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_analysis_with_no_answers_fails_without_gateway_call() {
        let pool = test_pool(2);
        let assessments = InMemoryAssessmentStore::default();
        let profiles = InMemoryProfileStore::default();
        let (id, _) = start_assessment(&pool, &assessments, "cand-1", None)
            .await
            .unwrap();

        let err = run_analysis(&assessments, &profiles, &offline_llm(), &id)
            .await
            .unwrap_err();
        // NoAnswers, not MissingApiKey: the gateway was never invoked.
        assert!(matches!(err, AppError::NoAnswers(_)));

        let shared = assessments.get(&id).await.unwrap();
        assert_eq!(
            shared.lock().await.status,
            AssessmentStatus::AnalysisFailed(AnalysisFailure::NoAnswers)
        );
    }

    #[tokio::test]
    async fn test_analysis_on_completed_returns_cached_profile() {
        let assessments = InMemoryAssessmentStore::default();
        let profiles = InMemoryProfileStore::default();

        let mut assessment = Assessment::new("a1".into(), "cand-1".into(), None);
        assessment.status = AssessmentStatus::Completed;
        assessments.insert(assessment).await;
        profiles.save(sample_profile("cand-1")).await;

        // Offline client: any gateway call would fail, so success proves the
        // stored profile was returned without recomputation.
        let profile = run_analysis(&assessments, &profiles, &offline_llm(), "a1")
            .await
            .unwrap();
        assert_eq!(profile.candidate_id, "cand-1");
        assert_eq!(profile.summary, "balanced profile");
    }

    #[tokio::test]
    async fn test_gateway_failure_marks_assessment_failed_and_is_retryable() {
        let pool = test_pool(1);
        let assessments = InMemoryAssessmentStore::default();
        let profiles = InMemoryProfileStore::default();
        let (id, first) = start_assessment(&pool, &assessments, "cand-1", None)
            .await
            .unwrap();
        next_question(&pool, &assessments, &id, Some(answer_to(&first)))
            .await
            .unwrap();

        let err = run_analysis(&assessments, &profiles, &offline_llm(), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));

        let shared = assessments.get(&id).await.unwrap();
        assert_eq!(
            shared.lock().await.status,
            AssessmentStatus::AnalysisFailed(AnalysisFailure::LlmError)
        );

        // Retry re-enters the pipeline instead of refusing on status.
        let err = run_analysis(&assessments, &profiles, &offline_llm(), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_analysis_on_unknown_assessment() {
        let assessments = InMemoryAssessmentStore::default();
        let profiles = InMemoryProfileStore::default();
        let err = run_analysis(&assessments, &profiles, &offline_llm(), "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
