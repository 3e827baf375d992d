use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::questions::QuestionPool;
use crate::store::{AssessmentStore, ProfileStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable question pool, loaded once at startup.
    pub questions: Arc<QuestionPool>,
    /// Store abstractions, in-memory by default. Swappable for durable
    /// backends without touching the service layer.
    pub assessments: Arc<dyn AssessmentStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub llm: LlmClient,
    pub config: Config,
}
