mod analytics;
mod assessment;
mod candidates;
mod config;
mod errors;
mod llm_client;
mod models;
mod questions;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::questions::QuestionPool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InMemoryAssessmentStore, InMemoryProfileStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting AI Personality Assessment API v{}",
        env!("CARGO_PKG_VERSION")
    );

    match config.masked_api_key() {
        Some(masked) => info!("OpenRouter API key loaded (masked): {masked}"),
        None => warn!("CRITICAL: OPENROUTER_API_KEY not set. LLM analysis will fail."),
    }
    info!("Using OpenRouter analysis model: {}", config.openrouter_model);

    // Load the question pool once; immutable thereafter.
    let questions = Arc::new(QuestionPool::load(config.question_pool_path.as_deref()));
    info!("Question pool ready ({} questions)", questions.len());

    // In-memory stores. Data will NOT persist across restarts.
    warn!("Using in-memory stores. Data will NOT persist across server restarts.");
    let assessments = Arc::new(InMemoryAssessmentStore::default());
    let profiles = Arc::new(InMemoryProfileStore::default());

    // LLM gateway: one pooled client for the process lifetime.
    let llm = LlmClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
    );
    info!("LLM client initialized");

    let state = AppState {
        questions,
        assessments,
        profiles,
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
