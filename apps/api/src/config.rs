use anyhow::{Context, Result};

pub const DEFAULT_ANALYSIS_MODEL: &str = "google/gemini-flash-1.5";

/// Application configuration loaded from environment variables.
///
/// The OpenRouter API key is intentionally optional at boot: the server can
/// serve questions without it, and its absence is reported before any LLM
/// call is attempted.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub question_pool_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANALYSIS_MODEL.to_string()),
            question_pool_path: optional_env("QUESTION_POOL_PATH"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// API key with all but the first and last four characters hidden,
    /// safe for startup logs.
    pub fn masked_api_key(&self) -> Option<String> {
        self.openrouter_api_key.as_ref().map(|key| {
            if key.len() > 8 {
                format!("{}****{}", &key[..4], &key[key.len() - 4..])
            } else {
                "****".to_string()
            }
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
