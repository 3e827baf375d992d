//! LLM Gateway — the single point of entry for all OpenRouter API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion endpoint
//! directly. All LLM interactions MUST go through this module.
//!
//! The gateway performs no retries; retry policy belongs to the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

pub mod prompts;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const MAX_TOKENS: u32 = 1024;
/// Lower temperature for more deterministic analysis output.
const TEMPERATURE: f32 = 0.5;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(60);
/// Error bodies are truncated to this many characters before logging.
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OpenRouter API key is not configured")]
    MissingApiKey,

    #[error("request to completion endpoint timed out")]
    Timeout,

    #[error("network error calling completion endpoint: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// The single LLM client used by all services. Holds one pooled HTTP client
/// for the process lifetime; connections are released when it drops.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(READ_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one prompt to the chat-completion endpoint and returns the raw
    /// completion text (`choices[0].message.content`). The credential is
    /// checked before any request leaves the process.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(
            "Calling OpenRouter. Model: {}. Prompt length: {} chars.",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            match status.as_u16() {
                401 => error!("OpenRouter returned 401. Check if OPENROUTER_API_KEY is correct."),
                402 => error!("OpenRouter quota likely exceeded. Check your account."),
                400 => error!("Bad request sent to OpenRouter. Check prompt format and parameters."),
                _ => error!("OpenRouter returned {status}: {body}"),
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                LlmError::MalformedResponse("response contained no completion text".to_string())
            })?;

        debug!("OpenRouter call succeeded ({} chars).", content.len());
        Ok(content)
    }
}
