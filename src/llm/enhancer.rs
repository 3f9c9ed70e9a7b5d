//! Core `Enhancer` trait and `ApiEnhancer` implementation.
//!
//! `ApiEnhancer` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! — Ollama (OpenAI mode), OpenAI, Groq, LM Studio, vLLM, etc.
//! All connection details come from [`EnhancerConfig`]; nothing is hardcoded.
//!
//! The enhancer's job is narrow: clean up raw speech-to-text output
//! (punctuation, capitalization, obvious mis-hearings) while preserving the
//! meaning and wording.  Callers that need the never-fail guarantee should
//! wrap the enhancer in [`crate::llm::FallbackEnhancer`].

use async_trait::async_trait;
use thiserror::Error;

use crate::config::EnhancerConfig;

// ---------------------------------------------------------------------------
// EnhanceError
// ---------------------------------------------------------------------------

/// Errors that can occur during an enhancement call.
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("enhancer request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse enhancer response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("enhancer returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for EnhanceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EnhanceError::Timeout
        } else {
            EnhanceError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Enhancer trait
// ---------------------------------------------------------------------------

/// Async trait for LLM-based transcript cleanup.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Enhancer>`).
///
/// The input is always non-empty — the worker skips the enhancement stage
/// for empty transcripts.
#[async_trait]
pub trait Enhancer: Send + Sync {
    /// Return a cleaned variant of `text` that preserves its meaning.
    async fn enhance(&self, text: &str) -> Result<String, EnhanceError>;

    /// Human-readable activity status for the startup banner.
    fn status(&self) -> String;
}

// ---------------------------------------------------------------------------
// ApiEnhancer
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Works with: Ollama (OpenAI mode), OpenAI, Groq, Together.ai, LM Studio,
/// vLLM — any provider that speaks the OpenAI chat-completions wire format.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `model`) come exclusively
/// from the [`EnhancerConfig`] passed to [`ApiEnhancer::from_config`].
pub struct ApiEnhancer {
    client: reqwest::Client,
    config: EnhancerConfig,
}

impl ApiEnhancer {
    const SYSTEM_PROMPT: &'static str = "You clean raw speech-to-text output.\n\
        Rules:\n\
        - Preserve meaning.\n\
        - Keep wording close to the original.\n\
        - Fix punctuation, capitalization, and obvious transcription mistakes.\n\
        - Return only the cleaned text.";

    /// Build an `ApiEnhancer` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &EnhancerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Enhancer for ApiEnhancer {
    /// Send `text` to the configured endpoint for cleanup.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty — safe for
    /// Ollama and other local providers that require no authentication.
    async fn enhance(&self, text: &str) -> Result<String, EnhanceError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        // Short inputs need few tokens; cap generation relative to input so
        // a chatty model cannot pad the transcript.
        let max_tokens = (text.len() * 2).clamp(64, 256);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": Self::SYSTEM_PROMPT },
                { "role": "user",   "content": text }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  max_tokens
        });

        let mut req = self.client.post(&url).json(&body);

        // Attach Authorization header only when api_key is a non-empty string.
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EnhanceError::Parse(e.to_string()))?;

        let cleaned = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(EnhanceError::EmptyResponse)?
            .trim()
            .to_string();

        if cleaned.is_empty() {
            return Err(EnhanceError::EmptyResponse);
        }

        Ok(cleaned)
    }

    fn status(&self) -> String {
        format!(
            "enabled ({} via {})",
            self.config.model, self.config.base_url
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
