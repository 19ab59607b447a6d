//! Async Ollama client for diagnostic narrative generation.
//!
//! Speaks `/api/generate` (non-streaming). Every call is bounded by the
//! configured timeout; expiry surfaces as a retryable synthesis failure.
//! The client may carry a reference corpus — snippets are keyword-filtered
//! and relevance-ranked before being embedded in the prompt.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::SymptomRecord;
use crate::BoxFuture;

use super::reference::{self, ReferenceDoc};
use super::{prompt, SynthesisError, Synthesizer};

/// Ollama HTTP client for narrative generation.
pub struct OllamaSynthesizer {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
    references: Vec<ReferenceDoc>,
}

impl OllamaSynthesizer {
    /// Create a client pointing at an Ollama instance.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
            references: Vec::new(),
        }
    }

    /// Build from `OLLAMA_BASE_URL` / `MEDIGUIDE_MODEL` /
    /// `MEDIGUIDE_SYNTHESIS_TIMEOUT_SECS`, with local defaults.
    pub fn from_env() -> Self {
        Self::new(
            &config::ollama_url(),
            &config::generation_model(),
            config::synthesis_timeout(),
        )
    }

    /// Attach a reference corpus consulted on every synthesis.
    pub fn with_references(mut self, references: Vec<ReferenceDoc>) -> Self {
        self.references = references;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, system: &str, user_prompt: &str) -> Result<String, SynthesisError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt: user_prompt,
            system,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                SynthesisError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                SynthesisError::Timeout(self.timeout_secs)
            } else {
                SynthesisError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }
}

impl Synthesizer for OllamaSynthesizer {
    fn synthesize<'a>(
        &'a self,
        record: &'a SymptomRecord,
    ) -> BoxFuture<'a, Result<String, SynthesisError>> {
        Box::pin(async move {
            let ranked = reference::rank_references(&self.references, &record.keyword_text());
            let user_prompt = prompt::build_user_prompt(record, &ranked);
            tracing::debug!(
                model = %self.model,
                references = ranked.len(),
                "requesting diagnostic synthesis"
            );
            self.generate(prompt::SYSTEM_PROMPT, &user_prompt).await
        })
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}
