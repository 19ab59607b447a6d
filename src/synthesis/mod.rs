//! Diagnostic synthesis boundary.
//!
//! The router talks to "something that turns a finalized `SymptomRecord`
//! into a narrative" through the `Synthesizer` trait; the Ollama client is
//! the production implementation and `MockSynthesizer` the test double.
//! The synthesizer is always constructed explicitly and injected — there is
//! no global instance.

pub mod ollama;
pub mod prompt;
pub mod reference;
pub mod report;

pub use ollama::OllamaSynthesizer;

use crate::models::SymptomRecord;
use crate::BoxFuture;

/// Errors from a synthesis round trip.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Generation backend unreachable.
    #[error("cannot reach the generation backend at {0}")]
    Connection(String),
    /// The round trip exceeded the configured bound.
    #[error("synthesis timed out after {0}s")]
    Timeout(u64),
    /// Backend answered with a non-success status.
    #[error("generation backend responded {status}: {body}")]
    Backend { status: u16, body: String },
    /// Transport-level failure other than connect/timeout.
    #[error("HTTP error during synthesis: {0}")]
    Http(String),
    /// Backend payload did not parse.
    #[error("unreadable generation response: {0}")]
    ResponseParsing(String),
}

/// Generates a diagnostic narrative from a finalized record.
pub trait Synthesizer: Send + Sync {
    fn synthesize<'a>(
        &'a self,
        record: &'a SymptomRecord,
    ) -> BoxFuture<'a, Result<String, SynthesisError>>;
}

/// Mock synthesizer for tests — returns a configured narrative or fails.
pub struct MockSynthesizer {
    narrative: String,
    fail: bool,
}

impl MockSynthesizer {
    pub fn new(narrative: &str) -> Self {
        Self {
            narrative: narrative.to_string(),
            fail: false,
        }
    }

    /// A synthesizer whose every call fails with a connection error.
    pub fn failing() -> Self {
        Self {
            narrative: String::new(),
            fail: true,
        }
    }
}

impl Synthesizer for MockSynthesizer {
    fn synthesize<'a>(
        &'a self,
        _record: &'a SymptomRecord,
    ) -> BoxFuture<'a, Result<String, SynthesisError>> {
        Box::pin(async move {
            if self.fail {
                Err(SynthesisError::Connection("mock backend".into()))
            } else {
                Ok(self.narrative.clone())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_configured_narrative() {
        let synthesizer = MockSynthesizer::new("**DIAGNOSTIC PRÉLIMINAIRE**\n- grippe");
        let narrative = synthesizer
            .synthesize(&SymptomRecord::default())
            .await
            .unwrap();
        assert!(narrative.contains("grippe"));
    }

    #[tokio::test]
    async fn failing_mock_surfaces_connection_error() {
        let synthesizer = MockSynthesizer::failing();
        let err = synthesizer
            .synthesize(&SymptomRecord::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Connection(_)));
    }
}
