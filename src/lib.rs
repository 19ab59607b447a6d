//! MediGuide — LLM-guided symptom intake and specialist case routing.
//!
//! A patient walks a fixed 7-question intake driven by a per-session state
//! machine; a local generation backend synthesizes a diagnostic narrative;
//! a deterministic keyword matcher assigns a specialist from the roster held
//! by the persistence backend; doctors transition cases pending → treated.

pub mod api;
pub mod config;
pub mod intake;
pub mod matching;
pub mod models;
pub mod registry;
pub mod routing;
pub mod synthesis;

/// Boxed future used by the async collaborator traits (`Synthesizer`,
/// `Registry`) so they stay object-safe.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
