use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "MediGuide";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the HTTP API.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8350";

/// Default base URL of the persistence backend (resource-oriented REST).
const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Default base URL of the local Ollama instance.
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default generation model for diagnostic synthesis.
const DEFAULT_MODEL: &str = "medgemma:4b";

/// Default bound on a synthesis round trip, in seconds.
const DEFAULT_SYNTHESIS_TIMEOUT_SECS: u64 = 30;

/// Default bound on a persistence round trip, in seconds.
const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_secs_or(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Address the API server binds to (`MEDIGUIDE_BIND_ADDR`).
pub fn bind_addr() -> String {
    env_or("MEDIGUIDE_BIND_ADDR", DEFAULT_BIND_ADDR)
}

/// Base URL of the persistence backend (`MEDIGUIDE_BACKEND_URL`).
pub fn backend_url() -> String {
    env_or("MEDIGUIDE_BACKEND_URL", DEFAULT_BACKEND_URL)
}

/// Base URL of the Ollama instance (`OLLAMA_BASE_URL`).
pub fn ollama_url() -> String {
    env_or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_URL)
}

/// Generation model used for synthesis (`MEDIGUIDE_MODEL`).
pub fn generation_model() -> String {
    env_or("MEDIGUIDE_MODEL", DEFAULT_MODEL)
}

/// Bound on a synthesis round trip (`MEDIGUIDE_SYNTHESIS_TIMEOUT_SECS`).
/// Expiry is reported as a synthesis failure, retryable by the caller.
pub fn synthesis_timeout() -> Duration {
    Duration::from_secs(env_secs_or(
        "MEDIGUIDE_SYNTHESIS_TIMEOUT_SECS",
        DEFAULT_SYNTHESIS_TIMEOUT_SECS,
    ))
}

/// Bound on a persistence round trip (`MEDIGUIDE_REGISTRY_TIMEOUT_SECS`).
pub fn registry_timeout() -> Duration {
    Duration::from_secs(env_secs_or(
        "MEDIGUIDE_REGISTRY_TIMEOUT_SECS",
        DEFAULT_REGISTRY_TIMEOUT_SECS,
    ))
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "mediguide=info,tower_http=info".to_string()
}
