//! HTTP surface — axum router, structured JSON errors, server lifecycle.

pub mod error;
pub mod router;
pub mod server;
pub mod types;
