//! Structured symptom intake — question bank, per-session state machine,
//! and the store that serializes access to each session.

pub mod questions;
pub mod session;
pub mod store;

pub use session::{IntakeError, IntakeSession, SubmitOutcome};
pub use store::SessionStore;
