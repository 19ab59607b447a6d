//! Intake session state machine.
//!
//! Walks the question bank one answer at a time, accumulating a
//! `SymptomRecord`. The session never calls the synthesizer itself —
//! the case router orchestrates synthesis once the record is finalized,
//! which keeps this machine independently testable.

use uuid::Uuid;

use crate::models::enums::SessionStatus;
use crate::models::SymptomRecord;

use super::questions;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the answer to question `step` (0-based).
    AwaitingAnswer(usize),
    /// All 7 answers stored; the record is final and synthesis may run.
    ReadyForSynthesis,
    /// A diagnostic narrative has been attached.
    Complete,
}

/// Errors from intake operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    /// The answer was empty after trimming. Re-prompt the patient.
    #[error("answer is empty after trimming")]
    EmptyAnswer,
    /// The questionnaire is already finished; submitting again is misuse.
    #[error("intake is already complete")]
    SessionComplete,
    /// The questionnaire is not finished yet.
    #[error("intake is not finished")]
    NotReady,
}

/// Outcome of a successful `submit_answer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Intake continues — present this prompt next.
    NextQuestion(&'static str),
    /// Intake finished — the finalized record, ready for synthesis.
    Finalized(SymptomRecord),
}

/// A single-patient intake conversation.
pub struct IntakeSession {
    id: Uuid,
    patient_id: u64,
    state: SessionState,
    record: SymptomRecord,
    diagnostic: Option<String>,
}

impl IntakeSession {
    pub fn new(patient_id: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            state: SessionState::AwaitingAnswer(0),
            record: SymptomRecord::default(),
            diagnostic: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn patient_id(&self) -> u64 {
        self.patient_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::AwaitingAnswer(_) => SessionStatus::InProgress,
            SessionState::ReadyForSynthesis => SessionStatus::AwaitingDiagnosis,
            SessionState::Complete => SessionStatus::Complete,
        }
    }

    /// Current step in `[0, 7]` — 7 once all answers are stored.
    pub fn current_step(&self) -> usize {
        match self.state {
            SessionState::AwaitingAnswer(step) => step,
            _ => questions::QUESTION_COUNT,
        }
    }

    /// The prompt to present, or `None` once the intake is finished.
    pub fn current_question(&self) -> Option<&'static str> {
        match self.state {
            SessionState::AwaitingAnswer(step) => questions::question_at(step),
            _ => None,
        }
    }

    pub fn record(&self) -> &SymptomRecord {
        &self.record
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// True once all 7 answers are stored (synthesis may or may not have run).
    pub fn is_finalized(&self) -> bool {
        !matches!(self.state, SessionState::AwaitingAnswer(_))
    }

    /// Store one answer and advance the machine.
    pub fn submit_answer(&mut self, text: &str) -> Result<SubmitOutcome, IntakeError> {
        let step = match self.state {
            SessionState::AwaitingAnswer(step) => step,
            _ => return Err(IntakeError::SessionComplete),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::EmptyAnswer);
        }

        self.store_answer(step, trimmed);

        match questions::question_at(step + 1) {
            Some(next) => {
                self.state = SessionState::AwaitingAnswer(step + 1);
                Ok(SubmitOutcome::NextQuestion(next))
            }
            None => {
                self.state = SessionState::ReadyForSynthesis;
                Ok(SubmitOutcome::Finalized(self.record.clone()))
            }
        }
    }

    /// Attach the synthesized narrative, completing the session.
    pub fn attach_diagnostic(&mut self, narrative: String) -> Result<(), IntakeError> {
        match self.state {
            SessionState::ReadyForSynthesis => {
                self.diagnostic = Some(narrative);
                self.state = SessionState::Complete;
                Ok(())
            }
            SessionState::AwaitingAnswer(_) => Err(IntakeError::NotReady),
            SessionState::Complete => Err(IntakeError::SessionComplete),
        }
    }

    /// Return to step 0 with an emptied record. Valid from any state.
    pub fn reset(&mut self) -> &'static str {
        self.state = SessionState::AwaitingAnswer(0);
        self.record = SymptomRecord::default();
        self.diagnostic = None;
        questions::first_question()
    }

    fn store_answer(&mut self, step: usize, trimmed: &str) {
        match step {
            0 => self.record.principal_complaint = trimmed.to_string(),
            1 => self.record.duration = trimmed.to_string(),
            2 => self.record.intensity = trimmed.to_string(),
            3 => {
                self.record.associated_symptoms = trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            4 => self.record.history = trimmed.to_string(),
            5 => self.record.medications = trimmed.to_string(),
            _ => self.record.allergies = trimmed.to_string(),
        }
    }
}
