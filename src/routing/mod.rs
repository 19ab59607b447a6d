//! Case routing — orchestrates intake, synthesis, matching, persistence.
//!
//! The router owns nothing global: the session store, synthesizer, and
//! registry are constructed by the caller and injected. Per-session
//! operations hold the session's mutex for their full duration, so answer
//! N+1 cannot overlap answer N and a synthesis retry cannot overlap a
//! pending one.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::intake::session::SubmitOutcome;
use crate::intake::{IntakeError, SessionStore};
use crate::matching::{self, MatchOutcome, MatchTier};
use crate::models::enums::{CaseStatus, SessionStatus};
use crate::models::{CaseRef, DiagnosticCase, Doctor, Prescription};
use crate::registry::{Registry, RegistryError};
use crate::synthesis::{SynthesisError, Synthesizer};

/// Errors from routing operations.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("intake session {0} not found")]
    SessionNotFound(Uuid),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("diagnostic synthesis failed: {0}")]
    SynthesisFailed(#[from] SynthesisError),
    /// A persistence write failed — the case is NOT committed and no
    /// doctor is reported to the patient.
    #[error("the case could not be persisted: {0}")]
    PersistenceFailed(#[source] RegistryError),
    #[error("case {0} not found")]
    CaseNotFound(Uuid),
    /// The pending → treated transition already happened. Distinct from
    /// silent success so callers can tell a re-invocation apart.
    #[error("case {0} is already treated")]
    AlreadyTreated(Uuid),
}

/// A successful route: the persisted case and the assigned doctor.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Routed {
        case: DiagnosticCase,
        doctor: Doctor,
        tier: MatchTier,
    },
    /// No specialist and no generalist available — designed degradation,
    /// surfaced to the patient as an actionable message.
    NoSpecialist,
}

/// Read-only view of a session for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub patient_id: u64,
    pub status: SessionStatus,
    pub step: usize,
    pub question: Option<String>,
    pub has_diagnostic: bool,
}

pub struct CaseRouter {
    sessions: Arc<SessionStore>,
    synthesizer: Arc<dyn Synthesizer>,
    registry: Arc<dyn Registry>,
}

impl CaseRouter {
    pub fn new(
        sessions: Arc<SessionStore>,
        synthesizer: Arc<dyn Synthesizer>,
        registry: Arc<dyn Registry>,
    ) -> Self {
        Self {
            sessions,
            synthesizer,
            registry,
        }
    }

    // ── Intake ───────────────────────────────────────────────

    /// Open a session and return its id with the first prompt.
    pub async fn start_session(&self, patient_id: u64) -> (Uuid, &'static str) {
        let (id, first) = self.sessions.create(patient_id).await;
        tracing::info!(session = %id, patient = patient_id, "intake session started");
        (id, first)
    }

    /// Submit one answer; returns the next prompt or the finalized record.
    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Result<SubmitOutcome, RoutingError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or(RoutingError::SessionNotFound(session_id))?;
        let mut session = handle.lock().await;
        let outcome = session.submit_answer(text)?;
        if matches!(outcome, SubmitOutcome::Finalized(_)) {
            tracing::info!(session = %session_id, "intake finalized");
        }
        Ok(outcome)
    }

    /// Reset a session to step 0 with an emptied record.
    pub async fn reset_session(&self, session_id: Uuid) -> Result<&'static str, RoutingError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or(RoutingError::SessionNotFound(session_id))?;
        let first = handle.lock().await.reset();
        tracing::info!(session = %session_id, "intake session reset");
        Ok(first)
    }

    pub async fn session_snapshot(&self, session_id: Uuid) -> Result<SessionSnapshot, RoutingError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or(RoutingError::SessionNotFound(session_id))?;
        let session = handle.lock().await;
        Ok(SessionSnapshot {
            session_id,
            patient_id: session.patient_id(),
            status: session.status(),
            step: session.current_step(),
            question: session.current_question().map(String::from),
            has_diagnostic: session.diagnostic().is_some(),
        })
    }

    // ── Synthesis ────────────────────────────────────────────

    /// Generate and attach the diagnostic narrative for a finalized session.
    ///
    /// On failure the session stays in `READY_FOR_SYNTHESIS` and the call
    /// may be retried. Once attached, re-invocation returns the stored
    /// narrative without another backend round trip.
    pub async fn synthesize(&self, session_id: Uuid) -> Result<String, RoutingError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or(RoutingError::SessionNotFound(session_id))?;

        // The guard is held across the backend call: a concurrent retry
        // waits instead of racing the attach.
        let mut session = handle.lock().await;
        if let Some(existing) = session.diagnostic() {
            return Ok(existing.to_string());
        }
        if !session.is_finalized() {
            return Err(RoutingError::Intake(IntakeError::NotReady));
        }

        let record = session.record().clone();
        let narrative = self.synthesizer.synthesize(&record).await?;
        session.attach_diagnostic(narrative.clone())?;
        tracing::info!(session = %session_id, "diagnostic narrative attached");
        Ok(narrative)
    }

    // ── Routing ──────────────────────────────────────────────

    /// Route a finalized session to a specialist. Uses the attached
    /// narrative when present, otherwise the raw principal complaint
    /// (synthesis is optional on this path).
    pub async fn route_session(&self, session_id: Uuid) -> Result<RouteOutcome, RoutingError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or(RoutingError::SessionNotFound(session_id))?;
        let session = handle.lock().await;
        if !session.is_finalized() {
            return Err(RoutingError::Intake(IntakeError::NotReady));
        }
        let symptom_text = session
            .diagnostic()
            .map(String::from)
            .unwrap_or_else(|| session.record().principal_complaint.clone());
        let patient_id = session.patient_id();
        drop(session);

        self.route_text(patient_id, symptom_text).await
    }

    /// Direct-diagnostic path: route raw symptom text without the chat flow.
    pub async fn route_direct(
        &self,
        patient_id: u64,
        raw_text: &str,
    ) -> Result<RouteOutcome, RoutingError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(RoutingError::Intake(IntakeError::EmptyAnswer));
        }
        self.route_text(patient_id, trimmed.to_string()).await
    }

    async fn route_text(
        &self,
        patient_id: u64,
        symptom_text: String,
    ) -> Result<RouteOutcome, RoutingError> {
        let roster = self
            .registry
            .list_doctors()
            .await
            .map_err(RoutingError::PersistenceFailed)?;

        let (doctor, tier) = match matching::find_specialist(&symptom_text, &roster) {
            MatchOutcome::Matched { doctor, tier } => (doctor, tier),
            MatchOutcome::NoMatch => {
                tracing::warn!(patient = patient_id, "no specialist available");
                return Ok(RouteOutcome::NoSpecialist);
            }
        };
        tracing::info!(patient = patient_id, doctor = %doctor.name, ?tier, "specialist matched");

        let patient_name = match self
            .registry
            .get_patient(patient_id)
            .await
            .map_err(RoutingError::PersistenceFailed)?
        {
            Some(patient) => patient.name,
            None => format!("Patient {patient_id}"),
        };

        let case = DiagnosticCase {
            id: Uuid::new_v4(),
            patient_id,
            patient_name: patient_name.clone(),
            created_at: Utc::now(),
            symptom_text: symptom_text.clone(),
            status: CaseStatus::Pending,
            assigned_doctor_id: Some(doctor.id),
            doctor_name: Some(doctor.name.clone()),
            prescription: None,
        };
        let case_ref = CaseRef {
            patient_id,
            patient_name,
            date: case.created_at.to_rfc3339(),
            symptoms: symptom_text,
            status: CaseStatus::Pending,
        };

        // Both writes must land before the match is reported; a failure
        // on either surfaces as PersistenceFailed with no doctor shown.
        self.registry
            .append_doctor_case(doctor.id, &case_ref)
            .await
            .map_err(RoutingError::PersistenceFailed)?;
        self.registry
            .create_case(&case)
            .await
            .map_err(RoutingError::PersistenceFailed)?;

        tracing::info!(case = %case.id, doctor = doctor.id, "case routed");
        Ok(RouteOutcome::Routed { case, doctor, tier })
    }

    // ── Doctor-side lifecycle ────────────────────────────────

    /// Transition a case pending → treated, optionally attaching a
    /// prescription. Exactly-once: a second call reports `AlreadyTreated`.
    pub async fn mark_treated(
        &self,
        case_id: Uuid,
        prescription: Option<Prescription>,
    ) -> Result<(), RoutingError> {
        let mut case = self
            .registry
            .get_case(case_id)
            .await
            .map_err(RoutingError::PersistenceFailed)?
            .ok_or(RoutingError::CaseNotFound(case_id))?;

        if case.status == CaseStatus::Treated {
            return Err(RoutingError::AlreadyTreated(case_id));
        }

        case.status = CaseStatus::Treated;
        case.prescription = prescription;
        self.registry
            .update_case(&case)
            .await
            .map_err(RoutingError::PersistenceFailed)?;
        tracing::info!(case = %case_id, "case marked treated");
        Ok(())
    }

    /// Administrative history deletion — terminal and irreversible.
    pub async fn delete_case(&self, case_id: Uuid) -> Result<(), RoutingError> {
        match self.registry.delete_case(case_id).await {
            Ok(()) => {
                tracing::info!(case = %case_id, "case deleted");
                Ok(())
            }
            Err(RegistryError::NotFound { .. }) => Err(RoutingError::CaseNotFound(case_id)),
            Err(e) => Err(RoutingError::PersistenceFailed(e)),
        }
    }
}
