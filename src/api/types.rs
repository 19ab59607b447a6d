//! Shared API state and request/response DTOs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DiagnosticCase, Doctor, Prescription, SymptomRecord};
use crate::routing::CaseRouter;
use crate::synthesis::report::ReportSections;

/// Message returned when no specialist could be found.
pub const NO_SPECIALIST_MESSAGE: &str = "\
Nous n'avons pas trouvé de médecin disponible pour votre cas actuellement. \
Veuillez nous contacter par email à support@mediconsult.com pour une \
assistance personnalisée.";

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct ApiContext {
    pub router: Arc<CaseRouter>,
}

impl ApiContext {
    pub fn new(router: Arc<CaseRouter>) -> Self {
        Self { router }
    }
}

// ═══════════════════════════════════════════════════════════
// Requests
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct StartIntakeRequest {
    pub patient_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// Route a case from a finished chat session, or directly from raw
/// symptom text (`patient_id` + `symptoms`).
#[derive(Debug, Deserialize)]
pub struct RouteCaseRequest {
    pub session_id: Option<Uuid>,
    pub patient_id: Option<u64>,
    pub symptoms: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TreatRequest {
    pub prescription: Option<Prescription>,
}

// ═══════════════════════════════════════════════════════════
// Responses
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct StartIntakeResponse {
    pub session_id: Uuid,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<SymptomRecord>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub diagnostic: String,
    pub sections: ReportSections,
}

/// Compact doctor view shown to the patient after routing.
#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub id: u64,
    pub name: String,
    pub specialty: String,
}

impl From<&Doctor> for DoctorSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteCaseResponse {
    pub routed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<DiagnosticCase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
