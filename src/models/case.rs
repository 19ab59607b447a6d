use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::CaseStatus;

/// A routed diagnostic case — the unit of work a doctor triages.
///
/// Transitions pending → treated exactly once, never backward, only by
/// doctor action. Deleted only by explicit administrative history deletion,
/// which is terminal on the collaborator side.
///
/// Wire field names follow the persistence backend's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticCase {
    pub id: Uuid,
    #[serde(rename = "patientId")]
    pub patient_id: u64,
    #[serde(rename = "patientName")]
    pub patient_name: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    /// Raw principal complaint or the synthesized diagnostic narrative.
    #[serde(rename = "symptoms")]
    pub symptom_text: String,
    pub status: CaseStatus,
    #[serde(rename = "doctorId", default, skip_serializing_if = "Option::is_none")]
    pub assigned_doctor_id: Option<u64>,
    #[serde(rename = "DoctorName", default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(rename = "ordonnance", default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<Prescription>,
}

/// Prescription attached when a doctor treats a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(rename = "nomMedicament")]
    pub medication_name: String,
    #[serde(rename = "forme")]
    pub form: String,
    pub dosage: String,
    #[serde(rename = "posologie")]
    pub posology: String,
    #[serde(rename = "duree")]
    pub duration: String,
}
