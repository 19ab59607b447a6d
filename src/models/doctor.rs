use serde::{Deserialize, Serialize};

use super::enums::CaseStatus;

/// Case reference embedded in a doctor's roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRef {
    #[serde(rename = "patientId")]
    pub patient_id: u64,
    #[serde(rename = "patientName")]
    pub patient_name: String,
    pub date: String,
    pub symptoms: String,
    pub status: CaseStatus,
}

/// Doctor roster entry as read from the persistence collaborator.
///
/// Only the fields the matcher and router touch are modeled; the
/// collaborator owns the rest (contact details, credentials, profile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u64,
    #[serde(rename = "noms")]
    pub name: String,
    #[serde(rename = "specialite")]
    pub specialty: String,
    #[serde(rename = "diagnosticPatient", default)]
    pub assigned_cases: Vec<CaseRef>,
}
