use serde::{Deserialize, Serialize};

/// Accumulated answers from the 7-question intake.
///
/// Mutated only by `IntakeSession`, one field per step, never retroactively
/// edited mid-session. Immutable once the final answer is stored — a new
/// diagnosis requires a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub principal_complaint: String,
    pub duration: String,
    /// Self-reported 1-10 scale, kept as entered.
    pub intensity: String,
    pub associated_symptoms: Vec<String>,
    pub history: String,
    pub medications: String,
    pub allergies: String,
}

impl SymptomRecord {
    /// Keyword text used for reference filtering and specialist matching:
    /// the principal complaint followed by the associated symptoms.
    pub fn keyword_text(&self) -> String {
        let mut text = self.principal_complaint.clone();
        for symptom in &self.associated_symptoms {
            text.push(' ');
            text.push_str(symptom);
        }
        text
    }
}
