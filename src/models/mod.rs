pub mod case;
pub mod doctor;
pub mod enums;
pub mod patient;
pub mod symptom;

pub use case::{DiagnosticCase, Prescription};
pub use doctor::{CaseRef, Doctor};
pub use patient::Patient;
pub use symptom::SymptomRecord;
