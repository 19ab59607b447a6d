//! Fixed intake question bank — 7 ordered prompts, pure lookup.

/// The ordered questionnaire. One answer per question; question 4 (index 3)
/// expects a comma-separated list.
const QUESTIONS: &[&str] = &[
    "Quel est votre symptôme principal ? (ex: maux de tête, douleur abdominale...)",
    "Depuis combien de temps ressentez-vous ce symptôme ?",
    "Sur une échelle de 1 à 10, quelle est l'intensité de votre symptôme ?",
    "Quels autres symptômes associez-vous à ce problème ? (liste séparée par des virgules)",
    "Avez-vous des antécédents médicaux pertinents ?",
    "Prenez-vous actuellement des médicaments ? Lesquels ?",
    "Avez-vous des allergies connues ?",
];

/// Number of questions in the intake.
pub const QUESTION_COUNT: usize = QUESTIONS.len();

/// The prompt for `step`, or `None` once the intake is complete.
pub fn question_at(step: usize) -> Option<&'static str> {
    QUESTIONS.get(step).copied()
}

/// The opening prompt of every session.
pub fn first_question() -> &'static str {
    QUESTIONS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_has_exactly_seven_questions() {
        assert_eq!(QUESTION_COUNT, 7);
    }

    #[test]
    fn every_question_is_non_empty() {
        for step in 0..QUESTION_COUNT {
            assert!(!question_at(step).unwrap().is_empty());
        }
    }

    #[test]
    fn out_of_range_step_returns_none() {
        assert_eq!(question_at(QUESTION_COUNT), None);
        assert_eq!(question_at(100), None);
    }

    #[test]
    fn first_question_matches_step_zero() {
        assert_eq!(Some(first_question()), question_at(0));
    }

    #[test]
    fn associated_symptoms_question_asks_for_a_list() {
        assert!(question_at(3).unwrap().contains("virgules"));
    }

    #[test]
    fn intensity_question_gives_the_scale() {
        assert!(question_at(2).unwrap().contains("1 à 10"));
    }
}
