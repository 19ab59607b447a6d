//! Specialist matching — deterministic keyword routing of symptom text to
//! a doctor.
//!
//! One canonical procedure (the product previously shipped two divergent
//! scans): lowercase everything, tokenize the symptom text on whitespace
//! with punctuation stripped from token edges, then tier the roster —
//! exact specialty token, partial substring/stem overlap, and finally the
//! generalist fallback scan. Selection within the winning tier is uniform
//! random. An empty result is a designed degradation, not an error.

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::models::Doctor;

/// Minimum shared prefix for the stem tier. Inflected medical French pairs
/// like "cardiaque" / "cardiologue" share no substring relation but agree
/// on their first five characters.
const STEM_PREFIX_LEN: usize = 5;

/// Tokens shorter than this never partial-match: stopwords ("de", "la",
/// "et") would otherwise substring-match most specialty names.
const MIN_PARTIAL_TOKEN_LEN: usize = 4;

/// How a doctor matched the symptom text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// A symptom token equals the specialty.
    Exact,
    /// Substring or stem-prefix overlap between a token and the specialty.
    Partial,
    /// Selected by the generalist fallback scan.
    Generalist,
}

/// Outcome of a match attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched { doctor: Doctor, tier: MatchTier },
    NoMatch,
}

/// Lowercase, split on whitespace, strip punctuation from token edges.
/// Synthesized narratives flow through here too, so markdown edges
/// (`**`, list dashes) are stripped along with sentence punctuation.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| {
                matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | '(' | ')' | '*' | '-')
            })
            .to_string()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// True when `a` and `b` agree on their first `STEM_PREFIX_LEN` characters.
fn shares_stem(a: &str, b: &str) -> bool {
    let mut shared = 0;
    let mut a_chars = a.chars();
    let mut b_chars = b.chars();
    loop {
        match (a_chars.next(), b_chars.next()) {
            (Some(x), Some(y)) if x == y => shared += 1,
            _ => break,
        }
        if shared >= STEM_PREFIX_LEN {
            return true;
        }
    }
    false
}

fn tier_for(tokens: &[String], specialty: &str) -> Option<MatchTier> {
    let specialty = specialty.to_lowercase();
    let specialty = specialty.trim();
    if specialty.is_empty() {
        return None;
    }

    if tokens.iter().any(|token| token == specialty) {
        return Some(MatchTier::Exact);
    }

    let partial = tokens
        .iter()
        .filter(|token| token.chars().count() >= MIN_PARTIAL_TOKEN_LEN)
        .any(|token| {
            specialty.contains(token.as_str())
                || token.contains(specialty)
                || shares_stem(token, specialty)
        });
    partial.then_some(MatchTier::Partial)
}

/// Generalist scan covers both plain and accented spellings
/// ("generaliste", "généraliste", "médecine générale").
fn is_generalist(specialty: &str) -> bool {
    let lowered = specialty.to_lowercase();
    lowered.contains("general") || lowered.contains("généra")
}

/// Pick a specialist for `symptom_text` from `roster`.
pub fn find_specialist(symptom_text: &str, roster: &[Doctor]) -> MatchOutcome {
    let tokens = tokenize(symptom_text);

    let mut exact: Vec<&Doctor> = Vec::new();
    let mut partial: Vec<&Doctor> = Vec::new();
    for doctor in roster {
        match tier_for(&tokens, &doctor.specialty) {
            Some(MatchTier::Exact) => exact.push(doctor),
            Some(MatchTier::Partial) => partial.push(doctor),
            _ => {}
        }
    }

    let mut rng = rand::thread_rng();
    if let Some(doctor) = exact.choose(&mut rng) {
        return MatchOutcome::Matched {
            doctor: (*doctor).clone(),
            tier: MatchTier::Exact,
        };
    }
    if let Some(doctor) = partial.choose(&mut rng) {
        return MatchOutcome::Matched {
            doctor: (*doctor).clone(),
            tier: MatchTier::Partial,
        };
    }

    let generalists: Vec<&Doctor> = roster
        .iter()
        .filter(|doctor| is_generalist(&doctor.specialty))
        .collect();
    if let Some(doctor) = generalists.choose(&mut rng) {
        return MatchOutcome::Matched {
            doctor: (*doctor).clone(),
            tier: MatchTier::Generalist,
        };
    }

    MatchOutcome::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(id: u64, specialty: &str) -> Doctor {
        Doctor {
            id,
            name: format!("Dr. {id}"),
            specialty: specialty.into(),
            assigned_cases: Vec::new(),
        }
    }

    fn matched_id(outcome: MatchOutcome) -> u64 {
        match outcome {
            MatchOutcome::Matched { doctor, .. } => doctor.id,
            MatchOutcome::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn cardiac_symptoms_route_to_the_cardiologist() {
        let roster = vec![doctor(1, "cardiologue"), doctor(2, "dermatologue")];
        let outcome = find_specialist("douleur cardiaque thoracique", &roster);
        assert_eq!(matched_id(outcome), 1);
    }

    #[test]
    fn unknown_symptoms_fall_back_to_the_generalist() {
        let roster = vec![doctor(3, "generaliste")];
        match find_specialist("symptôme inconnu xyz", &roster) {
            MatchOutcome::Matched { doctor, tier } => {
                assert_eq!(doctor.id, 3);
                assert_eq!(tier, MatchTier::Generalist);
            }
            MatchOutcome::NoMatch => panic!("expected generalist fallback"),
        }
    }

    #[test]
    fn unknown_symptoms_without_generalist_is_no_match() {
        let roster = vec![doctor(2, "dermatologue")];
        assert_eq!(
            find_specialist("symptôme inconnu xyz", &roster),
            MatchOutcome::NoMatch
        );
    }

    #[test]
    fn exact_specialty_token_beats_partial_overlap() {
        // "dermatologue" appears verbatim; "cardiaque" only stem-matches.
        let roster = vec![doctor(1, "cardiologue"), doctor(2, "dermatologue")];
        let outcome =
            find_specialist("problème cardiaque, avis dermatologue demandé", &roster);
        match outcome {
            MatchOutcome::Matched { doctor, tier } => {
                assert_eq!(doctor.id, 2);
                assert_eq!(tier, MatchTier::Exact);
            }
            MatchOutcome::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn punctuation_does_not_break_exact_matching() {
        let roster = vec![doctor(5, "dermatologue")];
        let outcome = find_specialist("Dermatologue, s'il vous plaît.", &roster);
        match outcome {
            MatchOutcome::Matched { tier, .. } => assert_eq!(tier, MatchTier::Exact),
            MatchOutcome::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn stopwords_never_partial_match() {
        // "de" is a substring of "dermatologue" but too short to count.
        let roster = vec![doctor(2, "dermatologue")];
        assert_eq!(
            find_specialist("mal de ventre", &roster),
            MatchOutcome::NoMatch
        );
    }

    #[test]
    fn accented_generalist_spelling_is_found() {
        let roster = vec![doctor(4, "Médecine générale")];
        let outcome = find_specialist("symptôme inconnu", &roster);
        assert_eq!(matched_id(outcome), 4);
    }

    #[test]
    fn specialty_matching_is_case_insensitive() {
        let roster = vec![doctor(6, "Cardiologue")];
        let outcome = find_specialist("DOULEUR CARDIAQUE", &roster);
        assert_eq!(matched_id(outcome), 6);
    }

    #[test]
    fn empty_roster_is_no_match() {
        assert_eq!(find_specialist("fièvre", &[]), MatchOutcome::NoMatch);
    }

    #[test]
    fn empty_symptom_text_reaches_the_generalist_only() {
        let roster = vec![doctor(1, "cardiologue"), doctor(3, "generaliste")];
        let outcome = find_specialist("", &roster);
        assert_eq!(matched_id(outcome), 3);
    }

    #[test]
    fn selection_among_equals_is_confined_to_candidates() {
        let roster = vec![
            doctor(1, "cardiologue"),
            doctor(2, "cardiologue"),
            doctor(9, "dermatologue"),
        ];
        for _ in 0..20 {
            let id = matched_id(find_specialist("douleur cardiaque", &roster));
            assert!(id == 1 || id == 2, "unexpected doctor {id}");
        }
    }

    #[test]
    fn stem_prefix_requires_five_shared_characters() {
        assert!(shares_stem("cardiaque", "cardiologue"));
        // "derme" / "dermatologue" agree on only 4 characters
        assert!(!shares_stem("derme", "dermatologue"));
        assert!(!shares_stem("fièvre", "cardiologue"));
    }

    #[test]
    fn tokenize_strips_punctuation_and_lowers() {
        let tokens = tokenize("Douleur, thoracique. (aiguë)");
        assert_eq!(tokens, vec!["douleur", "thoracique", "aiguë"]);
    }
}
