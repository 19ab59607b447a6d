//! Prompt assembly for diagnostic synthesis.
//!
//! The system prompt fixes the four-section output contract (`report`
//! extracts the sections back out by marker); the user prompt lays out the
//! finalized record plus any ranked reference snippets.

use crate::models::SymptomRecord;

use super::reference::RankedSource;

/// Reference snippets are truncated to this many characters in the prompt.
const SNIPPET_MAX_CHARS: usize = 500;

pub const SYSTEM_PROMPT: &str = "\
Tu es un assistant médical virtuel professionnel. Les utilisateurs sont en \
Afrique, précisément en RDC; tes résultats se réfèrent au contexte de ce \
milieu. Après avoir recueilli les 7 informations clés du patient, tu dois:
1. Synthétiser les informations
2. Proposer un diagnostic différentiel en 3 points maximum
3. Recommander des actions appropriées et le degré d'urgence \
(consultation immédiate / sous 48h / surveillance)
4. Donner des conseils pratiques pour le soulagement des symptômes

Structure ta réponse avec exactement ces quatre sections, dans cet ordre:
**SYNTHÈSE DES SYMPTÔMES**
**DIAGNOSTIC PRÉLIMINAIRE**
**RECOMMANDATIONS**
**CONSEILS PRATIQUES**

Sois empathique et factuel. Utilise des termes médicaux précis mais expliqués.";

/// Assemble the user prompt from a finalized record and ranked references.
pub fn build_user_prompt(record: &SymptomRecord, references: &[RankedSource]) -> String {
    let mut prompt = format!(
        "Sur la base des informations suivantes:\n\
         - Symptôme principal: {}\n\
         - Durée: {}\n\
         - Intensité: {}/10\n\
         - Symptômes associés: {}\n\
         - Antécédents: {}\n\
         - Médicaments: {}\n\
         - Allergies: {}\n",
        record.principal_complaint,
        record.duration,
        record.intensity,
        record.associated_symptoms.join(", "),
        record.history,
        record.medications,
        record.allergies,
    );

    if !references.is_empty() {
        prompt.push_str("\nInformations supplémentaires des sources médicales:\n");
        for reference in references {
            prompt.push_str("Source: ");
            prompt.push_str(&reference.source);
            prompt.push('\n');
            prompt.push_str(truncate_chars(&reference.content, SNIPPET_MAX_CHARS));
            prompt.push('\n');
        }
    }

    prompt.push_str("\nFournis les quatre sections demandées.");
    prompt
}

/// Truncate at a character count without splitting a UTF-8 sequence.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> SymptomRecord {
        SymptomRecord {
            principal_complaint: "fièvre".into(),
            duration: "3 jours".into(),
            intensity: "7".into(),
            associated_symptoms: vec!["toux".into(), "fatigue".into()],
            history: "aucun".into(),
            medications: "aucun".into(),
            allergies: "aucune".into(),
        }
    }

    #[test]
    fn system_prompt_pins_the_four_markers() {
        assert!(SYSTEM_PROMPT.contains("**SYNTHÈSE DES SYMPTÔMES**"));
        assert!(SYSTEM_PROMPT.contains("**DIAGNOSTIC PRÉLIMINAIRE**"));
        assert!(SYSTEM_PROMPT.contains("**RECOMMANDATIONS**"));
        assert!(SYSTEM_PROMPT.contains("**CONSEILS PRATIQUES**"));
    }

    #[test]
    fn user_prompt_lists_every_field() {
        let prompt = build_user_prompt(&sample_record(), &[]);
        assert!(prompt.contains("Symptôme principal: fièvre"));
        assert!(prompt.contains("Durée: 3 jours"));
        assert!(prompt.contains("Intensité: 7/10"));
        assert!(prompt.contains("Symptômes associés: toux, fatigue"));
        assert!(prompt.contains("Allergies: aucune"));
        assert!(!prompt.contains("sources médicales"));
    }

    #[test]
    fn user_prompt_embeds_references() {
        let references = vec![RankedSource {
            source: "oms.int/paludisme".into(),
            content: "Le paludisme provoque fièvre et frissons.".into(),
            relevance: 2,
        }];
        let prompt = build_user_prompt(&sample_record(), &references);
        assert!(prompt.contains("Source: oms.int/paludisme"));
        assert!(prompt.contains("frissons"));
    }

    #[test]
    fn long_snippets_are_truncated_on_char_boundaries() {
        let content = "é".repeat(600);
        let references = vec![RankedSource {
            source: "s".into(),
            content,
            relevance: 1,
        }];
        // Must not panic on the multi-byte boundary.
        let prompt = build_user_prompt(&sample_record(), &references);
        assert!(prompt.contains(&"é".repeat(SNIPPET_MAX_CHARS)));
        assert!(!prompt.contains(&"é".repeat(SNIPPET_MAX_CHARS + 1)));
    }

    #[test]
    fn truncate_keeps_short_text_intact() {
        assert_eq!(truncate_chars("fièvre", 500), "fièvre");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }
}
