//! Marker-delimited narrative sections.
//!
//! The narrative is a versioned textual contract: four sections delimited
//! by literal bold markers. The raw string stays the source of truth —
//! sections are extracted on read and any marker may be absent, in which
//! case display code falls back to the raw text.

use serde::Serialize;

pub const MARKER_SYNTHESIS: &str = "**SYNTHÈSE DES SYMPTÔMES**";
pub const MARKER_DIAGNOSIS: &str = "**DIAGNOSTIC PRÉLIMINAIRE**";
pub const MARKER_RECOMMENDATIONS: &str = "**RECOMMANDATIONS**";
pub const MARKER_ADVICE: &str = "**CONSEILS PRATIQUES**";

/// Sections extracted from a narrative. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSections {
    pub synthesis: Option<String>,
    pub diagnosis: Option<String>,
    pub recommendations: Option<String>,
    pub advice: Option<String>,
}

/// The text between `marker` and the next `**` header (or end of input),
/// trimmed. `None` when the marker is absent or its section is blank.
pub fn section_after<'a>(narrative: &'a str, marker: &str) -> Option<&'a str> {
    let start = narrative.find(marker)? + marker.len();
    let rest = &narrative[start..];
    let end = rest.find("**").unwrap_or(rest.len());
    let section = rest[..end].trim();
    (!section.is_empty()).then_some(section)
}

/// Extract all four sections from a narrative.
pub fn extract_sections(narrative: &str) -> ReportSections {
    ReportSections {
        synthesis: section_after(narrative, MARKER_SYNTHESIS).map(String::from),
        diagnosis: section_after(narrative, MARKER_DIAGNOSIS).map(String::from),
        recommendations: section_after(narrative, MARKER_RECOMMENDATIONS).map(String::from),
        advice: section_after(narrative, MARKER_ADVICE).map(String::from),
    }
}
