//! Supplementary reference snippets — keyword filter + relevance ranking.
//!
//! Before synthesis, candidate reference documents are filtered by naive
//! keyword containment against the principal + associated symptoms and
//! ranked by occurrence count, descending. Ties keep the original fetch
//! order (the sort is stable).

use serde::{Deserialize, Serialize};

/// A candidate reference document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDoc {
    pub source: String,
    pub content: String,
}

/// A reference retained for the prompt, with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSource {
    pub source: String,
    pub content: String,
    /// Total occurrence count of symptom keywords in the content.
    pub relevance: usize,
}

fn relevance_score(content_lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .map(|keyword| content_lower.matches(keyword).count())
        .sum()
}

/// Filter `docs` to those containing at least one symptom keyword and rank
/// them by occurrence count, descending.
pub fn rank_references(docs: &[ReferenceDoc], symptom_text: &str) -> Vec<RankedSource> {
    let lowered = symptom_text.to_lowercase();
    let keywords: Vec<&str> = lowered.split_whitespace().collect();
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<RankedSource> = docs
        .iter()
        .filter_map(|doc| {
            let content_lower = doc.content.to_lowercase();
            let relevance = relevance_score(&content_lower, &keywords);
            (relevance > 0).then(|| RankedSource {
                source: doc.source.clone(),
                content: doc.content.clone(),
                relevance,
            })
        })
        .collect();

    // Stable sort: equal scores keep fetch order.
    ranked.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    ranked
}
