use serde::{Deserialize, Serialize};

/// Patient directory entry — read-only, used for display-name resolution
/// when a case is created from a bare patient identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    #[serde(rename = "noms")]
    pub name: String,
}
