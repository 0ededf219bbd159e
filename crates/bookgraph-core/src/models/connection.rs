use serde::{Deserialize, Serialize};

use crate::models::item::CatalogItem;

// ─── RelationshipType ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    SimilarThemes,
    SimilarPlots,
    SimilarConcepts,
    CommonSubjects,
    Mixed,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SimilarThemes => "similar-themes",
            Self::SimilarPlots => "similar-plots",
            Self::SimilarConcepts => "similar-concepts",
            Self::CommonSubjects => "common-subjects",
            Self::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Connection ─────────────────────────────────────────────

/// A scored, typed edge between two catalog items.
///
/// Undirected in meaning; `source` is the item that came first in the
/// comparison order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
    /// In `(0.1, 1.0]` for every emitted edge.
    pub strength: f64,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
}

impl Connection {
    /// True if this edge joins `a` and `b` in either orientation.
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

// ─── MergeGroup ─────────────────────────────────────────────

/// Provenance of one merge performed during batch deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeGroup {
    pub original_items: [CatalogItem; 2],
    pub merged_item: CatalogItem,
    pub reason: String,
}
