//! Duplicate detection and merging of catalog records.

pub mod batch;
pub mod matcher;
pub mod merge;
pub mod normalize;

pub use batch::{Deduplicator, DuplicateMatch, ImportOutcome, ListDedupOutcome, MatchReason};
pub use matcher::SimilarityMatcher;
pub use merge::merge_items;
pub use normalize::{Normalizer, normalize_author, normalize_title};
