//! Bookgraph analysis: connection inference, language profiling, keyword
//! ranking, deduplication and enrichment orchestration.

pub mod connections;
pub mod dedup;
pub mod enrichment;
pub mod error;
pub mod identifiers;
pub mod text;

pub use connections::{ConnectionGraphBuilder, ItemAnalysis, ItemAnalyzer, PairTask, score_pair};
pub use dedup::{
    Deduplicator, DuplicateMatch, ImportOutcome, ListDedupOutcome, MatchReason, Normalizer,
    SimilarityMatcher, merge_items,
};
pub use enrichment::{
    BookProvider, EnrichmentPipeline, EnrichmentReport, LocalCatalogProvider, SearchField,
    needs_enrichment,
};
pub use error::{AnalysisError, Result};
pub use identifiers::isbn::Isbn;
pub use text::keywords::{KeywordRanker, extract_keywords};
pub use text::language::{Language, detect_language};
pub use text::tagger::{extract_plot_elements, extract_themes, plot_tags, theme_tags};
