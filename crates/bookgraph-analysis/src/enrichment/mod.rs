//! Provider-backed metadata completion and combined search.

pub mod pipeline;
pub mod provider;
pub mod search;

pub use pipeline::{EnrichmentPipeline, EnrichmentReport, needs_enrichment};
pub use provider::{BookProvider, LocalCatalogProvider, SearchField};
