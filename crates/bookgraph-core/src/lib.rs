//! Bookgraph core: catalog models, configuration, import/export.

pub mod config;
pub mod error;
pub mod io;
pub mod models;

pub use config::{AnalysisConfig, BookgraphConfig, DedupConfig, EnrichmentConfig};
pub use error::{CatalogError, Result};
pub use models::*;
