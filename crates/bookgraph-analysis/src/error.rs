use bookgraph_core::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid ISBN: {0}")]
    InvalidIsbn(String),

    #[error("provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
