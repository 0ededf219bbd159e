use thiserror::Error;

/// All errors that can occur in bookgraph-core.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid import file: {0}")]
    InvalidShape(String),

    #[error("record {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
