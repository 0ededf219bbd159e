use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Root configuration, loaded from `~/.config/bookgraph/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookgraphConfig {
    pub analysis: AnalysisConfig,
    pub dedup: DedupConfig,
    pub enrichment: EnrichmentConfig,
}

/// Connection inference and keyword ranking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub keyword_top_n: usize,
    pub min_word_length: usize,
    /// Cooccurrence window: each token links to the next `window_size` tokens.
    pub window_size: usize,
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    /// English pool vs. another language pool.
    pub cross_language_multiplier: f64,
    /// Pairs inside the same non-English pool.
    pub same_foreign_language_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Word-overlap ratio a long title pair must exceed.
    pub title_overlap_threshold: f64,
    /// Cleaned ISBNs shorter than this never take part in ISBN matching.
    pub min_isbn_length: usize,
    /// Treat an ISBN-10 and its ISBN-13 form as the same identifier.
    pub convert_isbn10: bool,
    pub normalization_cache_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub delay_between_calls_ms: u64,
    pub max_search_results: usize,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keyword_top_n: 10,
            min_word_length: 4,
            window_size: 2,
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
            cross_language_multiplier: 0.8,
            same_foreign_language_multiplier: 0.9,
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            title_overlap_threshold: 0.75,
            min_isbn_length: 10,
            convert_isbn10: true,
            normalization_cache_size: 1000,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            delay_between_calls_ms: 100,
            max_search_results: 20,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl BookgraphConfig {
    /// Standard config file path: `~/.config/bookgraph/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("BOOKGRAPH_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("bookgraph")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Reject values the ranking and scoring code cannot work with.
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;
        if !(0.0..1.0).contains(&analysis.damping) {
            return Err(CatalogError::ConfigError(format!(
                "analysis.damping must be in [0, 1), got {}",
                analysis.damping
            )));
        }
        if analysis.window_size == 0 {
            return Err(CatalogError::ConfigError(
                "analysis.window_size must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("analysis.cross_language_multiplier", analysis.cross_language_multiplier),
            (
                "analysis.same_foreign_language_multiplier",
                analysis.same_foreign_language_multiplier,
            ),
            ("dedup.title_overlap_threshold", self.dedup.title_overlap_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CatalogError::ConfigError(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
