use std::collections::BTreeSet;

use serde::Serialize;

use bookgraph_core::{AnalysisConfig, CatalogItem};

use crate::text::keywords::KeywordRanker;
use crate::text::language::{Language, detect_language};
use crate::text::tagger::{extract_plot_elements, extract_themes};

/// Per-item signature used while scoring one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAnalysis {
    pub id: String,
    pub language: Language,
    pub keywords: Vec<String>,
    pub themes: BTreeSet<String>,
    pub plots: BTreeSet<String>,
}

/// Computes [`ItemAnalysis`] from an item's description.
#[derive(Debug, Clone, Default)]
pub struct ItemAnalyzer {
    ranker: KeywordRanker,
}

impl ItemAnalyzer {
    pub fn new(ranker: KeywordRanker) -> Self {
        Self { ranker }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(KeywordRanker::from_config(config))
    }

    pub fn analyze(&self, item: &CatalogItem) -> ItemAnalysis {
        let text = item.description_text();
        let language = detect_language(text);

        ItemAnalysis {
            id: item.id.clone(),
            language,
            keywords: self.ranker.extract(text, Some(language)),
            themes: extract_themes(text, language),
            plots: extract_plot_elements(text, language),
        }
    }
}
