use std::collections::BTreeMap;

use tracing::debug;

use bookgraph_core::{AnalysisConfig, CatalogItem, Connection};

use crate::connections::analysis::{ItemAnalysis, ItemAnalyzer};
use crate::connections::scorer::score_pair;
use crate::text::language::Language;

/// Pool every other language is compared against.
pub const ANCHOR_LANGUAGE: Language = Language::En;

/// One pending comparison: item indexes (`left < right`) and the language
/// multiplier to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairTask {
    pub left: usize,
    pub right: usize,
    pub multiplier: f64,
}

impl PairTask {
    fn new(a: usize, b: usize, multiplier: f64) -> Self {
        Self {
            left: a.min(b),
            right: a.max(b),
            multiplier,
        }
    }
}

/// Builds the connection graph of a collection.
///
/// Items are pooled by detected language. English pairs score at full
/// strength, English against another language at the cross-language
/// multiplier, and pairs inside one non-English pool at the
/// same-foreign-language multiplier. Two different non-English pools are
/// never compared, and items of unknown language produce no edges.
#[derive(Debug, Clone)]
pub struct ConnectionGraphBuilder {
    analyzer: ItemAnalyzer,
    cross_language_multiplier: f64,
    same_foreign_language_multiplier: f64,
}

impl Default for ConnectionGraphBuilder {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl ConnectionGraphBuilder {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            analyzer: ItemAnalyzer::from_config(config),
            cross_language_multiplier: config.cross_language_multiplier,
            same_foreign_language_multiplier: config.same_foreign_language_multiplier,
        }
    }

    pub fn analyzer(&self) -> &ItemAnalyzer {
        &self.analyzer
    }

    pub fn analyze_all(&self, items: &[CatalogItem]) -> Vec<ItemAnalysis> {
        items.iter().map(|item| self.analyzer.analyze(item)).collect()
    }

    /// Every comparison the builder would run, in a deterministic order.
    ///
    /// Callers that need to yield between batches can score these tasks
    /// themselves with [`Self::score_task`].
    pub fn plan_pairs(&self, analyses: &[ItemAnalysis]) -> Vec<PairTask> {
        let mut anchor = Vec::new();
        let mut others: BTreeMap<Language, Vec<usize>> = BTreeMap::new();
        for (idx, analysis) in analyses.iter().enumerate() {
            match analysis.language {
                Language::Unknown => {}
                lang if lang == ANCHOR_LANGUAGE => anchor.push(idx),
                lang => others.entry(lang).or_default().push(idx),
            }
        }

        let mut tasks = Vec::new();
        push_pairs_within(&mut tasks, &anchor, 1.0);
        for pool in others.values() {
            for &a in &anchor {
                for &b in pool {
                    tasks.push(PairTask::new(a, b, self.cross_language_multiplier));
                }
            }
            push_pairs_within(&mut tasks, pool, self.same_foreign_language_multiplier);
        }
        tasks
    }

    pub fn score_task(
        &self,
        items: &[CatalogItem],
        analyses: &[ItemAnalysis],
        task: PairTask,
    ) -> Option<Connection> {
        score_pair(
            &items[task.left],
            &items[task.right],
            &analyses[task.left],
            &analyses[task.right],
            task.multiplier,
        )
    }

    pub fn build_connections(&self, items: &[CatalogItem]) -> Vec<Connection> {
        let analyses = self.analyze_all(items);
        let tasks = self.plan_pairs(&analyses);

        let connections: Vec<Connection> = tasks
            .iter()
            .filter_map(|task| self.score_task(items, &analyses, *task))
            .collect();

        debug!(
            items = items.len(),
            pairs = tasks.len(),
            edges = connections.len(),
            "built connection graph"
        );
        connections
    }
}

fn push_pairs_within(tasks: &mut Vec<PairTask>, pool: &[usize], multiplier: f64) {
    for (i, &a) in pool.iter().enumerate() {
        for &b in &pool[i + 1..] {
            tasks.push(PairTask::new(a, b, multiplier));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookgraph_core::RelationshipType;

    const EN_TEXT: &str = "A desert planet, a hero's journey, betrayal, and a quest for power.";
    const EN_TEXT_2: &str =
        "An empire in decline, a quest to preserve knowledge, political intrigue and betrayal.";
    const FR_TEXT: &str =
        "Le petit prince quitte sa planète et voyage dans les étoiles pour trouver un ami.";
    const FR_TEXT_2: &str =
        "Une histoire de guerre et de paix, de famille et de trahison dans la Russie impériale.";
    const ES_TEXT: &str =
        "La historia de una familia en el pueblo de Macondo durante cien años de soledad.";

    fn item(id: &str, description: &str, subjects: &[&str]) -> CatalogItem {
        CatalogItem::new(id, format!("Title {id}"), "Author")
            .with_description(description)
            .with_subjects(subjects.iter().copied())
    }

    #[test]
    fn connects_english_pair_at_full_strength() {
        let items = vec![item("a", EN_TEXT, &[]), item("b", EN_TEXT_2, &[])];
        let edges = ConnectionGraphBuilder::default().build_connections(&items);

        assert_eq!(edges.len(), 1);
        assert!(edges[0].links("a", "b"));
        assert_eq!(edges[0].kind, RelationshipType::SimilarPlots);
        assert!(edges[0].strength > 0.1 && edges[0].strength <= 1.0);
    }

    #[test]
    fn plans_three_tiers_and_skips_unknown() {
        let items = vec![
            item("en1", EN_TEXT, &[]),
            item("fr1", FR_TEXT, &[]),
            item("unk", "too short", &[]),
            item("en2", EN_TEXT_2, &[]),
            item("fr2", FR_TEXT_2, &[]),
            item("es1", ES_TEXT, &[]),
        ];
        let builder = ConnectionGraphBuilder::default();
        let tasks = builder.plan_pairs(&builder.analyze_all(&items));

        let find = |l: usize, r: usize| tasks.iter().find(|t| t.left == l && t.right == r);
        assert_eq!(find(0, 3).map(|t| t.multiplier), Some(1.0));
        assert_eq!(find(0, 1).map(|t| t.multiplier), Some(0.8));
        assert_eq!(find(1, 3).map(|t| t.multiplier), Some(0.8));
        assert_eq!(find(1, 4).map(|t| t.multiplier), Some(0.9));
        assert_eq!(find(0, 5).map(|t| t.multiplier), Some(0.8));
        assert!(find(1, 5).is_none(), "French and Spanish pools are not compared");
        assert!(tasks.iter().all(|t| t.left != 2 && t.right != 2));
        // 1 en-en, 2x2 en-fr, 1 fr-fr, 2 en-es
        assert_eq!(tasks.len(), 8);
    }

    #[test]
    fn cross_language_subject_link_is_discounted() {
        let items = vec![
            item("en", EN_TEXT, &["Philosophy"]),
            item("fr", FR_TEXT, &["philosophy"]),
        ];
        let edges = ConnectionGraphBuilder::default().build_connections(&items);

        assert_eq!(edges.len(), 1);
        assert!((edges[0].strength - 0.16).abs() < 1e-9);
        assert!(edges[0].reason.contains("English ↔ French"));
    }

    #[test]
    fn same_foreign_pool_uses_its_multiplier() {
        let items = vec![
            item("fr1", FR_TEXT, &["Classiques"]),
            item("fr2", FR_TEXT_2, &["classiques"]),
        ];
        let edges = ConnectionGraphBuilder::default().build_connections(&items);

        assert_eq!(edges.len(), 1);
        assert!((edges[0].strength - 0.18).abs() < 1e-9);
        assert!(!edges[0].reason.contains("Cross-language"));
    }

    #[test]
    fn unknown_language_items_have_no_edges() {
        let items = vec![
            item("a", EN_TEXT, &["Science Fiction"]),
            CatalogItem::new("b", "No blurb", "Someone").with_subjects(["Science Fiction"]),
        ];
        assert!(ConnectionGraphBuilder::default().build_connections(&items).is_empty());
    }

    #[test]
    fn build_is_deterministic() {
        let items = vec![
            item("a", EN_TEXT, &["Classics"]),
            item("b", EN_TEXT_2, &["Classics"]),
            item("c", FR_TEXT, &["Classics"]),
        ];
        let builder = ConnectionGraphBuilder::default();
        let first = builder.build_connections(&items);
        for _ in 0..5 {
            assert_eq!(builder.build_connections(&items), first);
        }
        for edge in &first {
            assert!(edge.strength > 0.1 && edge.strength <= 1.0);
        }
    }
}
