//! Pairwise connection scoring.
//!
//! Four overlap signals are evaluated in a fixed order. Each contributes
//! `min(count * per_match, cap)` to the strength; a signal only tags its
//! relationship type and adds a reason once its overlap reaches
//! `min_tagged`.

use std::collections::HashSet;

use bookgraph_core::{CatalogItem, Connection, RelationshipType};

use crate::connections::analysis::ItemAnalysis;

/// Edges at or below this strength are dropped.
pub const MIN_EMITTED_STRENGTH: f64 = 0.1;
pub const MAX_STRENGTH: f64 = 1.0;

const REASON_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, Copy)]
struct Signal {
    kind: RelationshipType,
    label: &'static str,
    per_match: f64,
    cap: f64,
    min_tagged: usize,
    shown: usize,
    /// Append "(and N more)" when the listing is cut.
    count_rest: bool,
}

impl Signal {
    fn contribution(&self, count: usize) -> f64 {
        (count as f64 * self.per_match).min(self.cap)
    }

    fn reason(&self, common: &[String]) -> String {
        let listed = common
            .iter()
            .take(self.shown)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let rest = common.len().saturating_sub(self.shown);
        if self.count_rest && rest > 0 {
            format!("{}: {listed} (and {rest} more)", self.label)
        } else {
            format!("{}: {listed}", self.label)
        }
    }
}

/// Declared evaluation order; also the order reasons appear in.
const SIGNALS: [Signal; 4] = [
    Signal {
        kind: RelationshipType::CommonSubjects,
        label: "Common subjects",
        per_match: 0.2,
        cap: 0.5,
        min_tagged: 1,
        shown: 4,
        count_rest: true,
    },
    Signal {
        kind: RelationshipType::SimilarConcepts,
        label: "Similar concepts",
        per_match: 0.12,
        cap: 0.5,
        min_tagged: 2,
        shown: 3,
        count_rest: false,
    },
    Signal {
        kind: RelationshipType::SimilarThemes,
        label: "Common themes",
        per_match: 0.25,
        cap: 0.6,
        min_tagged: 1,
        shown: 2,
        count_rest: false,
    },
    Signal {
        kind: RelationshipType::SimilarPlots,
        label: "Similar plot elements",
        per_match: 0.2,
        cap: 0.5,
        min_tagged: 1,
        shown: 2,
        count_rest: false,
    },
];

/// Score one pair. `None` when the pair does not clear the emission gate.
///
/// `a` becomes the edge source. Swapping the arguments yields the same
/// strength and type; only the order of listed words in the reason may
/// differ.
pub fn score_pair(
    a: &CatalogItem,
    b: &CatalogItem,
    analysis_a: &ItemAnalysis,
    analysis_b: &ItemAnalysis,
    language_multiplier: f64,
) -> Option<Connection> {
    let overlaps = collect_overlaps(a, b, analysis_a, analysis_b);

    let mut strength = 0.0;
    let mut reasons = Vec::new();
    let mut tagged: Vec<(RelationshipType, f64)> = Vec::new();

    for (signal, common) in SIGNALS.iter().zip(&overlaps) {
        if common.is_empty() {
            continue;
        }
        let contribution = signal.contribution(common.len());
        strength += contribution;
        if common.len() >= signal.min_tagged {
            reasons.push(signal.reason(common));
            tagged.push((signal.kind, contribution));
        }
    }

    let strength = strength * language_multiplier;
    if strength <= MIN_EMITTED_STRENGTH || reasons.is_empty() {
        return None;
    }

    let (lang_a, lang_b) = (analysis_a.language, analysis_b.language);
    if lang_a != lang_b && lang_a.is_known() && lang_b.is_known() {
        reasons.push(format!(
            "Cross-language connection ({} ↔ {})",
            lang_a.name(),
            lang_b.name()
        ));
    }

    Some(Connection {
        source: a.id.clone(),
        target: b.id.clone(),
        strength: strength.min(MAX_STRENGTH),
        reason: reasons.join(REASON_SEPARATOR),
        kind: resolve_kind(&tagged),
    })
}

/// Common values per signal, in [`SIGNALS`] order, listed in `a`'s order.
fn collect_overlaps(
    a: &CatalogItem,
    b: &CatalogItem,
    analysis_a: &ItemAnalysis,
    analysis_b: &ItemAnalysis,
) -> [Vec<String>; 4] {
    let subjects = common_subjects(&a.subjects, &b.subjects);

    if !(a.has_description() && b.has_description()) {
        return [subjects, Vec::new(), Vec::new(), Vec::new()];
    }

    let keywords = analysis_a
        .keywords
        .iter()
        .filter(|k| analysis_b.keywords.contains(k))
        .cloned()
        .collect();
    let themes = analysis_a
        .themes
        .intersection(&analysis_b.themes)
        .cloned()
        .collect();
    let plots = analysis_a
        .plots
        .intersection(&analysis_b.plots)
        .cloned()
        .collect();

    [subjects, keywords, themes, plots]
}

/// Case-insensitive intersection of specific subjects, first casing from `a`.
fn common_subjects(a: &[String], b: &[String]) -> Vec<String> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let other: HashSet<String> = b
        .iter()
        .filter(|s| !is_generic_subject(s))
        .map(|s| s.trim().to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    a.iter()
        .filter(|s| !is_generic_subject(s))
        .filter(|s| {
            let lower = s.trim().to_lowercase();
            other.contains(&lower) && seen.insert(lower)
        })
        .map(|s| s.trim().to_string())
        .collect()
}

/// Short or purely numeric subjects carry no signal.
fn is_generic_subject(subject: &str) -> bool {
    let trimmed = subject.trim();
    trimmed.chars().count() < 3 || trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Single highest contribution wins; a tie at the top is `Mixed`.
fn resolve_kind(tagged: &[(RelationshipType, f64)]) -> RelationshipType {
    let Some(top) = tagged.iter().map(|(_, c)| *c).reduce(f64::max) else {
        return RelationshipType::SimilarConcepts;
    };
    let mut leaders = tagged
        .iter()
        .filter(|(_, c)| (top - c).abs() < f64::EPSILON)
        .map(|(kind, _)| *kind);
    match (leaders.next(), leaders.next()) {
        (Some(kind), None) => kind,
        (Some(_), Some(_)) => RelationshipType::Mixed,
        (None, _) => RelationshipType::SimilarConcepts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::analysis::ItemAnalyzer;
    use crate::text::language::Language;

    fn dune() -> CatalogItem {
        CatalogItem::new("a", "Dune", "Frank Herbert").with_description(
            "A desert planet, a hero's journey, betrayal, and a quest for power.",
        )
    }

    fn foundation() -> CatalogItem {
        CatalogItem::new("b", "Foundation", "Isaac Asimov").with_description(
            "An empire in decline, a quest to preserve knowledge, political intrigue and betrayal.",
        )
    }

    fn bare_analysis(id: &str, language: Language) -> ItemAnalysis {
        ItemAnalysis {
            id: id.to_string(),
            language,
            keywords: Vec::new(),
            themes: Default::default(),
            plots: Default::default(),
        }
    }

    fn words(list: &[&str]) -> std::collections::BTreeSet<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn dune_and_foundation_share_plot_elements() {
        let analyzer = ItemAnalyzer::default();
        let (a, b) = (dune(), foundation());
        let edge = score_pair(&a, &b, &analyzer.analyze(&a), &analyzer.analyze(&b), 1.0).unwrap();

        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert_eq!(edge.kind, RelationshipType::SimilarPlots);
        // themes {betrayal} 0.25 + plots {betrayal, quest} 0.4 + keywords 2 × 0.12
        assert!((edge.strength - 0.89).abs() < 1e-9);
        assert!(edge.reason.contains("Similar plot elements: betrayal, quest"));
        assert!(edge.reason.contains("Common themes: betrayal"));
    }

    #[test]
    fn scoring_is_symmetric() {
        let analyzer = ItemAnalyzer::default();
        let (a, b) = (dune(), foundation());
        let (aa, ab) = (analyzer.analyze(&a), analyzer.analyze(&b));

        let forward = score_pair(&a, &b, &aa, &ab, 1.0).unwrap();
        let backward = score_pair(&b, &a, &ab, &aa, 1.0).unwrap();
        assert_eq!(backward.source, "b");
        assert_eq!(forward.kind, backward.kind);
        assert!((forward.strength - backward.strength).abs() < 1e-12);
    }

    #[test]
    fn subjects_match_case_insensitively() {
        let a = CatalogItem::new("a", "Dune", "Frank Herbert").with_subjects(["Science Fiction"]);
        let b = CatalogItem::new("b", "Hyperion", "Dan Simmons").with_subjects(["science fiction"]);
        let edge = score_pair(
            &a,
            &b,
            &bare_analysis("a", Language::Unknown),
            &bare_analysis("b", Language::Unknown),
            1.0,
        )
        .unwrap();

        assert_eq!(edge.kind, RelationshipType::CommonSubjects);
        assert!((edge.strength - 0.2).abs() < 1e-9);
        assert_eq!(edge.reason, "Common subjects: Science Fiction");
    }

    #[test]
    fn generic_subjects_are_ignored() {
        let a = CatalogItem::new("a", "A", "X").with_subjects(["SF", "1984", "Fiction"]);
        let b = CatalogItem::new("b", "B", "Y").with_subjects(["sf", "1984", "fiction"]);
        let edge = score_pair(
            &a,
            &b,
            &bare_analysis("a", Language::Unknown),
            &bare_analysis("b", Language::Unknown),
            1.0,
        )
        .unwrap();
        assert_eq!(edge.reason, "Common subjects: Fiction");

        let c = CatalogItem::new("c", "C", "Z").with_subjects(["SF", "1984"]);
        let d = CatalogItem::new("d", "D", "W").with_subjects(["SF", "1984"]);
        assert!(
            score_pair(
                &c,
                &d,
                &bare_analysis("c", Language::Unknown),
                &bare_analysis("d", Language::Unknown),
                1.0
            )
            .is_none()
        );
    }

    #[test]
    fn long_subject_lists_are_truncated_and_capped() {
        let subjects = ["History", "War", "Europe", "Politics", "Biography", "Memoir"];
        let a = CatalogItem::new("a", "A", "X").with_subjects(subjects);
        let b = CatalogItem::new("b", "B", "Y").with_subjects(subjects);
        let edge = score_pair(
            &a,
            &b,
            &bare_analysis("a", Language::En),
            &bare_analysis("b", Language::En),
            1.0,
        )
        .unwrap();

        assert_eq!(
            edge.reason,
            "Common subjects: History, War, Europe, Politics (and 2 more)"
        );
        assert!((edge.strength - 0.5).abs() < 1e-9);
    }

    #[test]
    fn no_overlap_emits_nothing() {
        let analyzer = ItemAnalyzer::default();
        let a = dune();
        let b = CatalogItem::new("c", "Cookbook", "Chef").with_description(
            "Recipes for bread and pastry with a chapter on the sourdough starter and its care.",
        );
        assert!(score_pair(&a, &b, &analyzer.analyze(&a), &analyzer.analyze(&b), 1.0).is_none());
    }

    #[test]
    fn description_signals_need_both_descriptions() {
        let a = dune();
        let b = CatalogItem::new("b", "Foundation", "Isaac Asimov");
        let mut analysis_b = bare_analysis("b", Language::En);
        analysis_b.plots = words(&["quest", "betrayal"]);
        let analysis_a = ItemAnalyzer::default().analyze(&a);

        assert!(score_pair(&a, &b, &analysis_a, &analysis_b, 1.0).is_none());
    }

    #[test]
    fn cross_language_pairs_are_annotated_and_discounted() {
        let a = CatalogItem::new("a", "A", "X").with_subjects(["Philosophy"]);
        let b = CatalogItem::new("b", "B", "Y").with_subjects(["philosophy"]);
        let edge = score_pair(
            &a,
            &b,
            &bare_analysis("a", Language::En),
            &bare_analysis("b", Language::Fr),
            0.8,
        )
        .unwrap();

        assert!((edge.strength - 0.16).abs() < 1e-9);
        assert!(edge.reason.ends_with("Cross-language connection (English ↔ French)"));
    }

    #[test]
    fn tied_top_contributions_are_mixed() {
        let a = CatalogItem::new("a", "A", "X")
            .with_description("placeholder")
            .with_subjects(["Mythology", "Heroes"]);
        let b = CatalogItem::new("b", "B", "Y")
            .with_description("placeholder")
            .with_subjects(["mythology", "heroes"]);
        let mut analysis_a = bare_analysis("a", Language::En);
        let mut analysis_b = bare_analysis("b", Language::En);
        analysis_a.plots = words(&["quest", "journey"]);
        analysis_b.plots = words(&["quest", "journey"]);

        let edge = score_pair(&a, &b, &analysis_a, &analysis_b, 1.0).unwrap();
        assert_eq!(edge.kind, RelationshipType::Mixed);
        assert!((edge.strength - 0.8).abs() < 1e-9);
    }

    #[test]
    fn single_keyword_adds_strength_without_reason() {
        let a = CatalogItem::new("a", "A", "X").with_description("placeholder");
        let b = CatalogItem::new("b", "B", "Y").with_description("placeholder");
        let mut analysis_a = bare_analysis("a", Language::En);
        let mut analysis_b = bare_analysis("b", Language::En);
        analysis_a.keywords = vec!["spice".into()];
        analysis_b.keywords = vec!["spice".into()];

        assert!(score_pair(&a, &b, &analysis_a, &analysis_b, 1.0).is_none());

        analysis_a.themes = words(&["power"]);
        analysis_b.themes = words(&["power"]);
        let edge = score_pair(&a, &b, &analysis_a, &analysis_b, 1.0).unwrap();
        assert_eq!(edge.kind, RelationshipType::SimilarThemes);
        assert!((edge.strength - 0.37).abs() < 1e-9);
        assert!(!edge.reason.contains("Similar concepts"));
    }

    #[test]
    fn strength_is_clamped() {
        let a = CatalogItem::new("a", "A", "X")
            .with_description("placeholder")
            .with_subjects(["History", "Politics", "Europe"]);
        let b = a.clone();
        let mut analysis = bare_analysis("a", Language::En);
        analysis.keywords = vec!["empire".into(), "senate".into(), "legion".into(), "consul".into(), "rome".into()];
        analysis.themes = words(&["power", "war", "empire"]);
        analysis.plots = words(&["conflict", "battle", "betrayal"]);

        let edge = score_pair(&a, &b, &analysis, &analysis, 1.0).unwrap();
        assert_eq!(edge.strength, MAX_STRENGTH);
        assert_eq!(edge.kind, RelationshipType::SimilarThemes);
    }
}
