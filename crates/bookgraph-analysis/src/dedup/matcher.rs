use std::collections::HashSet;

use bookgraph_core::{DedupConfig, UNKNOWN_AUTHOR};

use crate::dedup::normalize::{Normalizer, normalize_author};
use crate::text::language::guess_from_words;

/// Title/author similarity predicates used by the deduplicator.
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    normalizer: Normalizer,
    title_overlap_threshold: f64,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::from_config(&DedupConfig::default())
    }
}

impl SimilarityMatcher {
    pub fn from_config(config: &DedupConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.normalization_cache_size),
            title_overlap_threshold: config.title_overlap_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn with_title_threshold(mut self, threshold: f64) -> Self {
        self.title_overlap_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Authors match when either is unknown or blank, when one normalized
    /// name contains the other, or when last names agree and the first
    /// names are equal or one is the other's initial.
    pub fn are_authors_similar(&self, a: &str, b: &str) -> bool {
        let a = self.normalizer.normalize_author(a);
        let b = self.normalizer.normalize_author(b);
        let unknown = normalize_author(UNKNOWN_AUTHOR);

        if a.is_empty() || b.is_empty() || a == unknown || b == unknown {
            return true;
        }
        if a == b || a.contains(&b) || b.contains(&a) {
            return true;
        }

        let words_a: Vec<&str> = a.split(' ').collect();
        let words_b: Vec<&str> = b.split(' ').collect();
        if words_a.len() < 2 || words_b.len() < 2 {
            return false;
        }
        if words_a.last() != words_b.last() {
            return false;
        }

        let first_a = words_a[0].trim_end_matches('.');
        let first_b = words_b[0].trim_end_matches('.');
        first_a == first_b
            || (first_a.chars().count() == 1 && first_b.starts_with(first_a))
            || (first_b.chars().count() == 1 && first_a.starts_with(first_b))
    }

    /// Compare two (usually already normalized) titles.
    ///
    /// Short titles need to be equal; three- and four-word titles may
    /// differ by one word; longer titles need a significant-word overlap
    /// above the configured threshold. A title that is a word-prefix of the
    /// other always matches.
    pub fn are_titles_similar(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }

        let a = clean_title(a);
        let b = clean_title(b);
        if a.is_empty() || b.is_empty() {
            return false;
        }
        if a == b {
            return true;
        }

        let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
        if longer.starts_with(shorter.as_str())
            && longer[shorter.len()..].starts_with(' ')
        {
            return true;
        }

        let words: Vec<&str> = a.split(' ').chain(b.split(' ')).collect();
        let language = guess_from_words(&words);
        let significant = |title: &str| -> Vec<String> {
            let mut seen = HashSet::new();
            title
                .split(' ')
                .filter(|w| !language.is_stopword(w))
                .filter(|w| seen.insert(*w))
                .map(ToOwned::to_owned)
                .collect()
        };
        let sig_a = significant(&a);
        let sig_b = significant(&b);

        if sig_a.len() <= 2 || sig_b.len() <= 2 {
            return false;
        }

        let common = sig_a.iter().filter(|w| sig_b.contains(w)).count();
        if sig_a.len() <= 4 && sig_b.len() <= 4 {
            return common >= sig_a.len().min(sig_b.len()) - 1;
        }

        let ratio = common as f64 / sig_a.len().max(sig_b.len()) as f64;
        ratio > self.title_overlap_threshold
    }
}

/// Lowercase, turn brackets and punctuation into spaces, collapse.
fn clean_title(title: &str) -> String {
    let spaced: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> SimilarityMatcher {
        SimilarityMatcher::default()
    }

    #[test]
    fn unknown_or_blank_authors_match_anything() {
        let m = matcher();
        assert!(m.are_authors_similar("Unknown Author", "Frank Herbert"));
        assert!(m.are_authors_similar("", "Frank Herbert"));
    }

    #[test]
    fn author_variants_match() {
        let m = matcher();
        assert!(m.are_authors_similar("Frank Herbert", "frank  herbert"));
        assert!(m.are_authors_similar("Herbert", "Frank Herbert"));
        assert!(m.are_authors_similar("F. Herbert", "Frank Herbert"));
        assert!(m.are_authors_similar("Martin Luther King, Jr.", "Martin Luther King"));
        assert!(m.are_authors_similar("Gabriel García Márquez", "Gabriel Garcia Marquez"));
    }

    #[test]
    fn different_authors_do_not_match() {
        let m = matcher();
        assert!(!m.are_authors_similar("Frank Herbert", "Brian Herbert"));
        assert!(!m.are_authors_similar("Isaac Asimov", "Frank Herbert"));
    }

    #[test]
    fn exact_and_cleaned_titles_match() {
        let m = matcher();
        assert!(m.are_titles_similar("dune", "dune"));
        assert!(m.are_titles_similar("Dune!", "dune"));
        assert!(m.are_titles_similar("[Dune]", "dune"));
    }

    #[test]
    fn truncated_title_matches_on_word_prefix() {
        let m = matcher();
        assert!(m.are_titles_similar("the lord of the rings", "the lord of the rings the fellowship"));
        assert!(!m.are_titles_similar("dune", "dunes of arrakis"));
    }

    #[test]
    fn short_titles_need_equality() {
        let m = matcher();
        assert!(!m.are_titles_similar("dune messiah", "children of dune"));
        assert!(!m.are_titles_similar("red rising", "red storm"));
    }

    #[test]
    fn mid_length_titles_allow_one_word_difference() {
        let m = matcher();
        assert!(m.are_titles_similar("hitchhikers guide galaxy", "hitchhiker guide galaxy"));
        assert!(!m.are_titles_similar("hitchhikers guide galaxy", "travelers map universe"));
    }

    #[test]
    fn long_titles_use_overlap_ratio() {
        let m = matcher();
        assert!(m.are_titles_similar(
            "history decline fall roman empire volume one",
            "history decline fall roman empire volume 1"
        ));
        assert!(!m.are_titles_similar(
            "brief history time big bang black holes",
            "brief history nearly everything science world"
        ));
    }

    #[test]
    fn threshold_is_configurable() {
        let strict = matcher().with_title_threshold(0.9);
        assert!(!strict.are_titles_similar(
            "history decline fall roman empire volume one",
            "history decline fall roman empire volume 1"
        ));
    }
}
