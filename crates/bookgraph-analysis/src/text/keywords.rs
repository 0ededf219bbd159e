//! TextRank keyword extraction: tokens as nodes, cooccurrence within a
//! sliding window as edges, power-iteration centrality as score.

use std::collections::{BTreeSet, HashMap};

use bookgraph_core::AnalysisConfig;

use crate::text::language::{Language, detect_language};

/// Undirected cooccurrence graph. Nodes keep their first-insertion order;
/// edges are presence-only (repeated cooccurrence adds nothing).
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    neighbors: Vec<BTreeSet<usize>>,
}

impl CooccurrenceGraph {
    /// Link every token to the tokens in the next `window_size` positions.
    pub fn build<S: AsRef<str>>(tokens: &[S], window_size: usize) -> Self {
        let mut graph = Self::default();
        for (i, token) in tokens.iter().enumerate() {
            let node = graph.insert(token.as_ref());
            let window_end = (i + 1 + window_size).min(tokens.len());
            for other in &tokens[i + 1..window_end] {
                if other.as_ref() == token.as_ref() {
                    continue;
                }
                let neighbor = graph.insert(other.as_ref());
                graph.neighbors[node].insert(neighbor);
                graph.neighbors[neighbor].insert(node);
            }
        }
        graph
    }

    fn insert(&mut self, token: &str) -> usize {
        if let Some(&idx) = self.index.get(token) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(token.to_string());
        self.index.insert(token.to_string(), idx);
        self.neighbors.push(BTreeSet::new());
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn degree(&self, token: &str) -> usize {
        self.index
            .get(token)
            .map_or(0, |&idx| self.neighbors[idx].len())
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self.neighbors[a].contains(&b),
            _ => false,
        }
    }

    /// Power-iteration centrality, one score per node in insertion order.
    ///
    /// `score(n) = (1 - d) / |V| + d * Σ score(m) / degree(m)` over the
    /// neighbors `m` of `n`. Stops after `max_iterations` rounds or once the
    /// summed absolute change drops below `tolerance`.
    pub fn rank(&self, damping: f64, max_iterations: usize, tolerance: f64) -> Vec<f64> {
        let n = self.nodes.len();
        if n == 0 {
            return Vec::new();
        }

        let base = (1.0 - damping) / n as f64;
        let mut scores = vec![1.0 / n as f64; n];
        let mut next = vec![0.0f64; n];

        for _ in 0..max_iterations {
            let mut delta = 0.0f64;
            for node in 0..n {
                let sum: f64 = self.neighbors[node]
                    .iter()
                    .map(|&m| scores[m] / self.neighbors[m].len() as f64)
                    .sum();
                next[node] = base + damping * sum;
                delta += (next[node] - scores[node]).abs();
            }
            std::mem::swap(&mut scores, &mut next);
            if delta < tolerance {
                break;
            }
        }

        scores
    }
}

/// Keyword extractor configured from [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct KeywordRanker {
    pub top_n: usize,
    pub min_word_length: usize,
    pub window_size: usize,
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for KeywordRanker {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl KeywordRanker {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            top_n: config.keyword_top_n,
            min_word_length: config.min_word_length,
            window_size: config.window_size,
            damping: config.damping,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Lowercase, drop every character that is not a letter, digit or
    /// whitespace, split on whitespace, then drop short words and stopwords.
    pub fn tokenize(&self, text: &str, language: Language) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        cleaned
            .split_whitespace()
            .filter(|w| w.chars().count() >= self.min_word_length && !language.is_stopword(w))
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Top keywords of `text`, best first. Language is detected when not given.
    pub fn extract(&self, text: &str, language: Option<Language>) -> Vec<String> {
        let language = language.unwrap_or_else(|| detect_language(text));
        let tokens = self.tokenize(text, language);
        if tokens.is_empty() {
            return Vec::new();
        }

        let graph = CooccurrenceGraph::build(&tokens, self.window_size);
        let scores = graph.rank(self.damping, self.max_iterations, self.tolerance);

        let mut ranked: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        // stable: equal scores keep insertion order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .take(self.top_n)
            .map(|(idx, _)| graph.nodes[idx].clone())
            .collect()
    }
}

/// Convenience wrapper with default window, damping and convergence settings.
pub fn extract_keywords(
    text: &str,
    top_n: usize,
    min_word_length: usize,
    language: Option<Language>,
) -> Vec<String> {
    KeywordRanker {
        top_n,
        min_word_length,
        ..KeywordRanker::default()
    }
    .extract(text, language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_links_window_neighbors_symmetrically() {
        let graph = CooccurrenceGraph::build(&["alpha", "beta", "gamma", "delta"], 2);
        assert_eq!(graph.nodes(), &["alpha", "beta", "gamma", "delta"]);
        assert!(graph.has_edge("alpha", "beta"));
        assert!(graph.has_edge("gamma", "alpha"));
        assert!(!graph.has_edge("alpha", "delta"));
        assert_eq!(graph.degree("beta"), 3);
    }

    #[test]
    fn repeated_cooccurrence_and_self_loops_are_ignored() {
        let graph = CooccurrenceGraph::build(&["war", "war", "peace", "war", "peace"], 2);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.degree("war"), 1);
        assert!(!graph.has_edge("war", "war"));
    }

    #[test]
    fn rank_scores_hub_highest() {
        // "hub" neighbors everything within the window; leaves only see hub.
        let graph = CooccurrenceGraph::build(&["a1", "hub", "a2", "hub", "a3", "hub", "a4"], 1);
        let scores = graph.rank(0.85, 100, 1e-6);
        let hub = graph.nodes().iter().position(|n| n == "hub").unwrap();
        for (idx, score) in scores.iter().enumerate() {
            if idx != hub {
                assert!(scores[hub] > *score);
            }
        }
        let total: f64 = scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-3);
    }

    #[test]
    fn empty_text_yields_no_keywords() {
        let ranker = KeywordRanker::default();
        assert!(ranker.extract("", Some(Language::En)).is_empty());
        assert!(ranker.extract("the and of to", Some(Language::En)).is_empty());
    }

    #[test]
    fn filters_stopwords_short_words_and_punctuation() {
        let ranker = KeywordRanker::default();
        let tokens = ranker.tokenize("The hero's journey: betrayal, and a quest!", Language::En);
        assert_eq!(tokens, vec!["heros", "journey", "betrayal", "quest"]);
    }

    #[test]
    fn respects_top_n_and_is_deterministic() {
        let text = "Dragons guard ancient treasure while knights seek treasure and dragons \
                    burn villages; the knights defend villages from dragons.";
        let first = extract_keywords(text, 3, 4, None);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0], "dragons");
        for _ in 0..5 {
            assert_eq!(extract_keywords(text, 3, 4, None), first);
        }
    }

    #[test]
    fn tied_scores_keep_first_seen_order() {
        assert_eq!(extract_keywords("zeta alpha", 10, 1, Some(Language::En)), vec!["zeta", "alpha"]);
        assert_eq!(extract_keywords("alpha zeta", 10, 1, Some(Language::En)), vec!["alpha", "zeta"]);
    }

    #[test]
    fn iteration_cap_and_tolerance_control_convergence() {
        let graph = CooccurrenceGraph::build(&["a1", "hub", "a2", "hub", "a3", "hub", "a4"], 1);
        let hub = graph.nodes().iter().position(|n| n == "hub").unwrap();

        let converged = graph.rank(0.85, 100, 1e-6);
        let one_step = graph.rank(0.85, 1, 1e-6);
        assert!((one_step[hub] - 0.71).abs() < 1e-9);
        assert!((converged[hub] - 0.132 / 0.2775).abs() < 1e-5);

        let exhaustive = graph.rank(0.85, 10_000, 1e-12);
        for (a, b) in converged.iter().zip(&exhaustive) {
            assert!((a - b).abs() < 1e-5);
        }

        // a loose tolerance stops after the first round
        assert_eq!(graph.rank(0.85, 100, 10.0), one_step);
    }

    #[test]
    fn french_stopwords_are_filtered() {
        let text = "Pour les enfants dans une maison avec leurs parents";
        let keywords = extract_keywords(text, 10, 4, Some(Language::Fr));
        assert!(!keywords.contains(&"pour".to_string()));
        assert!(!keywords.contains(&"dans".to_string()));
        assert!(keywords.contains(&"enfants".to_string()));
    }
}
