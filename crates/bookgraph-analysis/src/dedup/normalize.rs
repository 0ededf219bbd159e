use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static PARENTHETICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*").expect("valid regex"));

static SUBTITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\s*:.*$").expect("valid regex"));

static AUTHOR_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",?\s+(jr|sr|ii|iii|iv|md|phd)\.?$").expect("valid regex"));

pub const DEFAULT_CACHE_SIZE: usize = 1000;

type Memo = Mutex<LruCache<String, String>>;

/// Title and author normalization with bounded memoization.
///
/// Each cache holds at most `capacity` entries and evicts the least
/// recently used one when full.
#[derive(Debug)]
pub struct Normalizer {
    capacity: usize,
    titles: Option<Memo>,
    authors: Option<Memo>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

/// A clone has the same capacity and starts with empty caches.
impl Clone for Normalizer {
    fn clone(&self) -> Self {
        Self::new(self.capacity)
    }
}

impl Normalizer {
    /// `capacity == 0` disables caching.
    pub fn new(capacity: usize) -> Self {
        let memo = || NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        Self {
            capacity,
            titles: memo(),
            authors: memo(),
        }
    }

    /// `"The Hobbit (Illustrated): Or There and Back Again"` → `"the hobbit"`.
    pub fn normalize_title(&self, title: &str) -> String {
        memoized(self.titles.as_ref(), title, normalize_title)
    }

    /// `"José Martí, Jr."` → `"jose marti"`.
    pub fn normalize_author(&self, author: &str) -> String {
        memoized(self.authors.as_ref(), author, normalize_author)
    }

    pub fn clear_caches(&self) {
        for cache in self.caches() {
            if let Ok(mut cache) = cache.lock() {
                cache.clear();
            }
        }
    }

    /// Entries currently cached, titles plus authors.
    pub fn cached_entries(&self) -> usize {
        self.caches()
            .filter_map(|cache| cache.lock().ok().map(|c| c.len()))
            .sum()
    }

    fn caches(&self) -> impl Iterator<Item = &Memo> {
        self.titles.iter().chain(self.authors.iter())
    }
}

fn memoized(cache: Option<&Memo>, raw: &str, compute: fn(&str) -> String) -> String {
    let Some(cache) = cache else {
        return compute(raw);
    };
    if let Ok(mut cache) = cache.lock()
        && let Some(hit) = cache.get(raw)
    {
        return hit.clone();
    }

    let value = compute(raw);
    if let Ok(mut cache) = cache.lock() {
        cache.put(raw.to_string(), value.clone());
    }
    value
}

/// Lowercase, drop diacritics, remove parentheticals and the subtitle,
/// then reduce to space-separated letter/digit runs.
pub fn normalize_title(title: &str) -> String {
    let base = collapse_whitespace(&strip_diacritics(&title.to_lowercase()));
    let base = PARENTHETICAL_RE.replace_all(&base, " ");
    let base = SUBTITLE_RE.replace(&base, "");
    let cleaned: String = base
        .chars()
        .filter(|c| !matches!(c, '\'' | '`' | '\u{2019}'))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    collapse_whitespace(&cleaned)
}

/// Lowercase, drop diacritics, collapse whitespace and strip a trailing
/// name suffix (jr, sr, ii, iii, iv, md, phd).
pub fn normalize_author(author: &str) -> String {
    let base = collapse_whitespace(&strip_diacritics(&author.to_lowercase()));
    AUTHOR_SUFFIX_RE.replace(&base, "").trim().to_string()
}

fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_drops_subtitle_parentheticals_and_punctuation() {
        assert_eq!(
            normalize_title("The Hobbit (Illustrated): Or There and Back Again"),
            "the hobbit"
        );
        assert_eq!(normalize_title("  Ender's   Game "), "enders game");
        assert_eq!(normalize_title("Les Misérables"), "les miserables");
        assert_eq!(normalize_title("Catch-22"), "catch 22");
        assert_eq!(normalize_title("Harry Potter (Book 1) and the Stone"), "harry potter and the stone");
    }

    #[test]
    fn author_strips_suffixes_and_accents() {
        assert_eq!(normalize_author("José  Martí"), "jose marti");
        assert_eq!(normalize_author("Martin Luther King, Jr."), "martin luther king");
        assert_eq!(normalize_author("Henry Ford II"), "henry ford");
        assert_eq!(normalize_author("Unknown Author"), "unknown author");
    }

    #[test]
    fn cache_is_bounded_and_clearable() {
        let normalizer = Normalizer::new(2);
        normalizer.normalize_title("One");
        normalizer.normalize_title("Two");
        assert_eq!(normalizer.cached_entries(), 2);

        normalizer.normalize_title("Three");
        assert_eq!(normalizer.cached_entries(), 2);
        assert_eq!(normalizer.normalize_title("Three"), "three");

        normalizer.normalize_author("Anon");
        assert_eq!(normalizer.cached_entries(), 3);
        normalizer.clear_caches();
        assert_eq!(normalizer.cached_entries(), 0);
    }

    #[test]
    fn recently_used_titles_survive_eviction() {
        let normalizer = Normalizer::new(3);
        for title in ["Hot", "Cold A", "Hot", "Cold B", "Hot", "Cold C"] {
            normalizer.normalize_title(title);
        }
        assert_eq!(normalizer.cached_entries(), 3);

        let titles = normalizer.titles.as_ref().unwrap().lock().unwrap();
        assert!(titles.contains("Hot"));
        assert!(!titles.contains("Cold A"));
        assert!(titles.contains("Cold C"));
    }

    #[test]
    fn clone_starts_cold() {
        let normalizer = Normalizer::new(4);
        normalizer.normalize_title("Dune");
        let copy = normalizer.clone();
        assert_eq!(copy.cached_entries(), 0);
        assert_eq!(copy.normalize_title("Dune"), "dune");
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let normalizer = Normalizer::new(0);
        assert_eq!(normalizer.normalize_title("Dune: Deluxe Edition"), "dune");
        assert_eq!(normalizer.cached_entries(), 0);
    }
}
