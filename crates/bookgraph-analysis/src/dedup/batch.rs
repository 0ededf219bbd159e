use std::collections::HashSet;

use tracing::{debug, info};

use bookgraph_core::{CatalogItem, DedupConfig, MergeGroup};

use crate::dedup::matcher::SimilarityMatcher;
use crate::dedup::merge::merge_items;
use crate::identifiers::isbn::Isbn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    Isbn,
    TitleAuthor,
}

impl MatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isbn => "Same ISBN",
            Self::TitleAuthor => "Similar title and author",
        }
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hit from [`Deduplicator::find_duplicate`].
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateMatch {
    /// Position of the matched record in the searched list.
    pub index: usize,
    /// The matched record merged with the candidate.
    pub merged: CatalogItem,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    /// Existing collection with merges applied, followed by the new items.
    pub updated: Vec<CatalogItem>,
    pub new_items: Vec<CatalogItem>,
    pub merge_groups: Vec<MergeGroup>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListDedupOutcome {
    pub unique: Vec<CatalogItem>,
    pub duplicates_count: usize,
}

/// Batch duplicate detection and import merging.
///
/// An ISBN match decides on its own; otherwise both the normalized titles
/// and the authors have to be similar.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    matcher: SimilarityMatcher,
    min_isbn_length: usize,
    convert_isbn10: bool,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::from_config(&DedupConfig::default())
    }
}

impl Deduplicator {
    pub fn from_config(config: &DedupConfig) -> Self {
        Self {
            matcher: SimilarityMatcher::from_config(config),
            min_isbn_length: config.min_isbn_length,
            convert_isbn10: config.convert_isbn10,
        }
    }

    pub fn matcher(&self) -> &SimilarityMatcher {
        &self.matcher
    }

    /// Why `a` and `b` are the same book, if they are.
    pub fn match_reason(&self, a: &CatalogItem, b: &CatalogItem) -> Option<MatchReason> {
        if self.same_isbn(a, b) {
            return Some(MatchReason::Isbn);
        }
        let normalizer = self.matcher.normalizer();
        let titles_match = self.matcher.are_titles_similar(
            &normalizer.normalize_title(&a.title),
            &normalizer.normalize_title(&b.title),
        );
        (titles_match && self.matcher.are_authors_similar(&a.author, &b.author))
            .then_some(MatchReason::TitleAuthor)
    }

    fn same_isbn(&self, a: &CatalogItem, b: &CatalogItem) -> bool {
        let (Some(isbn_a), Some(isbn_b)) = (a.cleaned_isbn(), b.cleaned_isbn()) else {
            return false;
        };
        if isbn_a.len() < self.min_isbn_length || isbn_b.len() < self.min_isbn_length {
            return false;
        }
        isbn_a == isbn_b || (self.convert_isbn10 && Isbn::equivalent(&isbn_a, &isbn_b))
    }

    /// First record in `existing` that duplicates `candidate`, merged.
    pub fn find_duplicate(
        &self,
        candidate: &CatalogItem,
        existing: &[CatalogItem],
    ) -> Option<DuplicateMatch> {
        existing.iter().enumerate().find_map(|(index, item)| {
            self.match_reason(candidate, item).map(|reason| DuplicateMatch {
                index,
                merged: merge_items(item, candidate),
                reason,
            })
        })
    }

    /// Merge an import batch into a collection.
    ///
    /// Each incoming record either merges into the collection slot it
    /// duplicates, or starts a new item that absorbs every later record of
    /// the batch duplicating it.
    pub fn process_import_with_merge(
        &self,
        incoming: &[CatalogItem],
        existing: &[CatalogItem],
    ) -> ImportOutcome {
        self.process_import_with_progress(incoming, existing, |_, _, _| {})
    }

    /// Like [`Self::process_import_with_merge`], reporting
    /// `(current, total, message)` once per incoming record.
    pub fn process_import_with_progress<F>(
        &self,
        incoming: &[CatalogItem],
        existing: &[CatalogItem],
        mut on_progress: F,
    ) -> ImportOutcome
    where
        F: FnMut(usize, usize, &str),
    {
        let total = incoming.len();
        let mut updated = existing.to_vec();
        let mut new_items = Vec::new();
        let mut merge_groups = Vec::new();
        let mut processed = HashSet::new();

        for (i, item) in incoming.iter().enumerate() {
            on_progress(i + 1, total, &format!("Checking '{}'", item.title));
            if processed.contains(&i) {
                continue;
            }
            processed.insert(i);

            if let Some(hit) = self.find_duplicate(item, &updated) {
                merge_groups.push(MergeGroup {
                    original_items: [updated[hit.index].clone(), item.clone()],
                    merged_item: hit.merged.clone(),
                    reason: hit.reason.to_string(),
                });
                updated[hit.index] = hit.merged;
                continue;
            }

            let mut folded = item.clone();
            for (j, other) in incoming.iter().enumerate().skip(i + 1) {
                if processed.contains(&j) {
                    continue;
                }
                if let Some(reason) = self.match_reason(other, &folded) {
                    let merged = merge_items(&folded, other);
                    merge_groups.push(MergeGroup {
                        original_items: [folded, other.clone()],
                        merged_item: merged.clone(),
                        reason: format!("{reason} (within import)"),
                    });
                    folded = merged;
                    processed.insert(j);
                }
            }
            new_items.push(folded);
        }

        updated.extend(new_items.iter().cloned());
        info!(
            incoming = total,
            new = new_items.len(),
            merged = merge_groups.len(),
            "import merged"
        );

        ImportOutcome {
            updated,
            new_items,
            merge_groups,
        }
    }

    /// Keep the first occurrence of every book, dropping repeated ids and
    /// later records that match an already kept one.
    pub fn dedup_list(&self, items: &[CatalogItem]) -> ListDedupOutcome {
        let mut unique: Vec<CatalogItem> = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut duplicates_count = 0;

        for item in items {
            let repeated = !seen_ids.insert(item.id.as_str())
                || unique.iter().any(|kept| self.match_reason(item, kept).is_some());
            if repeated {
                duplicates_count += 1;
            } else {
                unique.push(item.clone());
            }
        }

        debug!(total = items.len(), duplicates = duplicates_count, "deduplicated list");
        ListDedupOutcome {
            unique,
            duplicates_count,
        }
    }
}
