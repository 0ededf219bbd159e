use bookgraph_core::{CatalogItem, is_known_author, union_subjects};

/// Combine two records of the same book, filling gaps and preferring
/// richer values.
///
/// `existing` keeps its id and wins every tie; `incoming` only replaces a
/// field when it is strictly longer (or fills an empty one). Cover and
/// publish year are first-write-wins. Subjects are unioned
/// case-insensitively.
pub fn merge_items(existing: &CatalogItem, incoming: &CatalogItem) -> CatalogItem {
    let mut merged = existing.clone();

    if char_len(&incoming.title) > char_len(&existing.title) {
        merged.title = incoming.title.clone();
    }

    if is_known_author(&incoming.author)
        && (!is_known_author(&existing.author)
            || char_len(&incoming.author) > char_len(&existing.author))
    {
        merged.author = incoming.author.clone();
    }

    merged.description = prefer_longer(&existing.description, &incoming.description);
    merged.isbn = prefer_longer(&existing.isbn, &incoming.isbn);

    if is_blank(&merged.cover_url) && !is_blank(&incoming.cover_url) {
        merged.cover_url = incoming.cover_url.clone();
    }
    if is_blank(&merged.publish_year) && !is_blank(&incoming.publish_year) {
        merged.publish_year = incoming.publish_year.clone();
    }

    union_subjects(&mut merged.subjects, &incoming.subjects);
    merged
}

fn prefer_longer(existing: &Option<String>, incoming: &Option<String>) -> Option<String> {
    let current = existing.as_deref().map_or(0, char_len_trimmed);
    match incoming {
        Some(value) if !value.trim().is_empty() && char_len(value) > current => {
            Some(value.clone())
        }
        _ => existing.clone(),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn char_len_trimmed(s: &str) -> usize {
    if s.trim().is_empty() { 0 } else { char_len(s) }
}
