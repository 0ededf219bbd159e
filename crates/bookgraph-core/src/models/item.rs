use serde::{Deserialize, Serialize};

/// Author value meaning "no attribution".
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

// ─── CatalogItem ────────────────────────────────────────────

/// One cataloged book, as it arrives from any source (manual entry,
/// providers, spreadsheet import, native collection file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Source-prefixed identifier, e.g. `openlibrary-OL123M` or `goodreads-42-…`.
    pub id: String,
    pub title: String,
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    /// Display string, not validated as numeric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<String>,
}

impl CatalogItem {
    /// Create an item with only the required fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: None,
            description: None,
            subjects: Vec::new(),
            cover_url: None,
            publish_year: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let incoming: Vec<String> = subjects.into_iter().map(Into::into).collect();
        self.subjects.clear();
        union_subjects(&mut self.subjects, &incoming);
        self
    }

    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    pub fn with_publish_year(mut self, year: impl Into<String>) -> Self {
        self.publish_year = Some(year.into());
        self
    }

    /// Description text, or `""` when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn has_description(&self) -> bool {
        !self.description_text().trim().is_empty()
    }

    pub fn has_known_author(&self) -> bool {
        is_known_author(&self.author)
    }

    pub fn has_cover(&self) -> bool {
        self.cover_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// ISBN reduced to digits and `X`, or `None` when absent or empty.
    pub fn cleaned_isbn(&self) -> Option<String> {
        self.isbn
            .as_deref()
            .map(clean_isbn)
            .filter(|isbn| !isbn.is_empty())
    }
}

/// False for blank authors and the [`UNKNOWN_AUTHOR`] sentinel (any case).
pub fn is_known_author(author: &str) -> bool {
    let author = author.trim();
    !author.is_empty() && !author.eq_ignore_ascii_case(UNKNOWN_AUTHOR)
}

/// Strip everything except ASCII digits and `X` (uppercased).
pub fn clean_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'x' || *c == 'X')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Append `incoming` subjects not already present (case-insensitive),
/// keeping the first-seen casing.
pub fn union_subjects(target: &mut Vec<String>, incoming: &[String]) {
    for subject in incoming {
        let trimmed = subject.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if !target.iter().any(|s| s.to_lowercase() == lower) {
            target.push(trimmed.to_string());
        }
    }
}
