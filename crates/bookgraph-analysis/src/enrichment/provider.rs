use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bookgraph_core::CatalogItem;

use crate::error::Result;
use crate::identifiers::isbn::Isbn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Isbn,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Isbn => "isbn",
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bibliographic search backend returning results as catalog items.
#[async_trait]
pub trait BookProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, field: SearchField) -> Result<Vec<CatalogItem>>;
}

/// Provider backed by an in-memory reference catalog.
///
/// ISBN queries match equal or equivalent ISBNs. A title query matches
/// when every query word occurs in `"<title> <author>"`; an author query is
/// a case-insensitive substring match.
#[derive(Debug, Clone)]
pub struct LocalCatalogProvider {
    name: String,
    items: Vec<CatalogItem>,
}

impl LocalCatalogProvider {
    pub fn new(name: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matches(item: &CatalogItem, query: &str, field: SearchField) -> bool {
        match field {
            SearchField::Isbn => item.cleaned_isbn().is_some_and(|isbn| {
                isbn == bookgraph_core::clean_isbn(query) || Isbn::equivalent(&isbn, query)
            }),
            SearchField::Title => {
                let haystack = format!("{} {}", item.title, item.author).to_lowercase();
                query.split_whitespace().all(|word| haystack.contains(word))
            }
            SearchField::Author => item.author.to_lowercase().contains(query),
        }
    }
}

#[async_trait]
impl BookProvider for LocalCatalogProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, field: SearchField) -> Result<Vec<CatalogItem>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .items
            .iter()
            .filter(|item| Self::matches(item, &query, field))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> LocalCatalogProvider {
        LocalCatalogProvider::new(
            "reference",
            vec![
                CatalogItem::new("r1", "Dune", "Frank Herbert").with_isbn("9780441013593"),
                CatalogItem::new("r2", "Dune Messiah", "Frank Herbert"),
                CatalogItem::new("r3", "Emma", "Jane Austen"),
            ],
        )
    }

    #[tokio::test]
    async fn searches_by_isbn_in_either_form() {
        let hits = provider().search("0-441-01359-7", SearchField::Isbn).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "r1");
    }

    #[tokio::test]
    async fn searches_title_and_author_case_insensitively() {
        let p = provider();
        assert_eq!(p.search("DUNE", SearchField::Title).await.unwrap().len(), 2);
        assert_eq!(p.search("austen", SearchField::Author).await.unwrap().len(), 1);
        assert_eq!(
            p.search("Emma Jane Austen", SearchField::Title).await.unwrap()[0].id,
            "r3"
        );
        assert!(p.search("  ", SearchField::Title).await.unwrap().is_empty());
    }
}
