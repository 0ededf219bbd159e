use std::collections::HashSet;

use tracing::warn;

use bookgraph_core::CatalogItem;

use crate::enrichment::pipeline::EnrichmentPipeline;
use crate::enrichment::provider::{BookProvider, SearchField};

impl EnrichmentPipeline {
    /// Primary results followed by the secondary provider's new ones.
    ///
    /// A result is dropped when its `title|||author` key (lowercase) or its
    /// cleaned ISBN was already seen. Failed providers contribute nothing.
    pub async fn hybrid_search(&self, query: &str, field: SearchField) -> Vec<CatalogItem> {
        let mut seen = SeenKeys::default();
        let mut results = Vec::new();

        for hit in search_or_empty(self.primary.as_ref(), query, field).await {
            if seen.insert_title_author(&hit) {
                seen.insert_isbn(&hit);
                results.push(hit);
            }
        }

        if let Some(secondary) = &self.secondary {
            for hit in search_or_empty(secondary.as_ref(), query, field).await {
                if !seen.insert_isbn(&hit) {
                    continue;
                }
                if seen.insert_title_author(&hit) {
                    results.push(hit);
                }
            }
        }

        results.truncate(self.max_search_results);
        results
    }
}

#[derive(Default)]
struct SeenKeys {
    isbns: HashSet<String>,
    title_authors: HashSet<String>,
}

impl SeenKeys {
    /// False if the item's ISBN was already seen. Items without a usable
    /// ISBN always pass.
    fn insert_isbn(&mut self, item: &CatalogItem) -> bool {
        match item.cleaned_isbn().filter(|isbn| isbn.len() >= 10) {
            Some(isbn) => self.isbns.insert(isbn),
            None => true,
        }
    }

    fn insert_title_author(&mut self, item: &CatalogItem) -> bool {
        self.title_authors.insert(format!(
            "{}|||{}",
            item.title.trim().to_lowercase(),
            item.author.trim().to_lowercase()
        ))
    }
}

async fn search_or_empty(
    provider: &dyn BookProvider,
    query: &str,
    field: SearchField,
) -> Vec<CatalogItem> {
    provider.search(query, field).await.unwrap_or_else(|e| {
        warn!(provider = provider.name(), "search failed: {e}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bookgraph_core::EnrichmentConfig;

    use super::*;
    use crate::enrichment::provider::LocalCatalogProvider;

    fn primary() -> LocalCatalogProvider {
        LocalCatalogProvider::new(
            "primary",
            vec![
                CatalogItem::new("p1", "Dune", "Frank Herbert").with_isbn("9780441013593"),
                CatalogItem::new("p2", "Dune Messiah", "Frank Herbert"),
            ],
        )
    }

    fn secondary() -> LocalCatalogProvider {
        LocalCatalogProvider::new(
            "secondary",
            vec![
                CatalogItem::new("s1", "Dune (Deluxe)", "Frank Herbert").with_isbn("978-0-441-01359-3"),
                CatalogItem::new("s2", "DUNE MESSIAH", "frank herbert"),
                CatalogItem::new("s3", "Children of Dune", "Frank Herbert"),
            ],
        )
    }

    #[tokio::test]
    async fn merges_providers_without_repeats() {
        let pipeline = EnrichmentPipeline::new(Arc::new(primary()))
            .with_secondary(Arc::new(secondary()))
            .with_delay(Duration::ZERO);

        let hits = pipeline.hybrid_search("dune", SearchField::Title).await;
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "s3"]);
    }

    #[tokio::test]
    async fn truncates_to_configured_maximum() {
        let config = EnrichmentConfig {
            max_search_results: 2,
            ..EnrichmentConfig::default()
        };
        let pipeline = EnrichmentPipeline::from_config(Arc::new(primary()), &config)
            .with_secondary(Arc::new(secondary()));

        let hits = pipeline.hybrid_search("dune", SearchField::Title).await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "p1");
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let pipeline = EnrichmentPipeline::new(Arc::new(primary()));
        assert!(pipeline.hybrid_search("   ", SearchField::Title).await.is_empty());
    }
}
