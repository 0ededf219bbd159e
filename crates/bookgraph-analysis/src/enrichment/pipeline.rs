use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use bookgraph_core::{CatalogItem, EnrichmentConfig};

use crate::dedup::merge::merge_items;
use crate::enrichment::provider::{BookProvider, SearchField};

/// ISBNs shorter than this are not worth an ISBN search.
const MIN_SEARCHABLE_ISBN: usize = 10;

/// What happened during an enrichment run.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    pub steps: Vec<String>,
    pub sources_used: Vec<String>,
    pub errors: Vec<String>,
    /// Items that came back different from how they went in.
    pub enriched: usize,
}

impl EnrichmentReport {
    pub(crate) fn add_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub(crate) fn add_source(&mut self, source: &str) {
        if !self.sources_used.iter().any(|s| s == source) {
            self.sources_used.push(source.to_string());
        }
    }

    pub(crate) fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    fn absorb(&mut self, other: EnrichmentReport) {
        self.steps.extend(other.steps);
        for source in &other.sources_used {
            self.add_source(source);
        }
        self.errors.extend(other.errors);
        self.enriched += other.enriched;
    }
}

/// True when any of description, subjects, cover or ISBN is missing, or
/// the author is unknown.
pub fn needs_enrichment(item: &CatalogItem) -> bool {
    needs_more_data(item) || !item.has_known_author()
}

fn needs_more_data(item: &CatalogItem) -> bool {
    !item.has_description() || item.subjects.is_empty() || !item.has_cover() || item.cleaned_isbn().is_none()
}

/// Best-effort metadata completion from a primary and an optional
/// secondary provider. Provider failures are logged and leave the item as
/// it was.
pub struct EnrichmentPipeline {
    pub(crate) primary: Arc<dyn BookProvider>,
    pub(crate) secondary: Option<Arc<dyn BookProvider>>,
    delay: Duration,
    pub(crate) max_search_results: usize,
}

impl EnrichmentPipeline {
    pub fn new(primary: Arc<dyn BookProvider>) -> Self {
        Self::from_config(primary, &EnrichmentConfig::default())
    }

    pub fn from_config(primary: Arc<dyn BookProvider>, config: &EnrichmentConfig) -> Self {
        Self {
            primary,
            secondary: None,
            delay: Duration::from_millis(config.delay_between_calls_ms),
            max_search_results: config.max_search_results,
        }
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn BookProvider>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enrich one item: primary by ISBN then title, then the secondary
    /// provider if data is still missing. Always pauses once after the
    /// primary lookup.
    pub async fn enrich_item(&self, item: &CatalogItem) -> (CatalogItem, EnrichmentReport) {
        let mut report = EnrichmentReport::default();
        let mut enriched = item.clone();

        if let Some(hit) = self.lookup_primary(&enriched, &mut report).await {
            report.add_source(self.primary.name());
            enriched = merge_items(&enriched, &hit);
        }
        self.pause().await;

        if let Some(secondary) = &self.secondary
            && needs_more_data(&enriched)
            && let Some(hit) = lookup_secondary(secondary.as_ref(), &enriched, &mut report).await
        {
            report.add_source(secondary.name());
            enriched = merge_items(&enriched, &hit);
        }

        if enriched != *item {
            report.enriched += 1;
        }
        (enriched, report)
    }

    /// Enrich items one at a time, pausing between items and reporting
    /// `(current, total, message)` before each one.
    pub async fn enrich_collection<F>(
        &self,
        items: &[CatalogItem],
        mut on_progress: F,
    ) -> (Vec<CatalogItem>, EnrichmentReport)
    where
        F: FnMut(usize, usize, &str),
    {
        let total = items.len();
        let mut report = EnrichmentReport::default();
        let mut out = Vec::with_capacity(total);

        for (i, item) in items.iter().enumerate() {
            on_progress(i + 1, total, &format!("Enriching \"{}\"...", item.title));

            if needs_enrichment(item) {
                let (enriched, item_report) = self.enrich_item(item).await;
                report.absorb(item_report);
                out.push(enriched);
            } else {
                out.push(item.clone());
            }

            if i + 1 < total {
                self.pause().await;
            }
        }

        info!(
            total,
            enriched = report.enriched,
            errors = report.errors.len(),
            "enrichment finished"
        );
        (out, report)
    }

    async fn lookup_primary(
        &self,
        item: &CatalogItem,
        report: &mut EnrichmentReport,
    ) -> Option<CatalogItem> {
        let provider = self.primary.as_ref();

        if let Some(isbn) = searchable_isbn(item) {
            report.add_step(format!("{}: isbn {isbn}", provider.name()));
            let hits = search_logged(provider, &isbn, SearchField::Isbn, report).await?;
            if let Some(first) = hits.into_iter().next() {
                return Some(first);
            }
        }

        if item.title.trim().is_empty() {
            return None;
        }
        report.add_step(format!("{}: title '{}'", provider.name(), item.title));
        search_logged(provider, &item.title, SearchField::Title, report)
            .await?
            .into_iter()
            .next()
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// ISBN first; otherwise `"<title> <author>"`, accepting only a result
/// whose title and author contain the item's.
async fn lookup_secondary(
    provider: &dyn BookProvider,
    item: &CatalogItem,
    report: &mut EnrichmentReport,
) -> Option<CatalogItem> {
    let mut hits = Vec::new();
    if let Some(isbn) = searchable_isbn(item) {
        report.add_step(format!("{}: isbn {isbn}", provider.name()));
        hits = search_logged(provider, &isbn, SearchField::Isbn, report).await?;
    }
    if !hits.is_empty() {
        return hits.into_iter().next();
    }

    if item.title.trim().is_empty() || !item.has_known_author() {
        return None;
    }
    let query = format!("{} {}", item.title, item.author);
    report.add_step(format!("{}: title+author '{query}'", provider.name()));
    let title = item.title.to_lowercase();
    let author = item.author.to_lowercase();
    search_logged(provider, &query, SearchField::Title, report)
        .await?
        .into_iter()
        .find(|hit| {
            hit.title.to_lowercase().contains(&title) && hit.author.to_lowercase().contains(&author)
        })
}

/// `None` on provider failure, after logging it.
async fn search_logged(
    provider: &dyn BookProvider,
    query: &str,
    field: SearchField,
    report: &mut EnrichmentReport,
) -> Option<Vec<CatalogItem>> {
    match provider.search(query, field).await {
        Ok(hits) => Some(hits),
        Err(e) => {
            warn!(provider = provider.name(), %field, "search failed: {e}");
            report.add_error(format!("{}: {e}", provider.name()));
            None
        }
    }
}

fn searchable_isbn(item: &CatalogItem) -> Option<String> {
    item.cleaned_isbn()
        .filter(|isbn| isbn.len() >= MIN_SEARCHABLE_ISBN)
}
