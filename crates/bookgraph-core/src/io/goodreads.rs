use std::io::Read;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::{CatalogItem, clean_isbn};

const REQUIRED_HEADERS: [&str; 3] = ["Book Id", "Title", "Author"];

/// One row of a Goodreads library export. Extra columns are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoodreadsRow {
    #[serde(rename = "Book Id", default)]
    pub book_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Author", default)]
    pub author: String,
    #[serde(rename = "ISBN", default)]
    pub isbn: String,
    #[serde(rename = "ISBN13", default)]
    pub isbn13: String,
    #[serde(rename = "Year Published", default)]
    pub year_published: String,
}

impl GoodreadsRow {
    /// Convert to a catalog item, or `None` when title or author is blank.
    ///
    /// Goodreads wraps ISBNs as `="0441013597"`; cleaning drops the noise.
    /// A full 13-char ISBN13 wins over the 10-char ISBN.
    pub fn into_item(self) -> Option<CatalogItem> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() || author.is_empty() {
            return None;
        }

        let isbn13 = clean_isbn(&self.isbn13);
        let isbn10 = clean_isbn(&self.isbn);
        let isbn = if isbn13.len() >= 13 {
            Some(isbn13)
        } else if isbn10.len() >= 10 {
            Some(isbn10)
        } else {
            None
        };

        let suffix = Uuid::new_v4().simple().to_string();
        let book_id = self.book_id.trim();
        let id = if book_id.is_empty() {
            format!("goodreads-{}", &suffix[..12])
        } else {
            format!("goodreads-{book_id}-{}", &suffix[..9])
        };

        let mut item = CatalogItem::new(id, title, author);
        item.isbn = isbn;
        let year = self.year_published.trim();
        if !year.is_empty() {
            item.publish_year = Some(year.to_string());
        }
        Some(item)
    }
}

/// Parse a Goodreads CSV export into catalog items.
///
/// Rows without title or author are skipped; a file that is not a
/// Goodreads export, or that yields no items, is a validation error.
pub fn parse_goodreads_csv<R: Read>(reader: R) -> Result<Vec<CatalogItem>> {
    parse_goodreads_csv_with_progress(reader, |_, _, _| {})
}

/// Like [`parse_goodreads_csv`], reporting `(current, total, message)` per row.
pub fn parse_goodreads_csv_with_progress<R, F>(reader: R, mut on_progress: F) -> Result<Vec<CatalogItem>>
where
    R: Read,
    F: FnMut(usize, usize, &str),
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if !REQUIRED_HEADERS
        .iter()
        .all(|required| headers.iter().any(|h| h == *required))
    {
        return Err(CatalogError::ValidationError(
            "not a Goodreads export: expected 'Book Id', 'Title' and 'Author' columns".to_string(),
        ));
    }

    let rows = csv_reader
        .deserialize::<GoodreadsRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let total = rows.len();

    let mut items = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for (idx, row) in rows.into_iter().enumerate() {
        on_progress(idx + 1, total, &format!("Processing book {} of {total}", idx + 1));
        match row.into_item() {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("goodreads: skipped {skipped} rows without title or author");
    }
    if items.is_empty() {
        return Err(CatalogError::ValidationError(
            "no valid books found in the CSV file".to_string(),
        ));
    }

    Ok(items)
}
