use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};
use crate::models::{CatalogItem, union_subjects};

pub const EXPORT_VERSION: &str = "1.0";

/// Native collection file: `{version, exportDate, items}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub items: Vec<CatalogItem>,
}

/// Wrap a collection into an export document stamped with the current time.
pub fn export_collection(items: &[CatalogItem]) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: Utc::now(),
        items: items.to_vec(),
    }
}

/// Write an export document as pretty JSON.
pub fn write_export(path: &Path, items: &[CatalogItem]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&export_collection(items))?;
    fs::write(path, json)?;
    Ok(())
}

/// Read and validate a collection file.
pub fn read_collection(path: &Path) -> Result<Vec<CatalogItem>> {
    let contents = fs::read_to_string(path)?;
    import_collection(&contents)
}

/// Parse a collection document, validating every record.
///
/// Accepts `items` and the older `books` key. The first record missing
/// `id`, `title` or `author` rejects the whole batch.
pub fn import_collection(json: &str) -> Result<Vec<CatalogItem>> {
    let data: Value = serde_json::from_str(json)?;
    let records = data
        .get("items")
        .or_else(|| data.get("books"))
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::InvalidShape("'items' array not found".to_string()))?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect()
}

fn parse_record(index: usize, record: &Value) -> Result<CatalogItem> {
    let Some(fields) = record.as_object() else {
        return Err(CatalogError::InvalidShape(format!(
            "record {index} is not an object"
        )));
    };

    let id = required(fields, index, "id")?;
    let title = required(fields, index, "title")?;
    let author = required(fields, index, "author")?;

    let mut item = CatalogItem::new(id, title, author);
    item.isbn = optional(fields, "isbn");
    item.description = optional(fields, "description");
    item.cover_url = optional(fields, "coverUrl");
    item.publish_year = optional(fields, "publishYear");

    if let Some(Value::Array(subjects)) = fields.get("subjects") {
        let coerced: Vec<String> = subjects.iter().filter_map(coerce_scalar).collect();
        union_subjects(&mut item.subjects, &coerced);
    }

    Ok(item)
}

fn required(fields: &Map<String, Value>, index: usize, field: &'static str) -> Result<String> {
    optional(fields, field).ok_or(CatalogError::MissingField { index, field })
}

fn optional(fields: &Map<String, Value>, field: &str) -> Option<String> {
    fields.get(field).and_then(coerce_text).filter(|s| !s.is_empty())
}

/// Any JSON value as text: arrays join their scalar elements with `,`,
/// objects become their JSON encoding.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(values) => Some(
            values
                .iter()
                .filter_map(coerce_scalar)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
        scalar => coerce_scalar(scalar),
    }
}

fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
