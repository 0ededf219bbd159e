pub mod goodreads;
pub mod json;

pub use goodreads::{GoodreadsRow, parse_goodreads_csv, parse_goodreads_csv_with_progress};
pub use json::{
    EXPORT_VERSION, ExportDocument, export_collection, import_collection, read_collection,
    write_export,
};
