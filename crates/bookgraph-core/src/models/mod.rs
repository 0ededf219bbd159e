pub mod connection;
pub mod item;

pub use connection::{Connection, MergeGroup, RelationshipType};
pub use item::{CatalogItem, UNKNOWN_AUTHOR, clean_isbn, is_known_author, union_subjects};
