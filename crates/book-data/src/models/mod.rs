//! Book data models
//!
//! - `book` - The unified record (BookRecord) and its source tag (SourceTag)
//! - `isbn` - ISBN normalization, checksum validation and conversion

mod book;
mod isbn;

pub use book::{BookRecord, SourceTag};
pub(crate) use book::{non_empty, normalize_authors};
pub use isbn::{is_bookland_ean, isbn13_to_isbn10, normalize_isbn, validate_isbn};
