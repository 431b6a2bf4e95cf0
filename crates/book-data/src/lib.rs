//! Shelfscan Book Data Crate
//!
//! This crate turns an ISBN into a single book record by combining several
//! public sources of Japanese book metadata.
//!
//! # Overview
//!
//! - ISBN normalization and checksum validation
//! - Source adapters: openBD, Google Books and an amazon.co.jp scrape
//! - Cover URL validation
//! - A resolver that cascades over the sources, backfills missing fields and
//!   caches the result
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     ISBN         |  (scanned or typed)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  BookResolver    | --> |  cache           |
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  BookSource      | --> |  CoverCheck      |  (is the cover usable?)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |   BookRecord     |  (gap-filled, tagged with its base source)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`BookRecord`] - Unified book metadata
//! - [`SourceTag`] - Which source supplied the base record
//! - [`BookResolver`] - Cascade, gap-fill and cache
//! - [`BookSource`] / [`EnrichmentSource`] - Adapter seams
//! - [`CoverCheck`] - Cover URL validation seam

pub mod errors;
pub mod models;
pub mod provider;
pub mod publish;
pub mod resolver;
pub mod scan;
pub mod validator;

// Re-export all public types from models
pub use models::{
    is_bookland_ean, isbn13_to_isbn10, normalize_isbn, validate_isbn, BookRecord, SourceTag,
};

pub use errors::BookDataError;

// Re-export provider types
pub use provider::amazon::{AmazonCoverClient, AmazonProvider};
pub use provider::google_books::GoogleBooksProvider;
pub use provider::openbd::OpenBdProvider;
pub use provider::{BookSource, EnrichmentSource};

pub use publish::BookPublisher;
pub use resolver::{fill_if_absent, BookResolver};
pub use scan::{detect_isbns, DecodedBarcode, IsbnDecoder, Symbology};
pub use validator::{CoverCheck, ImageUrlValidator};
