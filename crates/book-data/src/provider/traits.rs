//! Book source trait definitions.
//!
//! Adapters implement [`BookSource::lookup`] with ordinary `Result`
//! plumbing. The provided [`BookSource::fetch`] is what the resolver calls: it
//! logs failures and turns them into `None`, so one provider's outage never
//! reaches another provider or the caller.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::BookDataError;
use crate::models::{BookRecord, SourceTag};

/// A provider that can look a book up by ISBN.
#[async_trait]
pub trait BookSource: Send + Sync {
    /// Tag stamped on records this source creates.
    fn id(&self) -> SourceTag;

    /// Look up a book by ISBN.
    ///
    /// Returns `Ok(None)` or `Err(BookDataError::NotFound)` when the provider
    /// has no entry, and other errors for transport or payload failures.
    async fn lookup(&self, isbn: &str) -> Result<Option<BookRecord>, BookDataError>;

    /// Look up a book by ISBN, degrading every failure to `None`.
    async fn fetch(&self, isbn: &str) -> Option<BookRecord> {
        absorb(self.id(), "lookup", self.lookup(isbn).await)
    }
}

/// A source that can additionally find a book from its title.
///
/// Used for opportunistic backfill once a bibliographic record exists but is
/// missing a page count or a usable cover.
#[async_trait]
pub trait EnrichmentSource: BookSource {
    /// Search by title (and optionally author) and look up the best match.
    ///
    /// `isbn` is the ISBN the caller is resolving, if known. It is preferred
    /// among the search results and becomes the returned record's ISBN.
    async fn lookup_by_title(
        &self,
        title: &str,
        author: Option<&str>,
        isbn: Option<&str>,
    ) -> Result<Option<BookRecord>, BookDataError>;

    /// Search by title, degrading every failure to `None`.
    async fn fetch_by_title(
        &self,
        title: &str,
        author: Option<&str>,
        isbn: Option<&str>,
    ) -> Option<BookRecord> {
        absorb(
            self.id(),
            "title search",
            self.lookup_by_title(title, author, isbn).await,
        )
    }
}

/// Convert an adapter result into the "record or nothing" contract.
pub(crate) fn absorb(
    source: SourceTag,
    operation: &str,
    result: Result<Option<BookRecord>, BookDataError>,
) -> Option<BookRecord> {
    match result {
        Ok(record) => {
            if record.is_none() {
                debug!("{} {}: no record", source, operation);
            }
            record
        }
        Err(e) if e.is_not_found() => {
            debug!("{} {}: {}", source, operation, e);
            None
        }
        Err(e) => {
            warn!("{} {} failed: {}", source, operation, e);
            None
        }
    }
}
