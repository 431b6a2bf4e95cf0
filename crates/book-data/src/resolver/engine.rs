use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::models::{normalize_isbn, BookRecord};
use crate::provider::{BookSource, EnrichmentSource};
use crate::validator::CoverCheck;

use super::merge::fill_if_absent;

/// Resolves ISBNs to book records through a fixed source cascade.
///
/// Order of preference:
/// 1. the in-memory cache
/// 2. the enrichment source by ISBN, returned as-is
/// 3. the secondary source, backfilled from the primary source
/// 4. the primary source alone
///
/// Records from tiers 3 and 4 get a title search on the enrichment source
/// when they lack a page count or a usable cover. Every backfill only fills
/// fields that are still absent.
pub struct BookResolver {
    enrichment: Arc<dyn EnrichmentSource>,
    secondary: Arc<dyn BookSource>,
    primary: Arc<dyn BookSource>,
    covers: Arc<dyn CoverCheck>,
    cache: RwLock<HashMap<String, Arc<BookRecord>>>,
}

impl BookResolver {
    /// Create a resolver.
    ///
    /// # Arguments
    /// * `enrichment` - Scrape source tried first and used for title backfill
    /// * `secondary` - Bibliographic source whose records are backfilled
    /// * `primary` - Bibliographic source used for backfill and as last resort
    /// * `covers` - Decides whether a cover URL counts as present
    pub fn new(
        enrichment: Arc<dyn EnrichmentSource>,
        secondary: Arc<dyn BookSource>,
        primary: Arc<dyn BookSource>,
        covers: Arc<dyn CoverCheck>,
    ) -> Self {
        Self {
            enrichment,
            secondary,
            primary,
            covers,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve an ISBN to a record, or `None` when no source knows it.
    ///
    /// With `use_cache`, a previously resolved record is returned without any
    /// remote call. Resolved records are cached either way.
    pub async fn resolve(&self, isbn: &str, use_cache: bool) -> Option<Arc<BookRecord>> {
        let isbn = normalize_isbn(isbn);

        if use_cache {
            if let Some(book) = self.cached(&isbn) {
                debug!("Cache hit for {}", isbn);
                return Some(book);
            }
        }

        let book = self.run_cascade(&isbn).await;
        match &book {
            Some(book) => info!(
                "Resolved {} from {} (title: {})",
                isbn,
                book.source,
                book.title.as_deref().unwrap_or("-")
            ),
            None => info!("No source has a record for {}", isbn),
        }

        book.map(|book| self.store(&isbn, book))
    }

    /// Cached record for an ISBN, if one was resolved before.
    pub fn cached(&self, isbn: &str) -> Option<Arc<BookRecord>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_isbn(isbn))
            .cloned()
    }

    /// Number of cached records.
    pub fn cache_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn store(&self, isbn: &str, book: BookRecord) -> Arc<BookRecord> {
        let book = Arc::new(book);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(isbn.to_string(), Arc::clone(&book));
        book
    }

    async fn run_cascade(&self, isbn: &str) -> Option<BookRecord> {
        debug!("Trying {} by ISBN for {}", self.enrichment.id(), isbn);
        if let Some(book) = self.enrichment.fetch(isbn).await {
            return Some(book);
        }

        debug!("Trying {} for {}", self.secondary.id(), isbn);
        if let Some(mut book) = self.secondary.fetch(isbn).await {
            let mut cover_ok = self.has_valid_cover(&book).await;

            debug!("Backfilling {} from {}", isbn, self.primary.id());
            if let Some(primary) = self.primary.fetch(isbn).await {
                fill_if_absent(&mut book.publisher, primary.publisher);
                fill_if_absent(&mut book.page_count, primary.page_count);
                fill_if_absent(&mut book.published_date, primary.published_date);
                self.fill_cover(&mut book, &mut cover_ok, primary.cover_image_url)
                    .await;
            }

            self.enrich(&mut book, cover_ok).await;
            return Some(book);
        }

        debug!("Trying {} for {}", self.primary.id(), isbn);
        if let Some(mut book) = self.primary.fetch(isbn).await {
            let cover_ok = self.has_valid_cover(&book).await;
            self.enrich(&mut book, cover_ok).await;
            return Some(book);
        }

        None
    }

    /// Title search backfill for records missing a page count or cover.
    async fn enrich(&self, book: &mut BookRecord, mut cover_ok: bool) {
        if book.page_count.is_some() && cover_ok {
            return;
        }
        let Some(title) = book.title.clone() else {
            debug!("{} needs enrichment but has no title", book.isbn());
            return;
        };

        debug!(
            "Enriching {} via {} title search",
            book.isbn(),
            self.enrichment.id()
        );
        let author = book.first_author().map(str::to_string);
        let isbn = book.isbn().to_string();
        let Some(found) = self
            .enrichment
            .fetch_by_title(&title, author.as_deref(), Some(&isbn))
            .await
        else {
            return;
        };

        fill_if_absent(&mut book.page_count, found.page_count);
        fill_if_absent(&mut book.published_date, found.published_date);
        self.fill_cover(book, &mut cover_ok, found.cover_image_url)
            .await;
        fill_if_absent(&mut book.description, found.description);
    }

    async fn has_valid_cover(&self, book: &BookRecord) -> bool {
        match book.cover_image_url.as_deref() {
            Some(url) => self.covers.is_valid_cover(url).await,
            None => false,
        }
    }

    /// Fill the cover from `candidate` unless a usable one is present.
    ///
    /// An unusable cover counts as absent, but is only replaced by a
    /// candidate that passes the check itself.
    async fn fill_cover(
        &self,
        book: &mut BookRecord,
        cover_ok: &mut bool,
        candidate: Option<String>,
    ) {
        if *cover_ok {
            return;
        }
        let Some(url) = candidate else {
            return;
        };
        if !self.covers.is_valid_cover(&url).await {
            debug!("Rejected cover candidate {}", url);
            return;
        }

        book.cover_image_url = Some(url);
        *cover_ok = true;
    }
}
