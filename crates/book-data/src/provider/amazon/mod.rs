//! amazon.co.jp scrape provider.
//!
//! There is no API behind this source: records are pattern-matched out of
//! product and search page markup. It has the richest single-call payload
//! (page count, description, high resolution cover) and the least stable one.
//! Markup changes, robot checks and rate limiting all degrade to "no record".

mod cover;
mod extract;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use urlencoding::encode;

use crate::errors::BookDataError;
use crate::models::{isbn13_to_isbn10, normalize_isbn, BookRecord, SourceTag};
use crate::provider::http::{build_browser_client, send_for_text, trim_base_url, REQUEST_TIMEOUT};
use crate::provider::{BookSource, EnrichmentSource};

pub use cover::{AmazonCoverClient, DEFAULT_CDN_URL};

/// Default site base URL
pub const DEFAULT_BASE_URL: &str = "https://www.amazon.co.jp";

const PROVIDER_ID: &str = "amazon";

/// Scrape-based enrichment source.
pub struct AmazonProvider {
    client: Client,
    base_url: String,
    covers: AmazonCoverClient,
}

impl AmazonProvider {
    pub fn new() -> Self {
        Self {
            client: build_browser_client(REQUEST_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            covers: AmazonCoverClient::new(),
        }
    }

    /// Point the provider, and its cover helper's title search, at a
    /// different site host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url);
        self.covers = self.covers.with_site_url(self.base_url.clone());
        self
    }

    /// Change the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_browser_client(timeout);
        self
    }

    /// Replace the cover helper used when a product page has no image.
    pub fn with_cover_client(mut self, covers: AmazonCoverClient) -> Self {
        self.covers = covers;
        self
    }

    /// Product page URL for an ISBN.
    fn product_url(&self, isbn: &str) -> String {
        format!("{}/dp/{}", self.base_url, product_id(isbn))
    }

    async fn get_page(&self, url: &str) -> Result<String, BookDataError> {
        let html = send_for_text(PROVIDER_ID, self.client.get(url)).await?;
        if extract::is_bot_check(&html) {
            return Err(BookDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        Ok(html)
    }

    /// Scrape the product page for `id` and key the record by `isbn`.
    async fn scrape_product(
        &self,
        id: &str,
        isbn: &str,
    ) -> Result<Option<BookRecord>, BookDataError> {
        let html = self.get_page(&self.product_url(id)).await?;
        let Some(mut book) = extract::parse_product_page(&html, isbn) else {
            debug!("No title or author on product page for {}", id);
            return Ok(None);
        };

        if book.cover_image_url.is_none() {
            book.cover_image_url = self.covers.cover_by_isbn(id).await;
        }
        Ok(Some(book))
    }
}

impl Default for AmazonProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookSource for AmazonProvider {
    fn id(&self) -> SourceTag {
        SourceTag::Amazon
    }

    async fn lookup(&self, isbn: &str) -> Result<Option<BookRecord>, BookDataError> {
        self.scrape_product(isbn, isbn).await
    }
}

#[async_trait]
impl EnrichmentSource for AmazonProvider {
    async fn lookup_by_title(
        &self,
        title: &str,
        author: Option<&str>,
        isbn: Option<&str>,
    ) -> Result<Option<BookRecord>, BookDataError> {
        let html = self
            .get_page(&search_url(&self.base_url, title, author))
            .await?;

        let ids = extract::extract_product_ids(&html);
        let preferred = isbn.map(extract::isbn_aliases).unwrap_or_default();
        let Some(id) = extract::pick_product_id(&ids, &preferred) else {
            debug!("No product identifiers in search results for '{}'", title);
            return Ok(None);
        };
        debug!(
            "Title search for '{}' picked {} of {} results",
            title,
            id,
            ids.len()
        );

        let key = isbn.map(normalize_isbn).unwrap_or_else(|| id.clone());
        let book = self.scrape_product(&id, &key).await?.map(|mut book| {
            if book.cover_image_url.is_none() {
                book.cover_image_url = extract::extract_cdn_image(&html);
            }
            book
        });
        Ok(book)
    }
}

/// Identifier the site uses for a book: the ISBN-10 when one exists.
fn product_id(isbn: &str) -> String {
    let isbn = normalize_isbn(isbn);
    isbn13_to_isbn10(&isbn).unwrap_or(isbn)
}

/// Book search URL for a title and optional author.
pub(crate) fn search_url(base_url: &str, title: &str, author: Option<&str>) -> String {
    let query = match author {
        Some(author) if !author.trim().is_empty() => format!("{} {}", title, author),
        _ => title.to_string(),
    };
    format!("{}/s?k={}&i=stripbooks", base_url, encode(&query))
}
