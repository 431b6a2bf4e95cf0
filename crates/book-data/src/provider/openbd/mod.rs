//! openBD provider.
//!
//! openBD is a free Japanese bibliographic database keyed by ISBN. It has the
//! best coverage for domestic titles and carries ONIX detail (page extent,
//! descriptive text) that other sources often lack.
//!
//! API documentation: https://openbd.jp/

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::BookDataError;
use crate::models::{BookRecord, SourceTag};
use crate::provider::http::{build_client, send_for_text, trim_base_url, REQUEST_TIMEOUT};
use crate::provider::BookSource;

use models::OpenBdItem;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openbd.jp/v1";

const PROVIDER_ID: &str = "openbd";

/// ONIX extent unit code for pages. The last parsable entry wins.
const EXTENT_UNIT_PAGES: &str = "03";

/// openBD bibliographic source.
pub struct OpenBdProvider {
    client: Client,
    base_url: String,
}

impl OpenBdProvider {
    /// Create a provider against the public openBD API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider against a different base URL (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: build_client(REQUEST_TIMEOUT),
            base_url: trim_base_url(base_url),
        }
    }

    /// Change the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }
}

impl Default for OpenBdProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookSource for OpenBdProvider {
    fn id(&self) -> SourceTag {
        SourceTag::OpenBd
    }

    async fn lookup(&self, isbn: &str) -> Result<Option<BookRecord>, BookDataError> {
        let request = self
            .client
            .get(format!("{}/get", self.base_url))
            .query(&[("isbn", isbn)]);

        let body = send_for_text(PROVIDER_ID, request).await?;
        parse_response(&body, isbn)
    }
}

/// Parse a `/get` response body for a single ISBN.
fn parse_response(body: &str, isbn: &str) -> Result<Option<BookRecord>, BookDataError> {
    let items: Vec<Option<OpenBdItem>> = serde_json::from_str(body)
        .map_err(|e| BookDataError::parse(PROVIDER_ID, format!("Invalid response: {}", e)))?;

    Ok(items
        .into_iter()
        .next()
        .flatten()
        .map(|item| parse_item(item, isbn)))
}

/// Map one openBD entry onto a record.
fn parse_item(item: OpenBdItem, requested_isbn: &str) -> BookRecord {
    let summary = item.summary;

    // Keyed by the lookup ISBN, which may be the ISBN-10 form of summary.isbn
    let mut book = BookRecord::new(requested_isbn, SourceTag::OpenBd);
    if let Some(title) = summary.title {
        book = book.title(title);
    }
    if let Some(author) = summary.author {
        book = book.authors([author]);
    }
    if let Some(publisher) = summary.publisher {
        book = book.publisher(publisher);
    }
    book.published_date = summary.pubdate.as_deref().and_then(parse_pubdate);
    if let Some(cover) = summary.cover {
        book = book.cover_image_url(cover);
    }

    book.page_count = item
        .onix
        .descriptive_detail
        .extent
        .iter()
        .rev()
        .filter(|e| e.extent_unit.as_deref() == Some(EXTENT_UNIT_PAGES))
        .find_map(|e| e.extent_value.as_ref().and_then(|v| v.as_u32()));

    if let Some(text) = item
        .onix
        .collateral_detail
        .text_content
        .into_iter()
        .next()
        .and_then(|c| c.text)
    {
        book = book.description(text);
    }

    book
}

/// Parse an openBD `pubdate` by length: `YYYYMMDD`, `YYYYMM` or `YYYY`.
///
/// Missing month and day become `01`. Any other shape yields `None`.
fn parse_pubdate(pubdate: &str) -> Option<String> {
    let pubdate = pubdate.trim();
    if !pubdate.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match pubdate.len() {
        8 => Some(format!(
            "{}-{}-{}",
            &pubdate[0..4],
            &pubdate[4..6],
            &pubdate[6..8]
        )),
        6 => Some(format!("{}-{}-01", &pubdate[0..4], &pubdate[4..6])),
        4 => Some(format!("{}-01-01", pubdate)),
        _ => None,
    }
}
