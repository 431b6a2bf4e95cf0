//! Google Books provider.
//!
//! Strong on foreign and older titles. Works without an API key, with a lower
//! daily quota; a key is sent as the `key` query parameter when configured.
//!
//! API documentation: https://developers.google.com/books/docs/v1/using

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::BookDataError;
use crate::models::{BookRecord, SourceTag};
use crate::provider::http::{build_client, send_for_text, trim_base_url, REQUEST_TIMEOUT};
use crate::provider::BookSource;

use models::VolumesResponse;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

const PROVIDER_ID: &str = "google_books";

/// Google Books bibliographic source.
pub struct GoogleBooksProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksProvider {
    /// Create a provider, optionally authenticated with an API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: build_client(REQUEST_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Point the provider at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    /// Change the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Query parameters for an ISBN lookup.
    fn query_params(&self, isbn: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", format!("isbn:{}", isbn))];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        params
    }
}

#[async_trait]
impl BookSource for GoogleBooksProvider {
    fn id(&self) -> SourceTag {
        SourceTag::GoogleBooks
    }

    async fn lookup(&self, isbn: &str) -> Result<Option<BookRecord>, BookDataError> {
        let request = self
            .client
            .get(format!("{}/volumes", self.base_url))
            .query(&self.query_params(isbn));

        let body = send_for_text(PROVIDER_ID, request).await?;
        parse_response(&body, isbn)
    }
}

/// Map the first volume of a `/volumes` response onto a record.
fn parse_response(body: &str, isbn: &str) -> Result<Option<BookRecord>, BookDataError> {
    let response: VolumesResponse = serde_json::from_str(body)
        .map_err(|e| BookDataError::parse(PROVIDER_ID, format!("Invalid response: {}", e)))?;

    if response.total_items == 0 {
        return Ok(None);
    }
    let Some(volume) = response.items.into_iter().next() else {
        return Ok(None);
    };

    let info = volume.volume_info;
    let mut book = BookRecord::new(isbn, SourceTag::GoogleBooks).authors(info.authors);
    if let Some(title) = info.title {
        book = book.title(title);
    }
    if let Some(publisher) = info.publisher {
        book = book.publisher(publisher);
    }
    if let Some(date) = info.published_date {
        book = book.published_date(date);
    }
    if let Some(description) = info.description {
        book = book.description(description);
    }
    book.page_count = info.page_count;
    if let Some(thumbnail) = info.image_links.and_then(|l| l.thumbnail) {
        book = book.cover_image_url(thumbnail);
    }

    Ok(Some(book))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_body() -> String {
        json!({
            "kind": "books#volumes",
            "totalItems": 1,
            "items": [{
                "kind": "books#volume",
                "id": "Wx1dLwEACAAJ",
                "volumeInfo": {
                    "title": "リーダブルコード",
                    "authors": ["Dustin Boswell", "Trevor Foucher"],
                    "publisher": "オライリー・ジャパン",
                    "publishedDate": "2012-06",
                    "description": "読みやすいコードを書くための実践的な方法",
                    "pageCount": 260,
                    "imageLinks": {
                        "smallThumbnail": "http://books.google.com/books/content?id=Wx1dLwEACAAJ&zoom=5",
                        "thumbnail": "http://books.google.com/books/content?id=Wx1dLwEACAAJ&zoom=1"
                    }
                }
            }]
        })
        .to_string()
    }

    #[test]
    fn test_parse_response_with_full_data() {
        let book = parse_response(&success_body(), "9784873115658")
            .unwrap()
            .unwrap();

        assert_eq!(book.isbn(), "9784873115658");
        assert_eq!(book.title.as_deref(), Some("リーダブルコード"));
        assert!(book
            .authors
            .as_ref()
            .unwrap()
            .contains(&"Dustin Boswell".to_string()));
        assert_eq!(book.publisher.as_deref(), Some("オライリー・ジャパン"));
        assert_eq!(book.published_date.as_deref(), Some("2012-06"));
        assert_eq!(book.page_count, Some(260));
        assert_eq!(
            book.cover_image_url.as_deref(),
            Some("http://books.google.com/books/content?id=Wx1dLwEACAAJ&zoom=1")
        );
        assert_eq!(book.source, SourceTag::GoogleBooks);
    }

    #[test]
    fn test_parse_response_with_no_items() {
        let body = json!({ "kind": "books#volumes", "totalItems": 0 }).to_string();
        assert!(parse_response(&body, "9999999999999").unwrap().is_none());

        let body = json!({ "totalItems": 3, "items": [] }).to_string();
        assert!(parse_response(&body, "9999999999999").unwrap().is_none());
    }

    #[test]
    fn test_parse_response_with_sparse_volume() {
        let body = json!({
            "totalItems": 1,
            "items": [{ "volumeInfo": { "title": "Only a title" } }]
        })
        .to_string();

        let book = parse_response(&body, "9784839974206").unwrap().unwrap();
        assert_eq!(book.title.as_deref(), Some("Only a title"));
        assert!(book.authors.is_none());
        assert!(book.page_count.is_none());
        assert!(book.cover_image_url.is_none());
    }

    #[test]
    fn test_parse_response_with_error_payload() {
        let err = parse_response("not json", "9784839974206").unwrap_err();
        assert!(matches!(err, BookDataError::Parse { .. }));
    }

    #[test]
    fn test_query_params_with_api_key() {
        let provider = GoogleBooksProvider::new(Some("test_api_key".to_string()));
        let params = provider.query_params("9784873115658");
        assert_eq!(
            params,
            vec![
                ("q", "isbn:9784873115658".to_string()),
                ("key", "test_api_key".to_string())
            ]
        );
    }

    #[test]
    fn test_query_params_without_api_key() {
        let provider = GoogleBooksProvider::new(Some("  ".to_string()));
        let params = provider.query_params("9784873115658");
        assert_eq!(params, vec![("q", "isbn:9784873115658".to_string())]);
    }
}
