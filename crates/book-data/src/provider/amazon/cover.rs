//! Cover-only lookups against the retail site's image CDN.

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::errors::BookDataError;
use crate::models::{isbn13_to_isbn10, normalize_isbn};
use crate::provider::http::{
    build_browser_client, build_client, send_for_text, trim_base_url, PROBE_TIMEOUT,
    REQUEST_TIMEOUT,
};

use super::extract::extract_cdn_image;
use super::{search_url, DEFAULT_BASE_URL, PROVIDER_ID};

/// Legacy image host that serves covers by ISBN-10.
pub const DEFAULT_CDN_URL: &str = "https://images-na.ssl-images-amazon.com";

/// Finds cover images without scraping a product page.
pub struct AmazonCoverClient {
    probe_client: Client,
    page_client: Client,
    cdn_url: String,
    base_url: String,
}

impl AmazonCoverClient {
    pub fn new() -> Self {
        Self {
            probe_client: build_client(PROBE_TIMEOUT),
            page_client: build_browser_client(REQUEST_TIMEOUT),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at different site and CDN hosts.
    pub fn with_urls(self, base_url: impl Into<String>, cdn_url: impl Into<String>) -> Self {
        let mut client = self.with_site_url(base_url);
        client.cdn_url = trim_base_url(cdn_url);
        client
    }

    /// Point title searches at a different site host.
    pub fn with_site_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    /// Direct image URL for an ISBN on the legacy CDN.
    ///
    /// A `978` ISBN-13 is converted to the ISBN-10 the CDN is keyed by.
    pub fn direct_cover_url(&self, isbn: &str) -> String {
        let isbn = normalize_isbn(isbn);
        let id = isbn13_to_isbn10(&isbn).unwrap_or(isbn);
        format!("{}/images/P/{}.09.LZZZZZZZ.jpg", self.cdn_url, id)
    }

    /// Probe the direct image URL for an ISBN; returned only when it exists.
    pub async fn cover_by_isbn(&self, isbn: &str) -> Option<String> {
        let url = self.direct_cover_url(isbn);
        match self.probe_client.head(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => Some(url),
            Ok(response) => {
                debug!("Cover probe {} returned {}", url, response.status());
                None
            }
            Err(e) => {
                debug!("Cover probe {} failed: {}", url, e);
                None
            }
        }
    }

    /// First CDN image on the search results for a title (and author).
    pub async fn cover_by_title(&self, title: &str, author: Option<&str>) -> Option<String> {
        match self.search_cover(title, author).await {
            Ok(cover) => cover,
            Err(e) => {
                debug!("Cover search for '{}' failed: {}", title, e);
                None
            }
        }
    }

    async fn search_cover(
        &self,
        title: &str,
        author: Option<&str>,
    ) -> Result<Option<String>, BookDataError> {
        let url = search_url(&self.base_url, title, author);
        let html = send_for_text(PROVIDER_ID, self.page_client.get(&url)).await?;
        Ok(extract_cdn_image(&html))
    }
}

impl Default for AmazonCoverClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::amazon::AmazonProvider;
    use crate::provider::http::test_server::{response, serve, with_body};

    #[test]
    fn test_direct_cover_url_uses_isbn10() {
        let client = AmazonCoverClient::new();
        assert_eq!(
            client.direct_cover_url("978-4-8399-7420-6"),
            "https://images-na.ssl-images-amazon.com/images/P/4839974209.09.LZZZZZZZ.jpg"
        );
    }

    #[test]
    fn test_provider_base_url_reaches_cover_client() {
        let provider = AmazonProvider::new().with_base_url("http://localhost:8080/");
        assert_eq!(provider.covers.base_url, "http://localhost:8080");
        assert_eq!(provider.covers.cdn_url, DEFAULT_CDN_URL);
    }

    #[tokio::test]
    async fn test_cover_by_title_uses_configured_site() {
        let page = r#"<div class="s-result-item"><img src="https://m.media-amazon.com/images/I/51abcDEF+1L._AC_UY218_.jpg"></div>"#;
        let base = serve(vec![("GET", with_body("200 OK", page))]).await;
        let client = AmazonCoverClient::new().with_site_url(base);

        assert_eq!(
            client.cover_by_title("リーダブルコード", None).await.as_deref(),
            Some("https://m.media-amazon.com/images/I/51abcDEF+1L._AC_UY218_.jpg")
        );
    }

    #[tokio::test]
    async fn test_cover_by_isbn_requires_ok_probe() {
        let cdn = serve(vec![("HEAD", with_body("404 Not Found", ""))]).await;
        let client = AmazonCoverClient::new().with_urls("http://localhost:1", cdn);
        assert!(client.cover_by_isbn("9784839974206").await.is_none());

        let cdn = serve(vec![("HEAD", response("200 OK", &[("Content-Length", "9000")], ""))]).await;
        let client = AmazonCoverClient::new().with_urls("http://localhost:1", cdn.clone());
        assert_eq!(
            client.cover_by_isbn("9784839974206").await,
            Some(format!("{}/images/P/4839974209.09.LZZZZZZZ.jpg", cdn))
        );
    }

    #[test]
    fn test_direct_cover_url_keeps_other_identifiers() {
        let client = AmazonCoverClient::new().with_urls("http://localhost:1", "http://cdn.local/");
        assert_eq!(
            client.direct_cover_url("4839974209"),
            "http://cdn.local/images/P/4839974209.09.LZZZZZZZ.jpg"
        );
    }
}
