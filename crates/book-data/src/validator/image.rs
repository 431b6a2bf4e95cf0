//! Cover image URL validation.
//!
//! Providers hand out cover URLs that are not always usable: Google Books
//! thumbnails without a file extension, blank placeholder GIFs served with
//! status 200, dead links. This heuristic decides whether a URL is worth
//! keeping:
//! - the URL must mention an image file extension
//! - optionally, the image must exist and be larger than a placeholder

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::debug;

use crate::provider::http::{build_client, PROBE_TIMEOUT};

/// Extensions that mark a URL as an image. Matched anywhere in the URL so
/// query strings after the file name are tolerated.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// Images smaller than this are treated as placeholders.
pub const MIN_IMAGE_BYTES: u64 = 500;

/// Bytes requested by the partial GET fallback.
const PROBE_RANGE: &str = "bytes=0-1023";

/// Something that can tell whether a cover URL is usable.
#[async_trait]
pub trait CoverCheck: Send + Sync {
    async fn is_valid_cover(&self, url: &str) -> bool;
}

/// Whether a URL names an image file.
pub fn has_image_extension(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| url.contains(ext))
}

/// Heuristic cover URL validator.
pub struct ImageUrlValidator {
    client: Client,
    check_exists: bool,
}

impl ImageUrlValidator {
    /// Validator that probes the network to confirm the image exists.
    pub fn new() -> Self {
        Self {
            client: build_client(PROBE_TIMEOUT),
            check_exists: true,
        }
    }

    /// Validator that only checks the URL's shape.
    pub fn extension_only() -> Self {
        Self {
            check_exists: false,
            ..Self::new()
        }
    }

    /// Decide whether `url` is likely a real, non-placeholder image.
    ///
    /// Network failures during the existence check fall back to the
    /// extension-only verdict.
    pub async fn is_likely_valid_image(&self, url: Option<&str>, check_exists: bool) -> bool {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return false;
        };
        if !has_image_extension(url) {
            return false;
        }
        if !check_exists {
            return true;
        }

        match self.probe(url).await {
            Ok(verdict) => verdict,
            Err(e) => {
                debug!("Image probe for {} failed, keeping extension verdict: {}", url, e);
                true
            }
        }
    }

    /// HEAD the URL, falling back to a ranged GET when no length is reported.
    async fn probe(&self, url: &str) -> Result<bool, reqwest::Error> {
        let response = self.client.head(url).send().await?;
        if response.status() != StatusCode::OK {
            debug!("Image {} returned {}", url, response.status());
            return Ok(false);
        }

        if let Some(length) = content_length(response.headers()) {
            return Ok(length >= MIN_IMAGE_BYTES);
        }

        let mut response = self
            .client
            .get(url)
            .header(header::RANGE, PROBE_RANGE)
            .send()
            .await?;
        let chunk = response.chunk().await?;
        let size = chunk.map(|c| c.len() as u64).unwrap_or(0);
        Ok(size >= MIN_IMAGE_BYTES)
    }
}

impl Default for ImageUrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoverCheck for ImageUrlValidator {
    async fn is_valid_cover(&self, url: &str) -> bool {
        self.is_likely_valid_image(Some(url), self.check_exists)
            .await
    }
}

fn content_length(headers: &header::HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
