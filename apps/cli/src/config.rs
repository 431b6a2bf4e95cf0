use std::time::Duration;

use shelfscan_book_data::provider::{amazon, google_books, openbd};

pub struct Config {
    pub google_books_api_key: Option<String>,
    pub openbd_url: String,
    pub google_books_url: String,
    pub amazon_url: String,
    pub http_timeout: Duration,
    pub verify_covers: bool,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let google_books_api_key = var("GOOGLE_BOOKS_API_KEY").filter(|k| !k.trim().is_empty());
        let openbd_url = var("SHELFSCAN_OPENBD_URL").unwrap_or_else(|| openbd::DEFAULT_BASE_URL.into());
        let google_books_url = var("SHELFSCAN_GOOGLE_BOOKS_URL")
            .unwrap_or_else(|| google_books::DEFAULT_BASE_URL.into());
        let amazon_url = var("SHELFSCAN_AMAZON_URL").unwrap_or_else(|| amazon::DEFAULT_BASE_URL.into());
        let timeout_secs: u64 = var("SHELFSCAN_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(10);
        let verify_covers = var("SHELFSCAN_VERIFY_COVERS")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);
        let log_format = var("SHELFSCAN_LOG_FORMAT").unwrap_or_else(|| "text".into());
        Self {
            google_books_api_key,
            openbd_url,
            google_books_url,
            amazon_url,
            http_timeout: Duration::from_secs(timeout_secs),
            verify_covers,
            log_format,
        }
    }
}
