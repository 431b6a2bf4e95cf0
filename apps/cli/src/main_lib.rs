use std::sync::Arc;

use shelfscan_book_data::provider::amazon::DEFAULT_CDN_URL;
use shelfscan_book_data::{
    AmazonCoverClient, AmazonProvider, BookResolver, CoverCheck, GoogleBooksProvider,
    ImageUrlValidator, OpenBdProvider,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

pub fn build_cover_client(config: &Config) -> AmazonCoverClient {
    AmazonCoverClient::new().with_urls(&config.amazon_url, DEFAULT_CDN_URL)
}

pub fn build_resolver(config: &Config) -> BookResolver {
    let amazon = AmazonProvider::new()
        .with_base_url(&config.amazon_url)
        .with_timeout(config.http_timeout)
        .with_cover_client(build_cover_client(config));
    let google = GoogleBooksProvider::new(config.google_books_api_key.clone())
        .with_base_url(&config.google_books_url)
        .with_timeout(config.http_timeout);
    let openbd = OpenBdProvider::with_base_url(&config.openbd_url).with_timeout(config.http_timeout);

    let covers: Arc<dyn CoverCheck> = if config.verify_covers {
        Arc::new(ImageUrlValidator::new())
    } else {
        Arc::new(ImageUrlValidator::extension_only())
    };

    tracing::debug!(
        "Sources: amazon={} google_books={} openbd={} (timeout {:?}, verify covers: {})",
        config.amazon_url,
        config.google_books_url,
        config.openbd_url,
        config.http_timeout,
        config.verify_covers
    );

    BookResolver::new(Arc::new(amazon), Arc::new(google), Arc::new(openbd), covers)
}
