//! Shared HTTP plumbing for the adapters.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, StatusCode};
use tracing::debug;

use crate::errors::BookDataError;

/// Default timeout for API and page requests
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for lightweight image probes
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Desktop browser user agent sent with scrape requests.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Build a client with the given timeout.
pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Build a client that looks like a desktop browser to the retail site.
pub(crate) fn build_browser_client(timeout: Duration) -> Client {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("ja-JP,ja;q=0.9,en;q=0.8"),
    );

    Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send a request and return the body of a successful response.
///
/// 404 maps to [`BookDataError::NotFound`], 429/503 to `RateLimited`, any
/// other non-success status to `ProviderError`.
pub(crate) async fn send_for_text(
    provider: &str,
    request: RequestBuilder,
) -> Result<String, BookDataError> {
    let response = request
        .send()
        .await
        .map_err(|e| BookDataError::from_request(provider, e))?;

    let status = response.status();
    debug!("{} responded with {}", provider, status);

    match status {
        StatusCode::NOT_FOUND => {
            return Err(BookDataError::NotFound(response.url().to_string()));
        }
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            return Err(BookDataError::RateLimited {
                provider: provider.to_string(),
            });
        }
        s if !s.is_success() => {
            return Err(BookDataError::ProviderError {
                provider: provider.to_string(),
                message: format!("HTTP {}", s),
            });
        }
        _ => {}
    }

    Ok(response.text().await?)
}

/// Trim a configured base URL so paths can be appended with `/`.
pub(crate) fn trim_base_url(url: impl Into<String>) -> String {
    let url = url.into();
    url.trim_end_matches('/').to_string()
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::test_server::{serve, with_body};

    async fn send_to(status: &str, body: &str) -> Result<String, BookDataError> {
        let base = serve(vec![("GET", with_body(status, body))]).await;
        let client = build_client(REQUEST_TIMEOUT);
        send_for_text("openbd", client.get(format!("{}/get", base))).await
    }

    #[tokio::test]
    async fn test_send_for_text_returns_success_body() {
        assert_eq!(send_to("200 OK", "[null]").await.unwrap(), "[null]");
    }

    #[tokio::test]
    async fn test_send_for_text_maps_statuses() {
        let err = send_to("404 Not Found", "").await.unwrap_err();
        assert!(err.is_not_found());

        let err = send_to("429 Too Many Requests", "").await.unwrap_err();
        assert!(matches!(err, BookDataError::RateLimited { ref provider } if provider == "openbd"));

        let err = send_to("503 Service Unavailable", "").await.unwrap_err();
        assert!(matches!(err, BookDataError::RateLimited { .. }));

        let err = send_to("500 Internal Server Error", "oops").await.unwrap_err();
        match err {
            BookDataError::ProviderError { provider, message } => {
                assert_eq!(provider, "openbd");
                assert_eq!(message, "HTTP 500 Internal Server Error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_trim_base_url() {
        assert_eq!(
            trim_base_url("https://api.openbd.jp/v1/"),
            "https://api.openbd.jp/v1"
        );
        assert_eq!(
            trim_base_url("https://www.amazon.co.jp"),
            "https://www.amazon.co.jp"
        );
    }
}
