//! Error types for the book data crate.
//!
//! Adapters use [`BookDataError`] internally so request plumbing can use `?`.
//! The [`BookSource`](crate::provider::BookSource) boundary logs the error and
//! turns it into "no record", so none of these reach callers of the resolver.

use thiserror::Error;

/// Errors that can occur while talking to a book metadata provider.
#[derive(Error, Debug)]
pub enum BookDataError {
    /// The provider answered, but has no entry for the ISBN.
    #[error("Book not found: {0}")]
    NotFound(String),

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429 / 503).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A provider-specific error occurred, e.g. a non-success status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// Error message or HTTP status
        message: String,
    },

    /// The provider returned a payload of an unexpected shape.
    #[error("Parse error: {provider} - {message}")]
    Parse {
        /// The provider whose payload failed to parse
        provider: String,
        /// Description of the parse failure
        message: String,
    },

    /// The record publisher rejected the record.
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl BookDataError {
    /// Classify a reqwest error from a given provider.
    pub(crate) fn from_request(provider: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::ProviderError {
                provider: provider.to_string(),
                message: format!("Request failed: {}", error),
            }
        }
    }

    /// Build a parse error for a provider.
    pub(crate) fn parse(provider: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Whether this error means "the provider simply has nothing", as opposed
    /// to a failure worth a warning.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BookDataError::NotFound("9784839974206".to_string());
        assert_eq!(format!("{}", error), "Book not found: 9784839974206");

        let error = BookDataError::RateLimited {
            provider: "amazon".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: amazon");

        let error = BookDataError::ProviderError {
            provider: "google_books".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: google_books - HTTP 500"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(BookDataError::NotFound("x".to_string()).is_not_found());
        assert!(!BookDataError::parse("openbd", "bad json").is_not_found());
        assert!(!BookDataError::PublishFailed("denied".to_string()).is_not_found());
    }
}
