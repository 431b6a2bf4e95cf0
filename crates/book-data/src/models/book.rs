use std::fmt;

use serde::{Deserialize, Serialize};

/// Adapter that supplied the base part of a [`BookRecord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    #[serde(rename = "openbd")]
    OpenBd,
    GoogleBooks,
    Amazon,
    #[default]
    Unknown,
}

impl SourceTag {
    /// Wire name of the tag ("openbd", "google_books", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenBd => "openbd",
            Self::GoogleBooks => "google_books",
            Self::Amazon => "amazon",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified book record assembled from one or more providers.
///
/// The ISBN is fixed at construction. All other fields are optional and are
/// only ever filled while absent, see [`crate::resolver::fill_if_absent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    isbn: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Authors in credit order. Never `Some(vec![])`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// `YYYY-MM-DD`, with `01` standing in for unknown month/day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    pub source: SourceTag,
}

impl BookRecord {
    /// Create an empty record for an ISBN.
    pub fn new(isbn: impl Into<String>, source: SourceTag) -> Self {
        Self {
            isbn: isbn.into(),
            title: None,
            authors: None,
            publisher: None,
            published_date: None,
            page_count: None,
            description: None,
            cover_image_url: None,
            source,
        }
    }

    /// The lookup key this record was created for.
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// First credited author, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.authors
            .as_ref()
            .and_then(|a| a.first())
            .map(String::as_str)
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title.into());
        self
    }

    /// Set the authors. An empty list leaves the field absent.
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = normalize_authors(authors.into_iter().map(Into::into).collect());
        self
    }

    /// Set the publisher
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = non_empty(publisher.into());
        self
    }

    /// Set the published date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.published_date = non_empty(date.into());
        self
    }

    /// Set the page count
    pub fn page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description.into());
        self
    }

    /// Set the cover image URL
    pub fn cover_image_url(mut self, url: impl Into<String>) -> Self {
        self.cover_image_url = non_empty(url.into());
        self
    }
}

/// Trim a string and drop it if nothing is left.
pub(crate) fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Drop blank author names, and the whole list if it ends up empty.
pub(crate) fn normalize_authors(authors: Vec<String>) -> Option<Vec<String>> {
    let authors: Vec<String> = authors.into_iter().filter_map(non_empty).collect();
    if authors.is_empty() {
        None
    } else {
        Some(authors)
    }
}
