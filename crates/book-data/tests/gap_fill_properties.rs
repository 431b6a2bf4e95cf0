//! Property-based integration tests for gap-fill merging.
//!
//! Whatever the sources return, a field that the base record already carries
//! must come out of resolution unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use shelfscan_book_data::{
    fill_if_absent, BookDataError, BookRecord, BookResolver, BookSource, CoverCheck,
    EnrichmentSource, SourceTag,
};

const ISBN: &str = "9784839974206";

// =============================================================================
// Test doubles
// =============================================================================

struct FixedSource {
    tag: SourceTag,
    record: Option<BookRecord>,
    by_title: Option<BookRecord>,
}

#[async_trait]
impl BookSource for FixedSource {
    fn id(&self) -> SourceTag {
        self.tag
    }

    async fn lookup(&self, _isbn: &str) -> Result<Option<BookRecord>, BookDataError> {
        Ok(self.record.clone())
    }
}

#[async_trait]
impl EnrichmentSource for FixedSource {
    async fn lookup_by_title(
        &self,
        _title: &str,
        _author: Option<&str>,
        _isbn: Option<&str>,
    ) -> Result<Option<BookRecord>, BookDataError> {
        Ok(self.by_title.clone())
    }
}

struct AcceptAll;

#[async_trait]
impl CoverCheck for AcceptAll {
    async fn is_valid_cover(&self, _url: &str) -> bool {
        true
    }
}

// =============================================================================
// Generators
// =============================================================================

fn arb_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z][a-zA-Z ]{0,19}")
}

fn arb_cover() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("https://example\\.com/[a-z]{1,8}\\.jpg")
}

/// Generates a record with an arbitrary subset of fields present.
fn arb_record(tag: SourceTag) -> impl Strategy<Value = BookRecord> {
    (
        arb_text(),                           // title
        proptest::option::of(arb_text()),     // single author
        arb_text(),                           // publisher
        proptest::option::of("[0-9]{4}-[0-9]{2}-[0-9]{2}"),
        proptest::option::of(1u32..5000),     // page_count
        arb_text(),                           // description
        arb_cover(),
    )
        .prop_map(
            move |(title, author, publisher, date, pages, description, cover)| {
                let mut book = BookRecord::new(ISBN, tag);
                book.title = title;
                book.authors = author.flatten().map(|a| vec![a]);
                book.publisher = publisher;
                book.published_date = date;
                book.page_count = pages;
                book.description = description;
                book.cover_image_url = cover;
                book
            },
        )
}

fn present_fields_unchanged(before: &BookRecord, after: &BookRecord) -> bool {
    fn kept<T: PartialEq>(before: &Option<T>, after: &Option<T>) -> bool {
        before.is_none() || before == after
    }

    kept(&before.title, &after.title)
        && kept(&before.authors, &after.authors)
        && kept(&before.publisher, &after.publisher)
        && kept(&before.published_date, &after.published_date)
        && kept(&before.page_count, &after.page_count)
        && kept(&before.description, &after.description)
        && kept(&before.cover_image_url, &after.cover_image_url)
}

fn resolve(
    amazon_by_title: Option<BookRecord>,
    google: Option<BookRecord>,
    openbd: Option<BookRecord>,
) -> Option<BookRecord> {
    let resolver = BookResolver::new(
        Arc::new(FixedSource {
            tag: SourceTag::Amazon,
            record: None,
            by_title: amazon_by_title,
        }),
        Arc::new(FixedSource {
            tag: SourceTag::GoogleBooks,
            record: google,
            by_title: None,
        }),
        Arc::new(FixedSource {
            tag: SourceTag::OpenBd,
            record: openbd,
            by_title: None,
        }),
        Arc::new(AcceptAll),
    );

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime
        .block_on(resolver.resolve(ISBN, false))
        .map(|book| (*book).clone())
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A filled slot keeps its value; an empty one takes the candidate.
    #[test]
    fn prop_fill_if_absent_only_fills_empty_slots(
        slot in proptest::option::of(any::<u32>()),
        candidate in proptest::option::of(any::<u32>()),
    ) {
        let mut merged = slot;
        let filled = fill_if_absent(&mut merged, candidate);

        match slot {
            Some(value) => {
                prop_assert!(!filled);
                prop_assert_eq!(merged, Some(value));
            }
            None => {
                prop_assert_eq!(filled, candidate.is_some());
                prop_assert_eq!(merged, candidate);
            }
        }
    }

    /// Backfill from the primary source and the title search never touches a
    /// field the secondary record already has.
    #[test]
    fn prop_secondary_record_fields_survive_backfill(
        google in arb_record(SourceTag::GoogleBooks),
        openbd in proptest::option::of(arb_record(SourceTag::OpenBd)),
        by_title in proptest::option::of(arb_record(SourceTag::Amazon)),
    ) {
        let resolved = resolve(by_title, Some(google.clone()), openbd).unwrap();

        prop_assert_eq!(resolved.source, SourceTag::GoogleBooks);
        prop_assert_eq!(resolved.isbn(), ISBN);
        prop_assert!(present_fields_unchanged(&google, &resolved));
    }

    /// A primary-only record keeps every field it has through enrichment.
    #[test]
    fn prop_primary_record_fields_survive_enrichment(
        openbd in arb_record(SourceTag::OpenBd),
        by_title in proptest::option::of(arb_record(SourceTag::Amazon)),
    ) {
        let resolved = resolve(by_title, None, Some(openbd.clone())).unwrap();

        prop_assert_eq!(resolved.source, SourceTag::OpenBd);
        prop_assert!(present_fields_unchanged(&openbd, &resolved));
    }
}
