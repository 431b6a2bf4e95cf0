//! Book metadata provider abstractions and implementations.
//!
//! This module contains:
//! - The `BookSource` trait every provider implements, and `EnrichmentSource`
//!   for providers that can also search by title
//! - Concrete providers: openBD, Google Books and the amazon.co.jp scrape
//!
//! Providers never fail loudly: `fetch` converts every transport, status and
//! payload error into "no record" after logging it.

pub(crate) mod http;
mod traits;

pub mod amazon;
pub mod google_books;
pub mod openbd;

pub use http::{PROBE_TIMEOUT, REQUEST_TIMEOUT};
pub use traits::{BookSource, EnrichmentSource};
