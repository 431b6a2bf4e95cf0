//! ISBN resolution across all sources.

mod engine;
mod merge;

pub use engine::BookResolver;
pub use merge::fill_if_absent;
