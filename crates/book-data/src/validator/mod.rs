//! Data validation.
//!
//! Currently only cover image URLs need checking; bibliographic fields are
//! taken from providers as-is.

mod image;

pub use image::{has_image_extension, CoverCheck, ImageUrlValidator, MIN_IMAGE_BYTES};
