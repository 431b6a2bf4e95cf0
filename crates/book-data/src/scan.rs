//! ISBN detection from barcode images.
//!
//! Decoding pixels is left to an [`IsbnDecoder`] implementation; this module
//! only decides which decoded payloads are book ISBNs.

use crate::models::{is_bookland_ean, normalize_isbn, validate_isbn};

/// Barcode symbologies reported by decoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    Code128,
    QrCode,
    Other,
}

/// One barcode found in an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedBarcode {
    pub symbology: Symbology,
    pub payload: String,
}

impl DecodedBarcode {
    pub fn new(symbology: Symbology, payload: impl Into<String>) -> Self {
        Self {
            symbology,
            payload: payload.into(),
        }
    }
}

/// Turns image bytes into the barcodes visible in them.
pub trait IsbnDecoder {
    /// Decode every barcode in `image`. Undecodable images yield nothing.
    fn decode(&self, image: &[u8]) -> Vec<DecodedBarcode>;
}

/// ISBNs found in an image, in first-seen order without duplicates.
///
/// Only EAN-13 barcodes with a `978`/`979` prefix and a valid checksum are
/// kept; this drops the price barcode printed next to the ISBN on Japanese
/// books.
pub fn detect_isbns(decoder: &dyn IsbnDecoder, image: &[u8]) -> Vec<String> {
    let mut isbns: Vec<String> = Vec::new();
    for barcode in decoder.decode(image) {
        if barcode.symbology != Symbology::Ean13 {
            continue;
        }
        let code = normalize_isbn(barcode.payload.trim());
        let is_isbn = code.len() == 13 && is_bookland_ean(&code) && validate_isbn(&code);
        if is_isbn && !isbns.contains(&code) {
            isbns.push(code);
        }
    }
    isbns
}
