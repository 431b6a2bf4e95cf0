//! ISBN normalization and checksum validation.

/// EAN prefixes reserved for books ("Bookland").
const BOOKLAND_PREFIXES: &[&str] = &["978", "979"];

/// Strip hyphens and spaces from an ISBN as printed on a book.
pub fn normalize_isbn(code: &str) -> String {
    code.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// Validate an ISBN-10 or ISBN-13 checksum.
///
/// Hyphens and spaces are ignored. Any length other than 10 or 13 is invalid.
pub fn validate_isbn(code: &str) -> bool {
    let code = normalize_isbn(code);
    match code.len() {
        13 => validate_isbn13(&code),
        10 => validate_isbn10(&code),
        _ => false,
    }
}

/// Whether a 13-digit code carries a Bookland prefix.
pub fn is_bookland_ean(code: &str) -> bool {
    BOOKLAND_PREFIXES.iter().any(|p| code.starts_with(p))
}

/// Convert a valid `978`-prefixed ISBN-13 to its ISBN-10 form.
///
/// `979` codes have no ISBN-10 equivalent and yield `None`.
pub fn isbn13_to_isbn10(code: &str) -> Option<String> {
    let code = normalize_isbn(code);
    if code.len() != 13 || !code.starts_with("978") || !validate_isbn13(&code) {
        return None;
    }

    let body = &code[3..12];
    let sum: u32 = body
        .bytes()
        .zip((2..=10).rev())
        .map(|(b, weight)| u32::from(b - b'0') * weight)
        .sum();
    let check = (11 - sum % 11) % 11;
    let check = if check == 10 {
        'X'
    } else {
        char::from(b'0' + check as u8)
    };

    Some(format!("{}{}", body, check))
}

fn validate_isbn13(isbn: &str) -> bool {
    if isbn.len() != 13 || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = isbn.bytes().map(|b| u32::from(b - b'0')).collect();
    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();

    (10 - sum % 10) % 10 == digits[12]
}

fn validate_isbn10(isbn: &str) -> bool {
    if isbn.len() != 10 {
        return false;
    }

    let bytes = isbn.as_bytes();
    let mut sum = 0u32;
    for (i, b) in bytes[..9].iter().enumerate() {
        if !b.is_ascii_digit() {
            return false;
        }
        sum += u32::from(b - b'0') * (10 - i as u32);
    }

    sum += match bytes[9] {
        b'X' => 10,
        b if b.is_ascii_digit() => u32::from(b - b'0'),
        _ => return false,
    };

    sum % 11 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_isbn13_checksum_valid() {
        assert!(validate_isbn("9784839974206"));
        assert!(validate_isbn("9784873115658"));
    }

    #[test]
    fn test_validate_isbn13_checksum_invalid() {
        assert!(!validate_isbn("9784839974207"));
    }

    #[test]
    fn test_validate_isbn10_checksum_valid() {
        assert!(validate_isbn("4839974209"));
        assert!(validate_isbn("080442957X"));
    }

    #[test]
    fn test_validate_isbn10_checksum_invalid() {
        assert!(!validate_isbn("4839974208"));
    }

    #[test]
    fn test_validate_isbn_wrong_length() {
        assert!(!validate_isbn("123456789"));
        assert!(!validate_isbn(""));
    }

    #[test]
    fn test_validate_isbn_ignores_hyphens_and_spaces() {
        assert!(validate_isbn("978-4-8399-7420-6"));
        assert!(validate_isbn("4 8399 7420 9"));
    }

    #[test]
    fn test_validate_isbn_rejects_non_digits() {
        assert!(!validate_isbn("978483997420X"));
        assert!(!validate_isbn("48399742X9"));
        assert!(!validate_isbn("483997420x"));
        // Non-ASCII input must not panic on byte slicing
        assert!(!validate_isbn("９７８４８３９９７４２０６"));
    }

    #[test]
    fn test_is_bookland_ean() {
        assert!(is_bookland_ean("9784839974206"));
        assert!(is_bookland_ean("9791032300824"));
        assert!(!is_bookland_ean("4901234567894"));
    }

    #[test]
    fn test_isbn13_to_isbn10() {
        assert_eq!(
            isbn13_to_isbn10("9784839974206").as_deref(),
            Some("4839974209")
        );
        assert_eq!(
            isbn13_to_isbn10("9780804429573").as_deref(),
            Some("080442957X")
        );
        assert_eq!(isbn13_to_isbn10("9791032300824"), None);
        assert_eq!(isbn13_to_isbn10("9784839974207"), None);
    }
}
