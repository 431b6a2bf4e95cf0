//! Field extraction from amazon.co.jp markup.
//!
//! Every extractor is independent and returns `Option`: a selector or pattern
//! that no longer matches the page leaves only its own field empty. The page
//! structure is not a contract, so each field tries the structured DOM
//! location first and a looser pattern over the raw markup second.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{
    isbn13_to_isbn10, non_empty, normalize_authors, normalize_isbn, BookRecord, SourceTag,
};

/// Size token that asks the image CDN for its largest rendition.
const HIGH_RES_TOKEN: &str = "._SL1500_.";

/// Detail labels that carry the publisher.
const PUBLISHER_LABELS: &[&str] = &["出版社", "Publisher"];

/// Detail labels that carry the release date.
const DATE_LABELS: &[&str] = &["発売日", "出版日", "Publication date"];

lazy_static! {
    static ref TITLE_SELECTOR: Selector =
        Selector::parse("#productTitle, #ebooksProductTitle").expect("Invalid selector");
    static ref AUTHOR_SELECTOR: Selector =
        Selector::parse("#bylineInfo .author a, #bylineInfo .contributorNameID")
            .expect("Invalid selector");
    static ref DETAIL_SELECTOR: Selector = Selector::parse(
        "#detailBullets_feature_div li, #detail_bullets_id li, #productDetailsTable li, \
         #rpi-attribute-book_details-print_length, #rpi-attribute-book_details-publisher, \
         #rpi-attribute-book_details-publication_date"
    )
    .expect("Invalid selector");
    static ref COVER_SELECTOR: Selector =
        Selector::parse("#landingImage, #imgBlkFront, #ebooksImgBlkFront, #main-image")
            .expect("Invalid selector");
    static ref DESCRIPTION_SELECTOR: Selector = Selector::parse(
        "#bookDescription_feature_div noscript, #bookDescription_feature_div .a-expander-content, \
         #productDescription"
    )
    .expect("Invalid selector");

    static ref HTML_TITLE_REGEX: Regex =
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("Invalid regex pattern");
    static ref PAGES_REGEX: Regex =
        Regex::new(r"(?i)([0-9]{1,5})\s*(?:ページ|pages)").expect("Invalid regex pattern");
    static ref HIRES_JSON_REGEX: Regex =
        Regex::new(r#""hiRes"\s*:\s*"(https://[^"]+)""#).expect("Invalid regex pattern");
    static ref SIZE_TOKEN_REGEX: Regex =
        Regex::new(r"\._[A-Za-z0-9,_]+_\.").expect("Invalid regex pattern");
    static ref CDN_IMAGE_REGEX: Regex = Regex::new(
        r"https://m\.media-amazon\.com/images/I/[A-Za-z0-9_\-+%]+\._[A-Z0-9_,]+_\.jpg"
    )
    .expect("Invalid regex pattern");
    static ref PRODUCT_ID_REGEX: Regex = Regex::new(
        r#"(?:/dp/|/gp/product/|data-asin=")(978[0-9]{10}|[0-9]{9}[0-9X])(?:[^0-9A-Za-z]|$)"#
    )
    .expect("Invalid regex pattern");
    static ref DATE_SLASH_REGEX: Regex =
        Regex::new(r"([0-9]{4})/([0-9]{1,2})/([0-9]{1,2})").expect("Invalid regex pattern");
    static ref DATE_EN_REGEX: Regex =
        Regex::new(r"([A-Z][a-z]+ [0-9]{1,2}, [0-9]{4})").expect("Invalid regex pattern");
    static ref BOT_CHECK_REGEX: Regex =
        Regex::new(r"(?i)/errors/validateCaptcha|api-services-support@amazon").expect("Invalid regex pattern");
}

/// Whether the page is the robot check served instead of content.
pub(crate) fn is_bot_check(html: &str) -> bool {
    BOT_CHECK_REGEX.is_match(html)
}

/// Extract a record from a product page.
///
/// Returns `None` unless at least a title or an author was found.
pub(crate) fn parse_product_page(html: &str, isbn: &str) -> Option<BookRecord> {
    let document = Html::parse_document(html);
    let details = detail_lines(&document);

    let title = extract_title(&document, html);
    let authors = extract_authors(&document);
    if title.is_none() && authors.is_none() {
        return None;
    }

    let mut book = BookRecord::new(isbn, SourceTag::Amazon);
    book.title = title;
    book.authors = authors;
    book.publisher = extract_publisher(&details);
    book.published_date = extract_published_date(&details);
    book.page_count = extract_page_count(&details, html);
    book.cover_image_url = extract_cover(&document, html).map(|url| high_res_cover(&url));
    book.description = extract_description(&document);

    Some(book)
}

/// Product identifiers on a search results page, in page order, de-duplicated.
pub(crate) fn extract_product_ids(html: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for caps in PRODUCT_ID_REGEX.captures_iter(html) {
        let id = caps[1].to_string();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Pick the product to open from search results.
///
/// A result matching one of the `preferred` identifiers wins; otherwise the
/// first result.
pub(crate) fn pick_product_id(ids: &[String], preferred: &[String]) -> Option<String> {
    ids.iter()
        .find(|id| preferred.contains(id))
        .or_else(|| ids.first())
        .cloned()
}

/// First image on the page served from the product image CDN.
pub(crate) fn extract_cdn_image(html: &str) -> Option<String> {
    CDN_IMAGE_REGEX.find(html).map(|m| m.as_str().to_string())
}

/// Swap the rendition size token of a CDN image URL for the largest one.
///
/// URLs without a size token are returned unchanged.
pub(crate) fn high_res_cover(url: &str) -> String {
    SIZE_TOKEN_REGEX.replace(url, HIGH_RES_TOKEN).into_owned()
}

fn extract_title(document: &Html, html: &str) -> Option<String> {
    let from_dom = document
        .select(&TITLE_SELECTOR)
        .map(element_text)
        .find_map(non_empty);
    if from_dom.is_some() {
        return from_dom;
    }

    // "<title>Book title | Author | 本 | 通販 | Amazon</title>"
    let raw = HTML_TITLE_REGEX.captures(html)?.get(1)?.as_str();
    let first = collapse_whitespace(raw.split('|').next()?);
    let first = first
        .trim_start_matches("Amazon.co.jp:")
        .trim_start_matches("Amazon.co.jp：")
        .trim();
    if first.starts_with("Amazon") {
        return None;
    }
    non_empty(first.to_string())
}

fn extract_authors(document: &Html) -> Option<Vec<String>> {
    let mut authors: Vec<String> = Vec::new();
    for name in document.select(&AUTHOR_SELECTOR).map(element_text) {
        if !name.is_empty() && !authors.contains(&name) {
            authors.push(name);
        }
    }
    normalize_authors(authors)
}

fn extract_publisher(details: &[String]) -> Option<String> {
    let value = labeled_value(details, PUBLISHER_LABELS)?;
    // "オライリージャパン; 第1版 (2012/6/23)"
    let name = value.split([';', '(', '（']).next().unwrap_or_default();
    non_empty(name.trim().to_string())
}

fn extract_published_date(details: &[String]) -> Option<String> {
    if let Some(date) = labeled_value(details, DATE_LABELS).and_then(|v| parse_date(&v)) {
        return Some(date);
    }
    // Older layouts put the date in parentheses after the publisher
    labeled_value(details, PUBLISHER_LABELS).and_then(|v| parse_date(&v))
}

fn extract_page_count(details: &[String], html: &str) -> Option<u32> {
    details
        .iter()
        .find_map(|line| parse_pages(line))
        .or_else(|| parse_pages(html))
}

fn extract_cover(document: &Html, html: &str) -> Option<String> {
    for element in document.select(&COVER_SELECTOR) {
        let value = element.value();
        let candidate = value
            .attr("data-old-hires")
            .filter(|s| s.starts_with("http"))
            .or_else(|| value.attr("src").filter(|s| s.starts_with("http")));
        if let Some(url) = candidate {
            return Some(url.to_string());
        }
    }

    HIRES_JSON_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| extract_cdn_image(html))
}

fn extract_description(document: &Html) -> Option<String> {
    document
        .select(&DESCRIPTION_SELECTOR)
        .map(|element| {
            let text = element_text(element);
            // noscript bodies come through as unparsed markup
            if text.contains('<') {
                let fragment = Html::parse_fragment(&text);
                collapse_whitespace(&fragment.root_element().text().collect::<String>())
            } else {
                text
            }
        })
        .find_map(non_empty)
}

/// Normalized text of each product detail entry.
fn detail_lines(document: &Html) -> Vec<String> {
    document
        .select(&DETAIL_SELECTOR)
        .map(element_text)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Value of the first "label : value" detail line whose label matches.
fn labeled_value(details: &[String], labels: &[&str]) -> Option<String> {
    details.iter().find_map(|line| {
        let (label, value) = line.split_once(':').or_else(|| line.split_once('：'))?;
        let label = label.trim();
        if labels.iter().any(|l| label.starts_with(l)) {
            non_empty(value.trim().to_string())
        } else {
            None
        }
    })
}

fn parse_pages(text: &str) -> Option<u32> {
    PAGES_REGEX
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .filter(|pages| *pages > 0)
}

/// Parse "2012/6/23" or "June 23, 2012" into `YYYY-MM-DD`.
fn parse_date(text: &str) -> Option<String> {
    if let Some(caps) = DATE_SLASH_REGEX.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return Some(date.format("%Y-%m-%d").to_string());
    }

    let caps = DATE_EN_REGEX.captures(text)?;
    NaiveDate::parse_from_str(&caps[1], "%B %d, %Y")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapse runs of whitespace and drop the bidi marks Amazon puts around
/// detail labels.
fn collapse_whitespace(text: &str) -> String {
    text.replace(['\u{200e}', '\u{200f}'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identifiers a search result may carry for a known ISBN.
pub(crate) fn isbn_aliases(isbn: &str) -> Vec<String> {
    let isbn = normalize_isbn(isbn);
    let mut aliases = Vec::new();
    if let Some(isbn10) = isbn13_to_isbn10(&isbn) {
        aliases.push(isbn10);
    }
    aliases.push(isbn);
    aliases
}
