use anyhow::{bail, Context};
use shelfscan_book_data::{isbn13_to_isbn10, normalize_isbn, validate_isbn, BookRecord};

use crate::config::Config;
use crate::main_lib::{build_cover_client, build_resolver};

pub async fn lookup(config: &Config, isbn: &str, no_cache: bool, json: bool) -> anyhow::Result<()> {
    if !validate_isbn(isbn) {
        bail!("Invalid ISBN: {}", isbn);
    }

    let resolver = build_resolver(config);
    let Some(book) = resolver.resolve(isbn, !no_cache).await else {
        bail!("No record found for ISBN {}", isbn);
    };

    if json {
        let body = serde_json::to_string_pretty(&*book).context("Failed to serialize record")?;
        println!("{}", body);
    } else {
        print!("{}", render_text(&book));
    }
    Ok(())
}

pub fn validate(codes: &[String]) -> anyhow::Result<()> {
    let mut invalid = 0;
    for code in codes {
        println!("{}", validation_line(code));
        if !validate_isbn(code) {
            invalid += 1;
        }
    }
    if invalid > 0 {
        bail!("{} of {} codes are not valid ISBNs", invalid, codes.len());
    }
    Ok(())
}

pub async fn cover(
    config: &Config,
    isbn: Option<&str>,
    title: Option<&str>,
    author: Option<&str>,
) -> anyhow::Result<()> {
    let client = build_cover_client(config);
    let url = match (isbn, title) {
        (Some(isbn), _) => client.cover_by_isbn(isbn).await,
        (None, Some(title)) => client.cover_by_title(title, author).await,
        (None, None) => bail!("Either --isbn or --title is required"),
    };

    match url {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => bail!("No cover found"),
    }
}

/// Human-readable rendering of a record, one field per line.
fn render_text(book: &BookRecord) -> String {
    let mut out = format!("ISBN:        {}\n", book.isbn());
    let mut line = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            out.push_str(&format!("{:<13}{}\n", label, value));
        }
    };

    line("Title:", book.title.clone());
    line("Authors:", book.authors.as_ref().map(|a| a.join(", ")));
    line("Publisher:", book.publisher.clone());
    line("Published:", book.published_date.clone());
    line("Pages:", book.page_count.map(|p| p.to_string()));
    line("Cover:", book.cover_image_url.clone());
    line("Description:", book.description.clone());
    line("Source:", Some(book.source.to_string()));
    out
}

fn validation_line(code: &str) -> String {
    let isbn = normalize_isbn(code);
    if !validate_isbn(&isbn) {
        return format!("{}\tinvalid", code);
    }
    match isbn13_to_isbn10(&isbn) {
        Some(isbn10) => format!("{}\tvalid\t{}", code, isbn10),
        None => format!("{}\tvalid", code),
    }
}
