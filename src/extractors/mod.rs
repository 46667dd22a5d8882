//! HTML extraction modules
//!
//! Each module provides extraction for a specific data source on the page.
//! Field-level cascades are built from these primitives as ordered lists of
//! [`Strategy`] values and run with [`first_match`].

mod css_extractor;
mod jsonld_extractor;
mod microdata_extractor;
mod opengraph_extractor;

pub use css_extractor::*;
pub use jsonld_extractor::*;
pub use microdata_extractor::*;
pub use opengraph_extractor::*;

use tracing::debug;

use crate::document::ListingDocument;

/// One candidate way of obtaining a value from a listing page
pub struct Strategy<T> {
    /// Short label used in logs
    pub name: &'static str,
    pub run: fn(&ListingDocument) -> Option<T>,
}

impl<T> Strategy<T> {
    pub const fn new(name: &'static str, run: fn(&ListingDocument) -> Option<T>) -> Self {
        Self { name, run }
    }
}

/// Values that count as "found"
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl<T> Present for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

/// Run strategies in order and return the first present value
pub fn first_match<T: Present>(
    doc: &ListingDocument,
    field: &str,
    strategies: &[Strategy<T>],
) -> Option<T> {
    for strategy in strategies {
        match (strategy.run)(doc) {
            Some(value) if value.is_present() => {
                debug!(field, strategy = strategy.name, "strategy matched");
                return Some(value);
            }
            _ => debug!(field, strategy = strategy.name, "strategy missed"),
        }
    }
    None
}

/// Collapse runs of whitespace into single spaces and trim
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `Some` only for text that is non-empty after cleaning
pub fn non_empty(text: &str) -> Option<String> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Give protocol-relative URLs an explicit scheme
pub fn absolutize_url(url: &str) -> String {
    let url = url.trim();
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none(_: &ListingDocument) -> Option<String> {
        None
    }

    fn blank(_: &ListingDocument) -> Option<String> {
        Some("   ".to_string())
    }

    fn heading(doc: &ListingDocument) -> Option<String> {
        select_first_text(doc.html(), "h1")
    }

    fn title(doc: &ListingDocument) -> Option<String> {
        select_first_text(doc.html(), "title")
    }

    #[test]
    fn test_first_match_skips_misses_and_blanks() {
        let doc = ListingDocument::parse(
            "<html><head><title>Title</title></head><body><h1>Heading</h1></body></html>",
        );
        let strategies = [
            Strategy::new("none", none),
            Strategy::new("blank", blank),
            Strategy::new("h1", heading),
            Strategy::new("title", title),
        ];

        assert_eq!(first_match(&doc, "name", &strategies), Some("Heading".to_string()));
    }

    #[test]
    fn test_first_match_exhausted() {
        let doc = ListingDocument::parse("<html><body></body></html>");
        let strategies = [Strategy::new("none", none), Strategy::new("h1", heading)];
        assert_eq!(first_match(&doc, "name", &strategies), None);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Video \n\t Player  "), "Video Player");
        assert_eq!(non_empty(" \n "), None);
    }

    #[test]
    fn test_absolutize_url() {
        assert_eq!(
            absolutize_url("//cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(absolutize_url("https://x/a.png"), "https://x/a.png");
    }
}
