//! Screenshot list extraction
//!
//! Tries known gallery selectors first, then scans every image on the page
//! with a URL heuristic, then the structured-data `screenshot` property.
//! The image heuristic depends on the host's URL size parameters and is the
//! part most likely to go quiet when the page markup changes.

use std::collections::HashSet;

use crate::document::ListingDocument;
use crate::extractors::{
    first_match, select_image_urls, structured_urls, structured_value, Strategy,
};

/// Gallery selectors from current and earlier page layouts, in preference order
pub const GALLERY_SELECTORS: &[&str] = &[
    r#"img[itemprop="screenshot"]"#,
    "[data-screenshot-item-index] img",
    "div.ULeU3b img",
    "button.NIc6yf img",
];

/// URL marker for images that are screenshots by name
pub const SCREENSHOT_MARKER: &str = "screenshot";

/// Size parameter the image host uses for landscape gallery renditions
pub const WIDE_SIZE_PARAM: &str = "=w526-h296";

/// Size parameter the image host uses for app icons
pub const ICON_SIZE_PARAM: &str = "=w240-h480";

const STRATEGIES: &[Strategy<Vec<String>>] = &[
    Strategy::new("gallery selectors", from_gallery),
    Strategy::new("image heuristic", from_image_scan),
    Strategy::new("structured data", from_structured),
];

/// Screenshot URLs in page order, without duplicates
pub fn extract_screenshots(doc: &ListingDocument) -> Vec<String> {
    first_match(doc, "screenshots", STRATEGIES).unwrap_or_default()
}

/// Whether an image URL looks like a screenshot rather than an icon
pub fn looks_like_screenshot(url: &str) -> bool {
    let lower = url.to_lowercase();
    if lower.contains(ICON_SIZE_PARAM) {
        return false;
    }
    lower.contains(SCREENSHOT_MARKER) || lower.contains(WIDE_SIZE_PARAM)
}

/// Keep the first occurrence of every URL
pub fn dedup_urls(urls: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

fn from_gallery(doc: &ListingDocument) -> Option<Vec<String>> {
    GALLERY_SELECTORS
        .iter()
        .map(|selector| select_image_urls(doc.html(), selector))
        .find(|urls| !urls.is_empty())
        .map(dedup_urls)
}

fn from_image_scan(doc: &ListingDocument) -> Option<Vec<String>> {
    let urls = select_image_urls(doc.html(), "img")
        .into_iter()
        .filter(|url| looks_like_screenshot(url));
    Some(dedup_urls(urls))
}

fn from_structured(doc: &ListingDocument) -> Option<Vec<String>> {
    let screenshot = structured_value(doc.structured()?, &["screenshot"])?;
    Some(dedup_urls(structured_urls(screenshot)))
}
