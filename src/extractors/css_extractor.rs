//! CSS selector-based extraction
//!
//! Uses the scraper crate to select elements by CSS selectors.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{absolutize_url, non_empty};

/// Parse a selector, logging instead of failing on a bad one
pub fn parse_selector(selector_str: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!(selector = selector_str, error = %e, "invalid CSS selector");
            None
        }
    }
}

/// Whitespace-normalized text content of an element
///
/// Text nodes are joined with spaces so `<br>` and block boundaries
/// keep words apart.
pub fn element_text(element: &ElementRef) -> Option<String> {
    non_empty(&element.text().collect::<Vec<_>>().join(" "))
}

/// Extract first matching element's text
pub fn select_first_text(document: &Html, selector_str: &str) -> Option<String> {
    let selector = parse_selector(selector_str)?;
    document
        .select(&selector)
        .find_map(|el| element_text(&el))
}

/// Extract first matching element's attribute
pub fn select_first_attr(document: &Html, selector_str: &str, attr_name: &str) -> Option<String> {
    let selector = parse_selector(selector_str)?;
    document
        .select(&selector)
        .find_map(|el| el.value().attr(attr_name).and_then(non_empty))
}

/// Image URL of an element: `src`, then `data-src`, then the first `srcset` entry
pub fn image_url(element: &ElementRef) -> Option<String> {
    let value = element.value();
    value
        .attr("src")
        .and_then(non_empty)
        .or_else(|| value.attr("data-src").and_then(non_empty))
        .or_else(|| {
            value
                .attr("srcset")
                .and_then(|set| set.split_whitespace().next())
                .and_then(non_empty)
        })
        .map(|url| absolutize_url(&url))
}

/// Image URLs of all elements matching a selector, in document order
pub fn select_image_urls(document: &Html, selector_str: &str) -> Vec<String> {
    let Some(selector) = parse_selector(selector_str) else {
        return vec![];
    };

    document
        .select(&selector)
        .filter_map(|el| image_url(&el))
        .collect()
}

/// First image URL among the elements matching a selector
pub fn select_first_image_url(document: &Html, selector_str: &str) -> Option<String> {
    let selector = parse_selector(selector_str)?;
    document.select(&selector).find_map(|el| image_url(&el))
}

/// Value of a label/value row such as "Version | 2.3.1"
///
/// Walks every `row_selector` match, compares the text of its `label_selector`
/// child against `labels` (case-insensitive), and returns the text of its
/// `value_selector` child on the first hit.
pub fn labelled_value(
    document: &Html,
    row_selector: &str,
    label_selector: &str,
    value_selector: &str,
    labels: &[&str],
) -> Option<String> {
    let row = parse_selector(row_selector)?;
    let label = parse_selector(label_selector)?;
    let value = parse_selector(value_selector)?;

    for row_el in document.select(&row) {
        let Some(label_text) = row_el.select(&label).find_map(|el| element_text(&el)) else {
            continue;
        };
        let label_text = label_text.to_lowercase();
        if !labels.iter().any(|l| label_text == l.to_lowercase()) {
            continue;
        }
        if let Some(text) = row_el.select(&value).find_map(|el| element_text(&el)) {
            return Some(text);
        }
    }

    None
}

/// Whitespace-normalized visible text of the whole `<body>`
///
/// Script and style contents are skipped.
pub fn body_text(document: &Html) -> Option<String> {
    let selector = parse_selector("body")?;
    let body = document.select(&selector).next()?;

    let texts: Vec<&str> = body
        .descendants()
        .filter(|node| {
            node.parent()
                .and_then(|p| p.value().as_element())
                .map_or(true, |el| !matches!(el.name(), "script" | "style" | "noscript"))
        })
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();

    // Join text nodes with spaces so adjacent blocks don't run together
    non_empty(&texts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_extract() {
        let html = Html::parse_document(
            r#"
        <html>
        <body>
            <div class="dev"> </div>
            <div class="dev">  Example   Studio </div>
            <a href="/store/apps/dev?id=1" class="link">Studio</a>
        </body>
        </html>
        "#,
        );

        assert_eq!(select_first_text(&html, ".dev").unwrap(), "Example Studio");
        assert_eq!(
            select_first_attr(&html, ".link", "href").unwrap(),
            "/store/apps/dev?id=1"
        );
        assert_eq!(select_first_text(&html, ".missing"), None);
    }

    #[test]
    fn test_element_text_keeps_line_breaks_apart() {
        let html = Html::parse_document(
            r#"<div class="desc">Record clips<br>Share instantly<p>Edit later</p></div>"#,
        );
        assert_eq!(
            select_first_text(&html, ".desc").unwrap(),
            "Record clips Share instantly Edit later"
        );
    }

    #[test]
    fn test_invalid_selector_yields_nothing() {
        let html = Html::parse_document("<p>text</p>");
        assert_eq!(select_first_text(&html, "p[[["), None);
        assert!(select_image_urls(&html, "img[[").is_empty());
    }

    #[test]
    fn test_image_url_fallbacks() {
        let html = Html::parse_document(
            r#"
        <img class="a" src="https://x/1.png">
        <img class="a" data-src="//x/2.png">
        <img class="a" srcset="https://x/3.png 2x">
        <img class="a">
        "#,
        );

        assert_eq!(
            select_image_urls(&html, "img.a"),
            vec!["https://x/1.png", "https://x/2.png", "https://x/3.png"]
        );
    }

    #[test]
    fn test_labelled_value() {
        let html = Html::parse_document(
            r#"
        <div class="row"><div class="label">Updated on</div><div class="value">May 1</div></div>
        <div class="row"><div class="label">Version</div><div class="value"> 2.3.1 </div></div>
        "#,
        );

        let version = labelled_value(&html, ".row", ".label", ".value", &["version"]);
        assert_eq!(version.unwrap(), "2.3.1");

        let missing = labelled_value(&html, ".row", ".label", ".value", &["Downloads"]);
        assert_eq!(missing, None);
    }
}
