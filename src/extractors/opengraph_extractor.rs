//! Meta tag extraction
//!
//! Reads `og:` properties, Twitter Card names and standard named meta tags.

use scraper::Html;

use super::{non_empty, parse_selector};

/// Content of `<meta name="...">`
pub fn meta_name(document: &Html, name: &str) -> Option<String> {
    meta_content(document, "name", name)
}

/// Content of `<meta property="...">`, e.g. `og:title`
pub fn meta_property(document: &Html, property: &str) -> Option<String> {
    meta_content(document, "property", property)
}

fn meta_content(document: &Html, key_attr: &str, key: &str) -> Option<String> {
    let selector = parse_selector(&format!("meta[{key_attr}]"))?;

    // Compare in code rather than in the selector so odd key values can't break parsing
    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr(key_attr)
                .is_some_and(|v| v.eq_ignore_ascii_case(key))
        })
        .find_map(|el| el.value().attr("content").and_then(non_empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_tags() {
        let html = Html::parse_document(
            r#"
        <html>
        <head>
            <meta property="og:title" content="Test Page">
            <meta property="og:image" content="">
            <meta property="og:image" content="https://example.com/image.jpg">
            <meta name="twitter:card" content="summary_large_image">
            <meta name="Description" content="Page description">
        </head>
        </html>
        "#,
        );

        assert_eq!(meta_property(&html, "og:title").unwrap(), "Test Page");
        assert_eq!(
            meta_property(&html, "og:image").unwrap(),
            "https://example.com/image.jpg"
        );
        assert_eq!(meta_name(&html, "twitter:card").unwrap(), "summary_large_image");
        assert_eq!(meta_name(&html, "description").unwrap(), "Page description");
        assert_eq!(meta_name(&html, "keywords"), None);
    }
}
