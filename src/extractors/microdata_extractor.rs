//! Microdata (schema.org HTML attributes) extraction
//!
//! Older listing layouts annotate fields with `itemprop`; these helpers read
//! them regardless of which element carries the property.
//! Reference: https://html.spec.whatwg.org/multipage/microdata.html

use scraper::{ElementRef, Html};

use super::{absolutize_url, element_text, non_empty, parse_selector};

/// Value of the first element with `itemprop="<prop>"` that yields one
pub fn itemprop_value(document: &Html, prop: &str) -> Option<String> {
    itemprop_values(document, prop).into_iter().next()
}

/// Values of every element carrying `itemprop="<prop>"`, in document order
pub fn itemprop_values(document: &Html, prop: &str) -> Vec<String> {
    let Some(selector) = parse_selector("[itemprop]") else {
        return vec![];
    };

    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("itemprop")
                .is_some_and(|p| p.split_whitespace().any(|p| p == prop))
        })
        .filter_map(|el| property_value(&el))
        .collect()
}

/// Scalar value of a microdata property - depends on element type
fn property_value(element: &ElementRef) -> Option<String> {
    let value = element.value();
    match value.name() {
        "meta" => value.attr("content").and_then(non_empty),
        "link" | "a" | "area" => value
            .attr("href")
            .and_then(non_empty)
            .or_else(|| element_text(element)),
        "img" | "audio" | "video" | "source" => value
            .attr("src")
            .and_then(non_empty)
            .map(|u| absolutize_url(&u)),
        "time" => value
            .attr("datetime")
            .and_then(non_empty)
            .or_else(|| element_text(element)),
        "data" | "meter" => value.attr("value").and_then(non_empty),
        _ => value
            .attr("content")
            .and_then(non_empty)
            .or_else(|| element_text(element)),
    }
}
