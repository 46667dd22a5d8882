//! JSON-LD extraction from HTML
//!
//! Extracts the app's structured-data block from
//! `<script type="application/ld+json">` tags. Supports @graph arrays and
//! multiple JSON-LD blocks; malformed blocks are skipped.

use scraper::Html;
use serde_json::Value;
use tracing::debug;

use super::{absolutize_url, non_empty, parse_selector};

/// Schema.org types that describe an application listing, in preference order
const APP_TYPES: &[&str] = &[
    "SoftwareApplication",
    "MobileApplication",
    "VideoGame",
    "WebApplication",
];

/// Find the structured-data object describing the app
///
/// Prefers an object whose @type is an application type; otherwise falls
/// back to the first typed object on the page.
pub fn extract_structured_block(document: &Html) -> Option<Value> {
    let selector = parse_selector(r#"script[type="application/ld+json"]"#)?;

    let mut typed = Vec::new();
    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => collect_typed_objects(&json, &mut typed),
            Err(e) => debug!(error = %e, "skipping malformed JSON-LD block"),
        }
    }

    for app_type in APP_TYPES {
        if let Some(pos) = typed.iter().position(|(types, _)| types.iter().any(|t| t == app_type)) {
            return Some(typed.swap_remove(pos).1);
        }
    }

    typed.into_iter().next().map(|(_, value)| value)
}

/// Recursively collect objects with @type, including from @graph
fn collect_typed_objects(value: &Value, result: &mut Vec<(Vec<String>, Value)>) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::Array(graph)) = obj.get("@graph") {
                for item in graph {
                    collect_typed_objects(item, result);
                }
            }

            if let Some(type_val) = obj.get("@type") {
                let types: Vec<String> = match type_val {
                    Value::String(s) => vec![clean_type(s)],
                    Value::Array(arr) => arr
                        .iter()
                        .filter_map(|v| v.as_str().map(clean_type))
                        .collect(),
                    _ => vec![],
                };

                if !types.is_empty() {
                    result.push((types, value.clone()));
                }
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_typed_objects(item, result);
            }
        }
        _ => {}
    }
}

/// Strip schema.org prefix if present
fn clean_type(t: &str) -> String {
    t.strip_prefix("https://schema.org/")
        .or_else(|| t.strip_prefix("http://schema.org/"))
        .unwrap_or(t)
        .to_string()
}

/// Navigate a dotted path and render the target as text
///
/// Arrays along the way resolve to their first element, so `author.name`
/// works whether `author` is an object or a list of objects.
pub fn structured_text(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for segment in path {
        current = first_of(current).get(segment)?;
    }

    match first_of(current) {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Raw value at a dotted path, without text conversion
pub fn structured_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = first_of(current).get(segment)?;
    }
    Some(current)
}

/// URLs from an image-like property
///
/// Accepts a bare string, an object with a `url` (or `contentUrl`) property,
/// or an array of either.
pub fn structured_urls(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => non_empty(s).map(|u| absolutize_url(&u)).into_iter().collect(),
        Value::Object(obj) => obj
            .get("url")
            .or_else(|| obj.get("contentUrl"))
            .and_then(Value::as_str)
            .and_then(non_empty)
            .map(|u| absolutize_url(&u))
            .into_iter()
            .collect(),
        Value::Array(arr) => arr.iter().flat_map(structured_urls).collect(),
        _ => vec![],
    }
}

fn first_of(value: &Value) -> &Value {
    match value {
        Value::Array(arr) => arr.first().unwrap_or(value),
        _ => value,
    }
}
