//! Parsed listing page
//!
//! Holds the HTML tree together with the structured-data block, which is
//! parsed once up front so every field strategy can consult it cheaply.

use scraper::Html;
use serde_json::Value;

use crate::extractors::extract_structured_block;

pub struct ListingDocument {
    html: Html,
    structured: Option<Value>,
}

impl ListingDocument {
    pub fn parse(html: &str) -> Self {
        let html = Html::parse_document(html);
        let structured = extract_structured_block(&html);
        Self { html, structured }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The app's structured-data object, if the page carried a usable one
    pub fn structured(&self) -> Option<&Value> {
        self.structured.as_ref()
    }
}
