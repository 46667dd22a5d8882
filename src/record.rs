//! Listing query and normalized record types

use serde::{Deserialize, Serialize};

/// Version reported when no strategy yields one
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Download label reported when no strategy yields one
pub const DEFAULT_DOWNLOAD_LABEL: &str = "10,000+";

/// Lookup key for a store listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Opaque catalog key, usually a reverse-DNS package name
    pub identifier: String,
}

impl ListingQuery {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Normalized description of a store listing
///
/// Built fresh per fetch. Every field except `sub_category` is always present;
/// fields no strategy could fill hold an empty string, `0`, or a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub developer_name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub icon_url: String,
    pub screenshot_urls: Vec<String>,
    pub rating: f64,
    pub version: String,
    pub download_count_label: String,
}

/// `{ "data": ... }` wrapper used by the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// `{ "message": ... }` body used by the listing endpoint for failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
