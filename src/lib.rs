//! Store listing fetcher and normalizer
//!
//! Fetches an app's public store listing page and turns its unstable markup
//! into a typed [`ListingRecord`] suitable for pre-filling a submission:
//! - per-field cascades over current and legacy selectors
//! - meta tags, schema.org microdata and JSON-LD as fallbacks
//! - screenshot collection with an image-URL heuristic
//! - keyword-based subcategory inference for video apps
//!
//! # Example
//!
//! ```no_run
//! use store_listing::ListingFetcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = ListingFetcher::new()?;
//!     let record = fetcher.fetch_listing("com.example.app").await?;
//!     println!("{} by {}", record.name, record.developer_name);
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod fields;
pub mod handler;
pub mod record;
pub mod screenshots;

pub use client::{ImportedFile, ListingApiClient};
pub use config::FetcherConfig;
pub use document::ListingDocument;
pub use error::{Error, ErrorKind, Result};
pub use fetcher::{ListingFetcher, ListingSource};
pub use fields::parse_listing;
pub use handler::{ApiResponse, ListingHandler, Principal};
pub use record::{Envelope, ListingQuery, ListingRecord};
