//! Listing page retrieval
//!
//! One GET per call, no retries and no caching. The fetcher only holds its
//! configuration and a reusable HTTP client, so it can be shared freely.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::FetcherConfig;
use crate::error::{Error, Result};
use crate::fields::parse_listing;
use crate::record::{ListingQuery, ListingRecord};

/// Anything that can turn an identifier into a listing record
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listing(&self, identifier: &str) -> Result<ListingRecord>;
}

/// Fetches and normalizes public store listings
#[derive(Debug, Clone)]
pub struct ListingFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl ListingFetcher {
    /// Create a fetcher with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a fetcher from a validated configuration
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|_| {
                Error::Config("accept_language is not a valid header value".to_string())
            })?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Listing page URL for an identifier: `<listing_url>?id=<identifier>&hl=<language>`
    pub fn listing_url(&self, identifier: &str) -> Result<Url> {
        let url = Url::parse_with_params(
            &self.config.listing_url,
            &[("id", identifier), ("hl", self.config.language.as_str())],
        )?;
        Ok(url)
    }

    /// Fetch a listing page and extract a record from it
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyIdentifier`] for a blank identifier
    /// - [`Error::Timeout`], [`Error::UpstreamStatus`] or [`Error::Http`] when the page
    ///   cannot be retrieved
    /// - [`Error::NotFound`] when the page carries no listing name
    #[instrument(skip(self))]
    pub async fn fetch_listing(&self, identifier: &str) -> Result<ListingRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(Error::EmptyIdentifier);
        }

        let html = self.fetch_page(identifier).await?;
        let record = parse_listing(identifier, &html)?;

        info!(
            name = %record.name,
            screenshots = record.screenshot_urls.len(),
            "fetched listing"
        );
        Ok(record)
    }

    pub async fn fetch(&self, query: &ListingQuery) -> Result<ListingRecord> {
        self.fetch_listing(&query.identifier).await
    }

    /// Retrieve the raw listing page
    pub async fn fetch_page(&self, identifier: &str) -> Result<String> {
        let url = self.listing_url(identifier)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, %url, "upstream returned failure status");
            return Err(Error::UpstreamStatus {
                status,
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))
    }

    fn transport_error(&self, url: &Url, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            warn!(%url, "upstream timed out");
            Error::Timeout {
                url: url.to_string(),
                after: self.config.timeout(),
            }
        } else {
            warn!(%url, error = %e, "upstream request failed");
            Error::Http(e)
        }
    }
}

#[async_trait]
impl ListingSource for ListingFetcher {
    async fn fetch_listing(&self, identifier: &str) -> Result<ListingRecord> {
        ListingFetcher::fetch_listing(self, identifier).await
    }
}
