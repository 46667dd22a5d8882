//! Fetcher configuration
//!
//! Every field has a default, so an empty TOML file is a valid config.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_LISTING_URL: &str = "https://play.google.com/store/apps/details";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Listing page URL; `id` and `hl` are appended as query parameters
    pub listing_url: String,
    /// Page language, sent as `hl`
    pub language: String,
    pub accept_language: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FetcherConfig {
    /// Parse and validate a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FetcherConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn with_listing_url(mut self, listing_url: impl Into<String>) -> Self {
        self.listing_url = listing_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        // Whole seconds only; anything shorter rounds up to one.
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than zero".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("user_agent cannot be empty".to_string()));
        }
        url::Url::parse(&self.listing_url)?;
        Ok(())
    }
}
