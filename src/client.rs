//! Client-side helpers for the listing endpoint
//!
//! Used by the submission form: look up a listing through the boundary
//! handler, and pull a discovered icon or screenshot down as a named file
//! that can be attached to a multipart upload.

use reqwest::multipart::Part;
use reqwest::{Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::handler::{IDENTIFIER_PARAM, LISTING_INFO_PATH};
use crate::record::{Envelope, ErrorBody, ListingRecord};

const GENERIC_FAILURE: &str = "Failed to fetch store listing";

/// Calls the listing endpoint of a running server
#[derive(Debug, Clone)]
pub struct ListingApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ListingApiClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::builder().build()?, base_url)
    }

    /// Create a client reusing an existing HTTP client (cookies, auth headers)
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Look up a listing through the boundary endpoint
    ///
    /// Non-success responses become [`Error::Api`] carrying the JSON body's
    /// `message`, else the raw response text, else a generic message.
    pub async fn request_listing(&self, identifier: &str) -> Result<ListingRecord> {
        let mut url = self.base_url.join(LISTING_INFO_PATH)?;
        url.query_pairs_mut().append_pair(IDENTIFIER_PARAM, identifier);

        debug!(%url, "requesting listing");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = failure_message(response).await;
            return Err(Error::Api { status, message });
        }

        let envelope: Envelope<ListingRecord> = response.json().await?;
        Ok(envelope.data)
    }

    /// Download a remote image and wrap it as a named, typed file
    pub async fn materialize_image(
        &self,
        url: &str,
        file_name: &str,
        mime_type: &str,
    ) -> Result<ImportedFile> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status,
                message: format!("Failed to fetch image: {}", status_text(status)),
            });
        }

        let bytes = response.bytes().await?;
        debug!(url, file_name, size = bytes.len(), "materialized image");

        Ok(ImportedFile {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}

/// A downloaded resource that can stand in for a user upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImportedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Turn into a multipart form part carrying the file name and MIME type
    pub fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)?;
        Ok(part)
    }
}

async fn failure_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();

    if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
        if !body.message.trim().is_empty() {
            return body.message;
        }
    }

    let text = text.trim();
    if text.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        text.to_string()
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(String::from)
        .unwrap_or_else(|| status.as_str().to_string())
}
