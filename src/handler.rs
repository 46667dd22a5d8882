//! HTTP boundary for listing lookups
//!
//! Framework-agnostic: the hosting server passes in the authenticated caller
//! (if any) and the raw query string, and writes out the returned status and
//! JSON body. No extraction happens here.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, ErrorKind};
use crate::fetcher::ListingSource;
use crate::record::{Envelope, ErrorBody, ListingRecord};

/// Route the handler is mounted on
pub const LISTING_INFO_PATH: &str = "/api/developer/play-store-info";

/// Query parameter carrying the identifier
pub const IDENTIFIER_PARAM: &str = "packageName";

/// Authenticated caller, as established by the session layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
}

/// Status and JSON body to send back
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    fn data(record: &ListingRecord) -> Self {
        Self::json(StatusCode::OK, &Envelope { data: record })
    }

    fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::json(
            status,
            &ErrorBody {
                message: message.into(),
            },
        )
    }

    fn json(status: StatusCode, body: &impl serde::Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status, body },
            Err(e) => {
                warn!(error = %e, "failed to serialize response body");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: serde_json::json!({ "message": "Internal error" }),
                }
            }
        }
    }
}

/// Pull the identifier out of a raw query string
pub fn identifier_from_query(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == IDENTIFIER_PARAM)
        .map(|(_, value)| value.into_owned())
}

pub struct ListingHandler<S> {
    source: S,
}

impl<S: ListingSource> ListingHandler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Handle `GET /api/developer/play-store-info?packageName=...`
    pub async fn handle(&self, caller: Option<&Principal>, query: &str) -> ApiResponse {
        self.handle_identifier(caller, identifier_from_query(query).as_deref())
            .await
    }

    pub async fn handle_identifier(
        &self,
        caller: Option<&Principal>,
        identifier: Option<&str>,
    ) -> ApiResponse {
        let Some(caller) = caller else {
            return ApiResponse::message(StatusCode::UNAUTHORIZED, "Unauthorized");
        };

        let identifier = identifier.map(str::trim).unwrap_or_default();
        if identifier.is_empty() {
            return ApiResponse::message(
                StatusCode::BAD_REQUEST,
                format!("Missing required query parameter '{IDENTIFIER_PARAM}'"),
            );
        }

        debug!(caller = %caller.id, identifier, "listing lookup");
        match self.source.fetch_listing(identifier).await {
            Ok(record) => ApiResponse::data(&record),
            Err(e) => error_response(&e),
        }
    }
}

fn error_response(err: &Error) -> ApiResponse {
    match err.kind() {
        ErrorKind::NotFound => ApiResponse::message(StatusCode::NOT_FOUND, err.to_string()),
        ErrorKind::InvalidInput => ApiResponse::message(StatusCode::BAD_REQUEST, err.to_string()),
        ErrorKind::Fetch => ApiResponse::message(
            StatusCode::BAD_GATEWAY,
            format!("Failed to fetch store listing: {err}"),
        ),
        ErrorKind::Internal => {
            warn!(error = %err, "listing lookup failed");
            ApiResponse::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch store listing")
        }
    }
}
