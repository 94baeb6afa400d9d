//! Catalog client errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the e-commerce platform.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An HTTP transport error occurred. The request URL is stripped, since it may carry
    /// query-string credentials.
    #[error("http error: {0}")]
    Http(reqwest::Error),

    /// The platform answered with a non-2xx status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {source}")]
    Decode {
        /// Parse failure.
        #[source]
        source: serde_json::Error,
        /// Raw response body, kept for logging.
        body: String,
    },
}

impl From<reqwest::Error> for CatalogError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.without_url())
    }
}
