//! Error types for remote search.

use thiserror::Error;

/// Errors that can occur during a repository search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network-level error reaching the search endpoint.
    #[error("network error searching {url}: {source}")]
    Network {
        /// The search URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The search endpoint returned a non-success status.
    #[error("search failed with HTTP {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded as the expected shape.
    #[error("malformed search response: {source}")]
    MalformedResponse {
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

impl SearchError {
    /// Creates a network error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16) -> Self {
        Self::HttpStatus { status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let error = SearchError::http_status(422);
        assert!(error.to_string().contains("422"), "{error}");
    }
}
