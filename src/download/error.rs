//! Error types for the download module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during archive downloads.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS, body read).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create dir, write, rename).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a network error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display_includes_status_and_url() {
        let error = DownloadError::http_status("https://example.com/a.zip", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected status in: {msg}");
        assert!(msg.contains("https://example.com/a.zip"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_timeout_display_includes_url() {
        let error = DownloadError::timeout("https://example.com/slow");
        assert!(error.to_string().contains("timeout"), "{error}");
    }

    #[test]
    fn test_io_display_includes_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = DownloadError::io("/tmp/out.zip", source);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/out.zip"), "Expected path in: {msg}");
    }
}
