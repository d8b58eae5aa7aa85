//! HTTP client wrapper for streaming archive downloads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use crate::resolver::DownloadTarget;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::{capture_timestamp, destination_filename, reserve_unique_path};

/// HTTP client for downloading archives with streaming support.
///
/// Designed to be created once and reused across downloads, taking
/// advantage of connection pooling. Each download is independent; no
/// shared state exists between concurrent downloads besides the
/// destination directory, whose creation is idempotent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large archives)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads a resolved target into `output_dir`, returning the saved path.
    ///
    /// The destination name is `<basename>-<timestamp>` (plus `.zip` for
    /// repository archives), disambiguated with a numeric suffix. The name
    /// is claimed atomically before the request, so concurrent downloads of
    /// the same basename within the same second still get distinct paths.
    /// Bytes are streamed chunk-by-chunk to a `.part` temp name and renamed
    /// into place on success, so a failed transfer never publishes a
    /// partial file under the final name.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if:
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - Creating the directory, writing, or renaming fails
    #[must_use = "download result contains the path to the saved archive"]
    #[instrument(skip(self, target), fields(url = %target.archive_url))]
    pub async fn download(
        &self,
        target: &DownloadTarget,
        output_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        debug!("starting download");

        // Idempotent, safe under concurrent creation.
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| DownloadError::io(output_dir.to_path_buf(), e))?;

        let filename = destination_filename(target, capture_timestamp());
        let mut reserved = reserve_unique_path(output_dir, &filename).await?;
        debug!(path = %reserved.final_path.display(), "reserved output path");

        let url = target.archive_url.as_str();
        let response = match self.request(url).await {
            Ok(response) => response,
            Err(error) => {
                // Release the claim so a failed request leaves nothing behind.
                let _ = tokio::fs::remove_file(&reserved.partial_path).await;
                return Err(error);
            }
        };

        let stream_result =
            stream_to_file(&mut reserved.file, response, url, &reserved.partial_path).await;
        if stream_result.is_err() {
            debug!(path = %reserved.partial_path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&reserved.partial_path).await;
        }
        let bytes_written = stream_result?;

        tokio::fs::rename(&reserved.partial_path, &reserved.final_path)
            .await
            .map_err(|e| DownloadError::io(reserved.final_path.clone(), e))?;

        info!(
            path = %reserved.final_path.display(),
            bytes = bytes_written,
            "download complete"
        );
        Ok(reserved.final_path)
    }

    /// Sends the GET request and checks the response status.
    async fn request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }
}

/// Streams the response body to a file in bounded chunks, returning bytes
/// written. The whole payload is never held in memory.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_custom_timeouts() {
        let _client = HttpClient::new_with_timeouts(5, 10);
    }
}
