//! HTTP fetcher for remote blocklists and whitelists.
//!
//! One request per import, awaited inline. There is no retry: a failure is
//! reported and the document is left untouched.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::HostsError;
use crate::format::{body_size, counted};
use crate::validation::validate_url;

/// Maximum size per downloaded list (10 MB)
pub const MAX_LIST_SIZE: usize = 10 * 1024 * 1024;

/// Downloaded list, split into lines
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub lines: Vec<String>,
    pub bytes: usize,
}

/// HTTP client for fetching lists
pub struct Fetcher {
    client: Client,
    max_size: usize,
}

impl Fetcher {
    /// Create a new fetcher with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, HostsError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("hostscrub/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostsError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            max_size: MAX_LIST_SIZE,
        })
    }

    /// Lower the body size limit (default [`MAX_LIST_SIZE`])
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Fetch a text list and split it into lines
    pub async fn fetch_lines(&self, url: &str) -> Result<FetchResult, HostsError> {
        info!("Fetching {}...", url);
        let body = self.fetch_text(url).await?;
        let lines = split_body(&body);

        info!(
            "Fetched {} - {} ({})",
            url,
            counted(lines.len(), "line", "lines"),
            body_size(body.len())
        );

        Ok(FetchResult {
            url: url.to_string(),
            bytes: body.len(),
            lines,
        })
    }

    /// Fetch the whole body as text, enforcing status and size limits
    pub async fn fetch_text(&self, url: &str) -> Result<String, HostsError> {
        validate_url(url).map_err(|e| HostsError::Network(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HostsError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HostsError::Network(format!("HTTP {} from {}", status, url)));
        }

        if let Some(content_length) = response.content_length() {
            check_size(content_length as usize, self.max_size)?;
        }

        let body = response
            .text()
            .await
            .map_err(|e| HostsError::Network(format!("Failed to read response body: {}", e)))?;

        // Content-Length may be missing or wrong
        check_size(body.len(), self.max_size)?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }
}

fn check_size(size: usize, max_size: usize) -> Result<(), HostsError> {
    if size > max_size {
        return Err(HostsError::Network(format!(
            "Response too large: {} bytes (max: {} bytes)",
            size, max_size
        )));
    }
    Ok(())
}

/// Split a response body into lines, dropping a trailing empty line
pub fn split_body(body: &str) -> Vec<String> {
    body.lines().map(str::to_string).collect()
}
