//! Centralized validation functions for hostscrub.
//!
//! This module provides unified validation for:
//! - Source names and URLs
//! - Whitelist hostnames
//! - Keywords for search & remove
//!
//! IP addresses are deliberately not validated: hosts entries are treated as
//! whitespace-separated tokens only.

use anyhow::{bail, Result};
use reqwest::Url;

/// Maximum length of a custom source name
pub const MAX_SOURCE_NAME_LEN: usize = 64;

/// Validate a custom source name.
///
/// # Examples
/// ```
/// use hostscrub::validation::validate_source_name;
/// assert!(validate_source_name("steven-black").is_ok());
/// assert!(validate_source_name("").is_err());
/// assert!(validate_source_name("has space").is_err());
/// ```
pub fn validate_source_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Source name must not be empty");
    }
    if name.len() > MAX_SOURCE_NAME_LEN {
        bail!(
            "Source name '{}' is too long (max {} characters)",
            name,
            MAX_SOURCE_NAME_LEN
        );
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
    {
        bail!(
            "Invalid source name '{}': use letters, digits, '-', '_' or '.'",
            name
        );
    }
    Ok(())
}

/// Validate a source URL and return it parsed. Only HTTP(S) is fetched.
///
/// # Examples
/// ```
/// use hostscrub::validation::validate_url;
/// assert!(validate_url("https://example.com/hosts").is_ok());
/// assert!(validate_url("ftp://example.com/hosts").is_err());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", url, e))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => bail!("Unsupported URL scheme '{}' in {}", other, url),
    }
    if parsed.host_str().is_none() {
        bail!("URL has no host: {}", url);
    }
    Ok(parsed)
}

/// Whether a name/url argument looks like a URL rather than a source name
pub fn looks_like_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Validate a hostname about to be whitelisted.
///
/// Only the token shape is checked: one token, no comment marker.
pub fn validate_hostname(host: &str) -> Result<()> {
    let trimmed = host.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        bail!("Hostname must not be empty");
    }
    if trimmed.split_whitespace().count() != 1 {
        bail!("Hostname '{}' must be a single token", host.trim());
    }
    if trimmed.contains('#') {
        bail!("Hostname '{}' must not contain '#'", host.trim());
    }
    Ok(())
}

/// Validate a search & remove keyword
pub fn validate_keyword(keyword: &str) -> Result<()> {
    if keyword.trim().is_empty() {
        bail!("Please enter a keyword to search for");
    }
    Ok(())
}
