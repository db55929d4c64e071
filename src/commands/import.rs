//! Import commands: remote lists and DNSBL logs.
//!
//! Imports append straight to the document (the whitelist pass runs right
//! after); the save flow that follows is where the operator reviews them.

use anyhow::{bail, Result};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::operator::ReviewMode;
use crate::privilege::warn_if_unprivileged;
use crate::validation::{looks_like_url, validate_url};

use super::{open_session, save_and_record};

/// Import a named source or URL, then save
pub async fn run_url(source: &str, mode: ReviewMode, config_path: &Path) -> Result<()> {
    warn_if_unprivileged();
    let mut session = open_session(config_path, mode)?;
    let (origin, url) = resolve_source(session.config(), source)?;
    let fetcher = fetcher_for(session.config())?;

    let summary = session.import_remote(&fetcher, &origin, &url).await?;
    if summary.appended > 0 {
        save_and_record(&mut session)?;
    }
    Ok(())
}

/// Import a DNSBL log file, then save
pub async fn run_log(path: &Path, mode: ReviewMode, config_path: &Path) -> Result<()> {
    warn_if_unprivileged();
    let mut session = open_session(config_path, mode)?;

    let summary = session.import_log(path)?;
    if summary.appended > 0 {
        save_and_record(&mut session)?;
    }
    Ok(())
}

/// HTTP client honouring the configured timeout
pub fn fetcher_for(config: &Config) -> Result<Fetcher> {
    Ok(Fetcher::new(Duration::from_secs(config.fetch_timeout_secs))?)
}

/// Resolve a source name or raw URL into `(origin, url)`
pub fn resolve_source(config: &Config, source: &str) -> Result<(String, String)> {
    if let Some(found) = config.find_source(source) {
        return Ok((found.name.clone(), found.url.clone()));
    }
    if looks_like_url(source) {
        validate_url(source)?;
        return Ok((source.to_string(), source.to_string()));
    }

    let known: Vec<&str> = config.sources.iter().map(|s| s.name.as_str()).collect();
    if known.is_empty() {
        bail!("Unknown source '{}' and no sources are configured", source);
    }
    bail!(
        "Unknown source '{}'. Configured sources: {}",
        source,
        known.join(", ")
    );
}
