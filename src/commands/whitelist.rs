//! Whitelist command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::WhitelistAction;
use crate::config::Config;
use crate::validation::{looks_like_url, validate_hostname};

use super::import::fetcher_for;

/// Run the whitelist command
pub async fn run(action: WhitelistAction, config_path: &Path) -> Result<()> {
    match action {
        WhitelistAction::Add { host } => add_to_whitelist(&host, config_path).await,
        WhitelistAction::Del { host } => remove_from_whitelist(&host, config_path).await,
        WhitelistAction::List => list_whitelist(config_path).await,
        WhitelistAction::Import { from } => import_whitelist(&from, config_path).await,
    }
}

/// Add a hostname to the whitelist
async fn add_to_whitelist(host: &str, config_path: &Path) -> Result<()> {
    validate_hostname(host)?;

    let mut config = Config::load_or_default(config_path)?;
    if !config.add_whitelist_host(host) {
        println!("{} is already in the whitelist", host.trim());
        return Ok(());
    }
    config.save(config_path)?;

    println!("[OK] Added {} to whitelist", host.trim());
    println!("     Run 'hostscrub filter' to remove it from the hosts file");
    Ok(())
}

/// Remove a hostname from the whitelist
async fn remove_from_whitelist(host: &str, config_path: &Path) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    if !config.remove_whitelist_host(host) {
        println!("{} was not in the whitelist", host.trim());
        return Ok(());
    }
    config.save(config_path)?;

    println!("[OK] Removed {} from whitelist", host.trim());
    Ok(())
}

/// List all whitelisted hostnames
async fn list_whitelist(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let whitelist = config.whitelist_set();

    println!();
    println!("Whitelist ({} entries):", whitelist.len());
    println!();
    if whitelist.is_empty() {
        println!("  (empty)");
    } else {
        for host in whitelist.sorted() {
            println!("  {}", host);
        }
    }
    println!();
    Ok(())
}

/// Append whitelist lines read from a file or URL
async fn import_whitelist(from: &str, config_path: &Path) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;

    let text = if looks_like_url(from) {
        fetcher_for(&config)?.fetch_text(from).await?
    } else {
        std::fs::read_to_string(from)
            .with_context(|| format!("Failed to read whitelist file: {}", from))?
    };

    let added = merge_whitelist(&mut config, &text);
    if added == 0 {
        println!("No new hostnames found in {}", from);
        return Ok(());
    }
    config.save(config_path)?;

    println!("[OK] Added {} hostnames from {}", added, from);
    Ok(())
}

/// Add every hostname of `text` to the config whitelist; returns how many were new
pub fn merge_whitelist(config: &mut Config, text: &str) -> usize {
    text.lines()
        .filter(|line| config.add_whitelist_host(line))
        .count()
}
