//! Whitelist parsing and filtering.
//!
//! The whitelist is kept as free text (one hostname per line) and parsed
//! every time it is needed, so the set always reflects the current text.

use std::collections::HashSet;

use crate::document::is_structural;

/// Lower-cased hostnames that must never be blocked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistSet {
    hosts: HashSet<String>,
}

impl WhitelistSet {
    /// Parse whitelist text: one hostname per line, `#` comments ignored,
    /// leading dots stripped, case-insensitive
    pub fn parse(text: &str) -> Self {
        let hosts = text
            .lines()
            .filter_map(normalize_host)
            .collect();
        Self { hosts }
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(&host.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hostnames in sorted order, for display
    pub fn sorted(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.hosts.iter().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }
}

/// Normalize one whitelist line into a hostname
pub fn normalize_host(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let host = trimmed.trim_start_matches('.').to_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Take the second whitespace token of a line.
///
/// This is the hostname column of a well-formed `address hostname` entry.
/// Lines with fewer than two tokens have no hostname under this rule.
pub fn second_token(line: &str) -> Option<&str> {
    line.split_whitespace().nth(1)
}

/// Remove entries whose hostname column is whitelisted.
///
/// Only exact hostname matches are removed; subdomains of a whitelisted host
/// are kept. Structural lines and lines without a second token always survive.
pub fn filter_whitelisted(lines: &[String], whitelist: &WhitelistSet) -> Vec<String> {
    if whitelist.is_empty() {
        return lines.to_vec();
    }
    lines
        .iter()
        .filter(|line| !is_whitelisted(line, whitelist))
        .cloned()
        .collect()
}

/// Whether a single line would be removed by [`filter_whitelisted`]
pub fn is_whitelisted(line: &str, whitelist: &WhitelistSet) -> bool {
    if is_structural(line) {
        return false;
    }
    second_token(line).is_some_and(|host| whitelist.contains(host))
}
