//! Extraction of blocked hostnames from pfSense DNSBL logs.
//!
//! Log lines are comma separated. Only lines whose first field carries the
//! marker (`DNSBL-Full` by default) are used, and the hostname is the third
//! field:
//!
//! ```text
//! DNSBL-Full,Jan 12 10:01:02,ads.example.com,192.168.1.20,...
//! ```

use std::collections::BTreeSet;

/// Collect the unique hostnames of marked log lines, sorted
pub fn extract_hostnames(content: &str, marker: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.trim().split(',');
            let first = fields.next()?;
            if !first.contains(marker) {
                return None;
            }
            let host = fields.nth(1)?.trim();
            (!host.is_empty()).then(|| host.to_string())
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
