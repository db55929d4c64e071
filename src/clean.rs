//! The "Clean" canonicalizer.
//!
//! Rebuilds a block list from arbitrary, often malformed input: inline
//! comments, wildcard prefixes, missing or extra address columns. Every
//! surviving line has the form `0.0.0.0 hostname`, lower-cased, unique and
//! sorted. Comments and blank lines are not carried over.

use std::collections::HashSet;

/// Address every canonical entry points at
pub const BLOCK_ADDRESS: &str = "0.0.0.0";

/// Hostnames that must never be blocked
const PROTECTED_HOSTS: &[&str] = &["127.0.0.1", "0.0.0.0", "localhost"];

/// Take the rightmost whitespace token of a line.
///
/// Tolerant of missing or repeated address columns: whatever the prefix,
/// the target host is assumed to come last.
pub fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}

/// Format a canonical entry for `hostname`
pub fn canonical_entry(hostname: &str) -> String {
    format!("{} {}", BLOCK_ADDRESS, hostname)
}

/// Extract the normalized hostname a line should block, if any
pub fn normalize_line(line: &str) -> Option<String> {
    let content = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    }
    .trim();
    if content.is_empty() {
        return None;
    }

    let mut host = last_token(content)?;
    while let Some(rest) = host.strip_prefix("*.") {
        host = rest;
    }

    let host = host.to_lowercase();
    if host.is_empty() || PROTECTED_HOSTS.contains(&host.as_str()) {
        return None;
    }
    Some(host)
}

/// Canonicalize a whole line sequence
pub fn clean(lines: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut entries: Vec<String> = lines
        .iter()
        .filter_map(|line| normalize_line(line))
        .map(|host| canonical_entry(&host))
        .filter(|entry| seen.insert(entry.to_lowercase()))
        .collect();

    entries.sort();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_mixed_input() {
        let input = lines(&["example.com # ads", "*.tracker.net", "0.0.0.0 localhost"]);
        assert_eq!(
            clean(&input),
            lines(&["0.0.0.0 example.com", "0.0.0.0 tracker.net"])
        );
    }

    #[test]
    fn test_clean_drops_structural_lines() {
        let input = lines(&["# header", "", "   ", "  # indented", "0.0.0.0 a.com"]);
        assert_eq!(clean(&input), lines(&["0.0.0.0 a.com"]));
    }

    #[test]
    fn test_clean_takes_last_token() {
        let input = lines(&["127.0.0.1 junk ads.example.org", "::1\tB.COM"]);
        assert_eq!(
            clean(&input),
            lines(&["0.0.0.0 ads.example.org", "0.0.0.0 b.com"])
        );
    }

    #[test]
    fn test_clean_skips_protected_hosts() {
        let input = lines(&[
            "127.0.0.1 localhost",
            "127.0.0.1",
            "0.0.0.0",
            "::1 LOCALHOST",
            "0.0.0.0 keep.me",
        ]);
        assert_eq!(clean(&input), lines(&["0.0.0.0 keep.me"]));
    }

    #[test]
    fn test_clean_dedups_case_insensitively() {
        let input = lines(&["A.com", "0.0.0.0 a.COM", "127.0.0.1 a.com # dup"]);
        assert_eq!(clean(&input), lines(&["0.0.0.0 a.com"]));
    }

    #[test]
    fn test_clean_sorts_output() {
        let input = lines(&["zeta.io", "alpha.io", "mid.io"]);
        assert_eq!(
            clean(&input),
            lines(&["0.0.0.0 alpha.io", "0.0.0.0 mid.io", "0.0.0.0 zeta.io"])
        );
    }

    #[test]
    fn test_normalize_wildcards() {
        assert_eq!(normalize_line("*.ads.net"), Some("ads.net".to_string()));
        assert_eq!(normalize_line("*.*.ads.net"), Some("ads.net".to_string()));
        assert_eq!(normalize_line("*."), None);
        assert_eq!(normalize_line("*.localhost"), None);
        // Only the leading "*." form is a wildcard
        assert_eq!(normalize_line("*ads.net"), Some("*ads.net".to_string()));
    }

    #[test]
    fn test_clean_empty() {
        assert!(clean(&[]).is_empty());
        assert!(clean(&lines(&["#", "# only comments"])).is_empty());
    }

    #[test]
    fn test_last_token() {
        assert_eq!(last_token("0.0.0.0 a.com"), Some("a.com"));
        assert_eq!(last_token("  a.com  "), Some("a.com"));
        assert_eq!(last_token("   "), None);
    }
}
