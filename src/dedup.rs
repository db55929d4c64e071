//! Order-preserving deduplication.

use std::collections::HashSet;

use crate::document::is_structural;

/// Drop repeated entries, keeping the first occurrence verbatim.
///
/// Entries are compared trimmed and lower-cased. Comments and blank lines are
/// always kept, wherever they appear.
pub fn deduplicate(lines: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .filter(|line| is_structural(line) || seen.insert(line.trim().to_lowercase()))
        .cloned()
        .collect()
}
