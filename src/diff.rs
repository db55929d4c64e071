//! Line-level diff between two versions of a document.
//!
//! The script is only ever shown to the operator; the candidate line list
//! itself is what gets committed.

use similar::{capture_diff_slices, Algorithm, ChangeTag};
use std::fmt;

/// One tagged line of a diff script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Unchanged(String),
    Added(String),
    Removed(String),
}

impl DiffLine {
    pub fn text(&self) -> &str {
        match self {
            Self::Unchanged(s) | Self::Added(s) | Self::Removed(s) => s,
        }
    }

    /// ndiff-style marker
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Unchanged(_) => "  ",
            Self::Added(_) => "+ ",
            Self::Removed(_) => "- ",
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker(), self.text())
    }
}

/// Ordered edit script from an original to a candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffScript {
    lines: Vec<DiffLine>,
}

impl DiffScript {
    /// Align `original` and `candidate` with Myers' algorithm
    pub fn compute(original: &[String], candidate: &[String]) -> Self {
        let ops = capture_diff_slices(Algorithm::Myers, original, candidate);
        let mut lines = Vec::with_capacity(original.len().max(candidate.len()));
        for op in &ops {
            for change in op.iter_changes(original, candidate) {
                let text = change.value().clone();
                lines.push(match change.tag() {
                    ChangeTag::Equal => DiffLine::Unchanged(text),
                    ChangeTag::Delete => DiffLine::Removed(text),
                    ChangeTag::Insert => DiffLine::Added(text),
                });
            }
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn added(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    pub fn removed(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }

    pub fn has_changes(&self) -> bool {
        self.lines
            .iter()
            .any(|l| !matches!(l, DiffLine::Unchanged(_)))
    }

    /// Rebuild the original side (unchanged + removed)
    pub fn original(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter(|l| !matches!(l, DiffLine::Added(_)))
            .map(|l| l.text().to_string())
            .collect()
    }

    /// Rebuild the candidate side (unchanged + added)
    pub fn candidate(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter(|l| !matches!(l, DiffLine::Removed(_)))
            .map(|l| l.text().to_string())
            .collect()
    }

    /// Short "+N -M" summary
    pub fn summary(&self) -> String {
        format!("+{} -{}", self.added(), self.removed())
    }
}
