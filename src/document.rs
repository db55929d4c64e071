//! Line model for the hosts document being edited.
//!
//! A [`Document`] is nothing more than an ordered list of lines. Every
//! transformation replaces the whole list through [`Document::set`]; nothing
//! at this layer patches lines incrementally.

use sha2::{Digest, Sha256};

/// Ordered, line-oriented hosts content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from already-split lines
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split file content into lines (`\n` and `\r\n` both accepted)
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when the document has no content other than whitespace
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Replace the whole content
    pub fn set(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// Append a single line at the end
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Remove the line at `index` (0-based)
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    /// Number of non-structural lines
    pub fn entry_count(&self) -> usize {
        self.lines.iter().filter(|l| !is_structural(l)).count()
    }

    /// Append imported lines under a separator comment naming their origin.
    ///
    /// A blank line is inserted first when the document does not already end
    /// with one, so the imported block stays visually separated.
    pub fn append_block<I>(&mut self, origin: &str, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
            self.lines.push(String::new());
        }
        self.lines.push(import_header(origin));
        self.lines.extend(lines);
    }

    /// Render as file content, one line per entry with a trailing newline
    pub fn to_text(&self) -> String {
        render(&self.lines)
    }

    /// Content fingerprint used by the applied-state marker
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.lines)
    }
}

/// Separator comment written above an imported block
pub fn import_header(origin: &str) -> String {
    format!("# --- Imported from {} ---", origin)
}

/// A line that is blank or a `#` comment once trimmed
pub fn is_structural(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Join lines into file content
pub fn render(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// SHA-256 of the lines, hex encoded
pub fn fingerprint(lines: &[String]) -> String {
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
