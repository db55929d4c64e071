//! The operator: whoever reviews diffs and answers confirmations.
//!
//! Library code never reads stdin directly. It asks an [`Operator`], which is
//! the terminal in production and a mock in tests.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use tracing::warn;

use crate::diff::{DiffLine, DiffScript};
use crate::review::Decision;

#[cfg(test)]
use mockall::automock;

/// Unchanged lines kept around each change when printing a diff
pub const DIFF_CONTEXT: usize = 3;

/// Yes/no questions the protocol may need answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// The document is empty; saving would clear the hosts file
    SaveEmptyDocument,
    /// The backup could not be written; `reason` holds the error
    ContinueWithoutBackup { reason: String },
    /// Reloading would discard edits that were never saved
    DiscardUnsavedEdits,
}

impl Question {
    pub fn prompt(&self) -> String {
        match self {
            Self::SaveEmptyDocument => "The document is empty or contains only whitespace.\n\
                 Are you sure you want to completely clear the hosts file?"
                .to_string(),
            Self::ContinueWithoutBackup { reason } => format!(
                "{}\nDo you want to continue saving WITHOUT a backup?",
                reason
            ),
            Self::DiscardUnsavedEdits => "You have unsaved changes that will be lost.\n\
                 Are you sure you want to reload the hosts file?"
                .to_string(),
        }
    }
}

/// Decision maker for reviews and confirmations
#[cfg_attr(test, automock)]
pub trait Operator {
    /// Show a diff and decide whether to apply it
    fn review(&self, title: &str, script: &DiffScript) -> Decision;

    /// Answer a yes/no question
    fn confirm(&self, question: Question) -> bool;

    /// Pick which of the lines matching `keyword` to remove.
    ///
    /// Returns positions into `matches`; empty means remove nothing.
    fn select(&self, keyword: &str, matches: &[String]) -> Vec<usize>;

    /// Report progress or an informational result
    fn notify(&self, message: &str);
}

/// How the console operator answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewMode {
    /// Ask on the terminal
    #[default]
    Interactive,
    /// Approve every review without asking
    AssumeYes,
    /// Show every diff, apply nothing
    DryRun,
}

/// Terminal-backed operator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOperator {
    mode: ReviewMode,
}

impl ConsoleOperator {
    pub fn new(mode: ReviewMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }
}

impl Operator for ConsoleOperator {
    fn review(&self, title: &str, script: &DiffScript) -> Decision {
        println!();
        println!("{}", title);
        println!("{}", "─".repeat(title.chars().count().max(20)));
        for line in render_script(script, DIFF_CONTEXT) {
            println!("{}", line);
        }
        println!("{}", "─".repeat(title.chars().count().max(20)));
        println!("{} added, {} removed", script.added(), script.removed());

        match self.mode {
            ReviewMode::AssumeYes => Decision::Apply,
            ReviewMode::DryRun => {
                println!("Dry run: changes not applied");
                Decision::Cancel
            }
            ReviewMode::Interactive => {
                if ask_yes_no("Apply changes?") {
                    Decision::Apply
                } else {
                    Decision::Cancel
                }
            }
        }
    }

    fn confirm(&self, question: Question) -> bool {
        match self.mode {
            ReviewMode::Interactive => ask_yes_no(&question.prompt()),
            ReviewMode::AssumeYes => {
                // Only discarding edits is safe to assume; clearing the file or
                // losing the backup always needs a human.
                let answer = question == Question::DiscardUnsavedEdits;
                if !answer {
                    warn!("Refusing without confirmation: {}", question.prompt());
                }
                answer
            }
            ReviewMode::DryRun => false,
        }
    }

    fn select(&self, keyword: &str, matches: &[String]) -> Vec<usize> {
        if self.mode != ReviewMode::Interactive {
            return (0..matches.len()).collect();
        }

        println!();
        println!("Lines containing '{}':", keyword);
        for (i, line) in matches.iter().enumerate() {
            println!("{:>4}  {}", i + 1, line);
        }
        loop {
            print!("Remove which lines? [Enter=all, none, or e.g. 1,3-5] ");
            if io::stdout().flush().is_err() {
                return Vec::new();
            }
            let mut answer = String::new();
            match io::stdin().lock().read_line(&mut answer) {
                Ok(0) | Err(_) => return Vec::new(),
                Ok(_) => {}
            }
            match parse_selection(&answer, matches.len()) {
                Some(picked) => return picked,
                None => println!("Use line numbers between 1 and {}.", matches.len()),
            }
        }
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// Parse a line selection such as `1,3-5` into sorted 0-based positions.
///
/// Blank or `all` picks every line and `none` picks nothing. Returns `None`
/// for numbers outside `1..=count` or malformed ranges.
pub fn parse_selection(answer: &str, count: usize) -> Option<Vec<usize>> {
    let answer = answer.trim().to_lowercase();
    match answer.as_str() {
        "" | "a" | "all" => return Some((0..count).collect()),
        "n" | "none" => return Some(Vec::new()),
        _ => {}
    }

    let mut picked = BTreeSet::new();
    for part in answer.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (a.trim().parse::<usize>().ok()?, b.trim().parse::<usize>().ok()?),
            None => {
                let n = part.parse::<usize>().ok()?;
                (n, n)
            }
        };
        if start == 0 || start > end || end > count {
            return None;
        }
        picked.extend(start - 1..end);
    }
    Some(picked.into_iter().collect())
}

/// Prompt on stdout and read a y/N answer from stdin; EOF means no
pub fn ask_yes_no(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => parse_yes(&answer),
    }
}

fn parse_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Render a diff keeping `context` unchanged lines around each change.
///
/// Runs of unchanged lines further away are collapsed into a `...` marker.
pub fn render_script(script: &DiffScript, context: usize) -> Vec<String> {
    let lines = script.lines();
    let changed: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !matches!(l, DiffLine::Unchanged(_)))
        .map(|(i, _)| i)
        .collect();

    let near_change = |i: usize| {
        changed
            .iter()
            .any(|&c| c.abs_diff(i) <= context)
    };

    let mut rendered = Vec::new();
    let mut skipping = false;
    for (i, line) in lines.iter().enumerate() {
        if matches!(line, DiffLine::Unchanged(_)) && !near_change(i) {
            if !skipping {
                rendered.push("  ...".to_string());
                skipping = true;
            }
            continue;
        }
        skipping = false;
        rendered.push(line.to_string());
    }
    rendered
}
