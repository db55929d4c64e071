//! Status command implementation.

use anyhow::Result;
use std::path::Path;

use crate::operator::ReviewMode;
use crate::session::SessionStatus;
use crate::state::{format_age, AppliedState, AppliedStatus};
use crate::format::{counted, grouped};

use super::{load_state_or_default, open_session, ConsoleSession};

/// Run the status command
pub async fn run(config_path: &Path) -> Result<()> {
    let session = open_session(config_path, ReviewMode::DryRun)?;
    print_status(&session);
    Ok(())
}

/// Print the status of a session, including the persisted marker
pub fn print_status(session: &ConsoleSession) {
    let state = load_state_or_default(&session.config().state_path);
    let applied = state.status_of(session.hosts_path(), &session.document().fingerprint());

    println!();
    for line in describe(&session.status(), &state, applied, session.config().sources.len()) {
        println!("{}", line);
    }
    println!();
}

/// Status report lines
pub fn describe(
    status: &SessionStatus,
    state: &AppliedState,
    applied: AppliedStatus,
    source_count: usize,
) -> Vec<String> {
    let mut lines = vec![
        format!("Hosts file: {}", status.hosts_path.display()),
        format!(
            "Lines: {} ({})",
            grouped(status.lines),
            counted(status.entries, "entry", "entries")
        ),
        format!(
            "Backup: {} ({})",
            status.backup_path.display(),
            if status.has_backup { "present" } else { "none" }
        ),
        format!("Whitelist: {}", counted(status.whitelist_size, "hostname", "hostnames")),
        format!("Sources: {} configured", source_count),
    ];

    if !status.applied {
        lines.push("Unsaved edits: yes".to_string());
    }

    let last = match (state.applied_at_display(), state.applied_at) {
        (Some(display), Some(at)) => format!("{} ({})", display, format_age(at)),
        _ => "never".to_string(),
    };
    lines.push(format!("Last applied: {}", last));

    lines.push(
        match applied {
            AppliedStatus::Matches => "Hosts file matches the last applied content",
            AppliedStatus::Modified => "Hosts file was modified outside hostscrub since then",
            AppliedStatus::Unknown => "Hosts file has not been applied by hostscrub",
        }
        .to_string(),
    );
    lines
}
