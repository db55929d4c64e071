//! CLI command implementations.

pub mod flush;
pub mod import;
pub mod restore;
pub mod save;
pub mod shell;
pub mod sources;
pub mod status;
pub mod transform;
pub mod whitelist;

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::config::Config;
use crate::fs_abstraction::{FileSystem, RealFileSystem};
use crate::operator::{ConsoleOperator, Operator, ReviewMode};
use crate::session::{RestoreOutcome, SaveOutcome, Session};
use crate::state::AppliedState;

/// Session over the real filesystem, answered on the terminal
pub type ConsoleSession = Session<RealFileSystem, ConsoleOperator>;

/// Load the config (defaults when absent) and open the hosts file
pub fn open_session(config_path: &Path, mode: ReviewMode) -> Result<ConsoleSession> {
    let config = Config::load_or_default(config_path)?;
    Session::open(config, RealFileSystem, ConsoleOperator::new(mode))
}

/// Read the applied-state file; an unreadable one is logged and treated as empty
pub fn load_state_or_default(state_path: &Path) -> AppliedState {
    AppliedState::load(state_path).unwrap_or_else(|e| {
        warn!("Ignoring unreadable state file: {:#}", e);
        AppliedState::default()
    })
}

/// Persist the applied-state marker for what the session just wrote.
///
/// A failure here is only logged: the hosts file is already written.
pub fn record_applied<F: FileSystem, O: Operator>(session: &Session<F, O>) {
    let state_path = &session.config().state_path;
    let mut state = load_state_or_default(state_path);
    state.record(
        session.hosts_path(),
        session.document().fingerprint(),
        session.document().entry_count(),
    );
    if let Err(e) = state.save(state_path) {
        warn!("Failed to save applied state: {:#}", e);
    }
}

/// Run the save flow and record the marker when the file was written
pub fn save_and_record<F: FileSystem, O: Operator>(
    session: &mut Session<F, O>,
) -> Result<SaveOutcome> {
    let outcome = session.save()?;
    if let SaveOutcome::Saved(_) = outcome {
        record_applied(session);
    }
    Ok(outcome)
}

/// Run the restore flow and record the marker when the file was written
pub fn restore_and_record<F: FileSystem, O: Operator>(
    session: &mut Session<F, O>,
) -> Result<RestoreOutcome> {
    let outcome = session.restore()?;
    if let RestoreOutcome::Restored(_) = outcome {
        record_applied(session);
    }
    Ok(outcome)
}
