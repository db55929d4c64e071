//! One-shot transformation commands: clean, dedup, filter, remove.

use anyhow::Result;
use std::path::Path;

use crate::fs_abstraction::FileSystem;
use crate::operator::{Operator, ReviewMode};
use crate::privilege::warn_if_unprivileged;
use crate::review::ReviewOutcome;
use crate::session::Session;

use super::{open_session, save_and_record};

/// Which transformation a one-shot command runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Clean,
    Dedup,
    Filter,
    Remove(String),
}

/// Run the transformation review, then the save flow if it was applied
pub async fn run(step: Step, mode: ReviewMode, config_path: &Path) -> Result<()> {
    warn_if_unprivileged();
    let mut session = open_session(config_path, mode)?;
    transform_and_save(&mut session, &step)?;
    Ok(())
}

/// Returns whether the hosts file went through the save flow
pub fn transform_and_save<F: FileSystem, O: Operator>(
    session: &mut Session<F, O>,
    step: &Step,
) -> Result<bool> {
    let outcome = match step {
        Step::Clean => session.clean()?,
        Step::Dedup => session.deduplicate()?,
        Step::Filter => session.filter_whitelist()?,
        Step::Remove(keyword) => session.remove_keyword(keyword)?,
    };

    match outcome {
        ReviewOutcome::Applied(_) => {
            save_and_record(session)?;
            Ok(true)
        }
        ReviewOutcome::NoChanges | ReviewOutcome::Cancelled => Ok(false),
    }
}
