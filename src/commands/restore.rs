//! Restore command implementation.

use anyhow::Result;
use std::path::Path;

use crate::operator::ReviewMode;
use crate::privilege::warn_if_unprivileged;

use super::{open_session, restore_and_record};

/// Revert the hosts file to its backup.
///
/// The replaced content becomes the new backup, so running it twice
/// undoes the first restore.
pub async fn run(mode: ReviewMode, config_path: &Path) -> Result<()> {
    warn_if_unprivileged();
    let mut session = open_session(config_path, mode)?;
    restore_and_record(&mut session)?;
    Ok(())
}
