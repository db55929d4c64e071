//! Save command implementation.

use anyhow::Result;
use std::path::Path;

use crate::operator::ReviewMode;
use crate::privilege::warn_if_unprivileged;

use super::{open_session, save_and_record};

/// Clean the hosts file in place through review, with a backup
pub async fn run(mode: ReviewMode, config_path: &Path) -> Result<()> {
    warn_if_unprivileged();
    let mut session = open_session(config_path, mode)?;
    save_and_record(&mut session)?;
    Ok(())
}
