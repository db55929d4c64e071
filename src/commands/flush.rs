//! DNS flush command implementation.

use anyhow::Result;

use crate::cmd_abstraction::RealCommandExecutor;
use crate::flush::flush_dns;

/// Flush the OS resolver cache
pub async fn run() -> Result<()> {
    flush_dns(&RealCommandExecutor::new())?;
    println!("[OK] DNS cache flushed");
    Ok(())
}
