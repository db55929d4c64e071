//! DNS resolver cache flush.
//!
//! Changes to the hosts file are only picked up once cached answers expire,
//! so after a save the operator can ask the OS resolver to drop its cache.

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::cmd_abstraction::{args_to_strings, CommandExecutor};

const RESOLVECTL_ARGS: &[&str] = &["flush-caches"];
const DSCACHEUTIL_ARGS: &[&str] = &["-flushcache"];
const IPCONFIG_ARGS: &[&str] = &["/flushdns"];

/// Flush command for an OS name as reported by `std::env::consts::OS`
pub fn flush_command_for(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        "linux" => Some(("resolvectl", RESOLVECTL_ARGS)),
        "macos" => Some(("dscacheutil", DSCACHEUTIL_ARGS)),
        "windows" => Some(("ipconfig", IPCONFIG_ARGS)),
        _ => None,
    }
}

/// Flush the resolver cache of the running OS
pub fn flush_dns(executor: &dyn CommandExecutor) -> Result<()> {
    flush_dns_for(executor, std::env::consts::OS)
}

/// Flush the resolver cache using the command for `os`
pub fn flush_dns_for(executor: &dyn CommandExecutor, os: &str) -> Result<()> {
    let Some((cmd, args)) = flush_command_for(os) else {
        bail!("Flushing the DNS cache is not supported on {}", os);
    };

    debug!("Running {} {}", cmd, args.join(" "));
    let output = executor.execute(cmd, &args_to_strings(args))?;
    if !output.success {
        let detail = if output.stderr.trim().is_empty() {
            output.stdout.trim().to_string()
        } else {
            output.stderr.trim().to_string()
        };
        bail!(
            "{} exited with code {}: {}",
            cmd,
            output
                .code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".to_string()),
            detail
        );
    }

    info!("Flushed the DNS resolver cache");
    Ok(())
}
