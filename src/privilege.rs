//! Privilege detection for writing the hosts file.

use tracing::warn;

/// Whether the process runs with root privileges
#[cfg(unix)]
pub fn is_elevated() -> bool {
    // SAFETY: geteuid() is a simple syscall that reads the effective user ID.
    // It has no preconditions and never fails.
    unsafe { libc::geteuid() == 0 }
}

/// Whether the process runs with administrator privileges
#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    // No portable check; the write itself reports permission errors.
    true
}

/// Warn when the hosts file is unlikely to be writable.
///
/// Never fails: the write itself reports the real permission error.
pub fn warn_if_unprivileged() -> bool {
    let elevated = is_elevated();
    if !elevated {
        warn!("Not running as root. Saving changes to the hosts file will probably fail.");
    }
    elevated
}
