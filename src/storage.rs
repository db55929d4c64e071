//! Persisted hosts file and its single backup slot.
//!
//! Writes are whole-content replacements. The backup holds the content the
//! hosts file had right before the most recent write or restore; there is
//! only one slot and it is overwritten every time.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::HostsError;
use crate::fs_abstraction::FileSystem;

/// What happened when a backup was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    /// Previous content copied to this path
    Saved(PathBuf),
    /// There was no hosts file yet, so nothing to back up
    NoOriginal,
    /// Backup failed and the operator chose to continue without it
    Skipped,
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(path) => write!(f, "backup is at '{}'", path.display()),
            Self::NoOriginal => f.write_str("no backup possible (original file did not exist)"),
            Self::Skipped => f.write_str("saved WITHOUT a backup"),
        }
    }
}

/// Hosts file plus backup, accessed through a [`FileSystem`]
#[derive(Debug, Clone)]
pub struct HostsStore<F: FileSystem> {
    fs: F,
    hosts_path: PathBuf,
    backup_path: PathBuf,
}

impl<F: FileSystem> HostsStore<F> {
    pub fn new(fs: F, hosts_path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            hosts_path: hosts_path.into(),
            backup_path: backup_path.into(),
        }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn hosts_path(&self) -> &Path {
        &self.hosts_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn has_backup(&self) -> bool {
        self.fs.exists(&self.backup_path)
    }

    /// Current hosts content, or `None` when the file does not exist
    pub fn read(&self) -> Result<Option<String>, HostsError> {
        if !self.fs.exists(&self.hosts_path) {
            return Ok(None);
        }
        self.fs
            .read_to_string(&self.hosts_path)
            .map(Some)
            .map_err(|e| HostsError::io(&self.hosts_path, e))
    }

    /// Content of the backup slot
    pub fn read_backup(&self) -> Result<String, HostsError> {
        if !self.fs.exists(&self.backup_path) {
            return Err(HostsError::NoBackup(self.backup_path.clone()));
        }
        self.fs
            .read_to_string(&self.backup_path)
            .map_err(|e| HostsError::io(&self.backup_path, e))
    }

    /// Copy the current hosts content into the backup slot
    pub fn capture_backup(&self) -> Result<BackupStatus, HostsError> {
        if !self.fs.exists(&self.hosts_path) {
            debug!("No hosts file at {:?}, nothing to back up", self.hosts_path);
            return Ok(BackupStatus::NoOriginal);
        }

        let backup_error = |source: std::io::Error| HostsError::Backup {
            path: self.backup_path.clone(),
            source,
        };
        let content = self
            .fs
            .read_to_string(&self.hosts_path)
            .map_err(backup_error)?;
        self.fs
            .write(&self.backup_path, content.as_bytes())
            .map_err(backup_error)?;

        info!("Backed up {:?} to {:?}", self.hosts_path, self.backup_path);
        Ok(BackupStatus::Saved(self.backup_path.clone()))
    }

    /// Put `content` back into the backup slot
    pub fn write_backup(&self, content: &str) -> Result<(), HostsError> {
        self.fs
            .write(&self.backup_path, content.as_bytes())
            .map_err(|source| HostsError::Backup {
                path: self.backup_path.clone(),
                source,
            })?;
        info!("Wrote {} bytes to backup {:?}", content.len(), self.backup_path);
        Ok(())
    }

    /// Replace the hosts file content in a single write
    pub fn write(&self, content: &str) -> Result<(), HostsError> {
        self.fs
            .write(&self.hosts_path, content.as_bytes())
            .map_err(|e| HostsError::io(&self.hosts_path, e))?;
        info!("Wrote {} bytes to {:?}", content.len(), self.hosts_path);
        Ok(())
    }
}
