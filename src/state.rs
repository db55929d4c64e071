//! Applied-state marker persistence.
//!
//! Records the fingerprint of the content hostscrub last wrote to (or
//! restored into) the hosts file. It only feeds the `status` display; no
//! operation is ever allowed or refused because of it.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Last durably applied content
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppliedState {
    pub hosts_path: Option<PathBuf>,
    pub fingerprint: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub entries: usize,
}

/// How the hosts file relates to the recorded marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedStatus {
    /// Nothing recorded for this hosts file
    Unknown,
    /// The file still holds what was last applied
    Matches,
    /// The file changed since it was last applied
    Modified,
}

impl AppliedState {
    /// Load state from file; a missing file means nothing was applied yet
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read state file: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse state file: {:?}", path))
        } else {
            Ok(Self::default())
        }
    }

    /// Save state to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write state file: {:?}", path))?;
        Ok(())
    }

    /// Record a completed save or restore
    pub fn record(&mut self, hosts_path: &Path, fingerprint: String, entries: usize) {
        self.hosts_path = Some(hosts_path.to_path_buf());
        self.fingerprint = Some(fingerprint);
        self.entries = entries;
        self.applied_at = Some(Utc::now());
    }

    /// Compare a hosts file fingerprint with the recorded one
    pub fn status_of(&self, hosts_path: &Path, fingerprint: &str) -> AppliedStatus {
        match (&self.hosts_path, &self.fingerprint) {
            (Some(path), Some(recorded)) if path == hosts_path => {
                if recorded == fingerprint {
                    AppliedStatus::Matches
                } else {
                    AppliedStatus::Modified
                }
            }
            _ => AppliedStatus::Unknown,
        }
    }

    /// Local time of the last apply, for display
    pub fn applied_at_display(&self) -> Option<String> {
        self.applied_at.map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
    }
}

/// Format how long ago a timestamp was
pub fn format_age(when: DateTime<Utc>) -> String {
    let seconds = (Utc::now() - when).num_seconds().max(0);
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86400)
    }
}
