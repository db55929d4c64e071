//! Configuration management for hostscrub.
//!
//! The configuration is a small YAML file holding where the hosts file and
//! its backup live, the whitelist text and the custom blocklist sources. It
//! is read when a command starts and written back when a command that
//! changed it finishes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::HostsError;
use crate::validation::{validate_source_name, validate_url};
use crate::whitelist::{normalize_host, WhitelistSet};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hostscrub/config.yaml";

/// File name of the backup written next to the hosts file
pub const BACKUP_FILE_NAME: &str = "hosts.txt";

/// Marker identifying pfSense DNSBL log lines
pub const DEFAULT_LOG_MARKER: &str = "DNSBL-Full";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const MAX_FETCH_TIMEOUT_SECS: u64 = 600;

/// Platform hosts file location
pub fn default_hosts_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Hosts file being managed
    pub hosts_path: PathBuf,

    /// Backup slot; defaults to `hosts.txt` beside the hosts file
    pub backup_path: Option<PathBuf>,

    /// Where the applied-state marker is kept
    pub state_path: PathBuf,

    /// Whitelist text, one hostname per line
    pub whitelist: String,

    /// Custom blocklist sources
    pub sources: Vec<Source>,

    /// First-field marker of log lines to import
    pub log_marker: String,

    /// HTTP timeout for remote imports
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_path: default_hosts_path(),
            backup_path: None,
            state_path: PathBuf::from("/var/lib/hostscrub/state.json"),
            whitelist: String::new(),
            sources: default_sources(),
            log_marker: DEFAULT_LOG_MARKER.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// A named remote blocklist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

fn default_sources() -> Vec<Source> {
    vec![Source {
        name: "stevenblack".to_string(),
        url: "https://raw.githubusercontent.com/StevenBlack/hosts/master/hosts".to_string(),
    }]
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the configuration, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path.as_ref());
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(Into::into)
    }

    fn check(&self) -> Result<(), HostsError> {
        if self.hosts_path.as_os_str().is_empty() {
            return Err(HostsError::Config("hosts_path must not be empty".into()));
        }

        if self.fetch_timeout_secs == 0 || self.fetch_timeout_secs > MAX_FETCH_TIMEOUT_SECS {
            return Err(HostsError::Config(format!(
                "Invalid fetch_timeout_secs {}. Use a value between 1 and {}",
                self.fetch_timeout_secs, MAX_FETCH_TIMEOUT_SECS
            )));
        }

        if self.log_marker.trim().is_empty() {
            return Err(HostsError::Config("log_marker must not be empty".into()));
        }

        for (i, source) in self.sources.iter().enumerate() {
            validate_source_name(&source.name)
                .and_then(|()| validate_url(&source.url).map(drop))
                .map_err(|e| HostsError::Config(format!("Source '{}': {:#}", source.name, e)))?;
            if self.sources[..i].iter().any(|s| s.name == source.name) {
                return Err(HostsError::Config(format!(
                    "Duplicate source name '{}'",
                    source.name
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;

        let parent_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", parent_dir))?;
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Effective backup location
    pub fn backup_path(&self) -> PathBuf {
        match &self.backup_path {
            Some(path) => path.clone(),
            None => self
                .hosts_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(BACKUP_FILE_NAME),
        }
    }

    /// Parse the whitelist text as it is right now
    pub fn whitelist_set(&self) -> WhitelistSet {
        WhitelistSet::parse(&self.whitelist)
    }

    /// Append a hostname to the whitelist text; false if already present
    pub fn add_whitelist_host(&mut self, host: &str) -> bool {
        let Some(normalized) = normalize_host(host) else {
            return false;
        };
        if self.whitelist_set().contains(&normalized) {
            return false;
        }
        if !self.whitelist.is_empty() && !self.whitelist.ends_with('\n') {
            self.whitelist.push('\n');
        }
        self.whitelist.push_str(&normalized);
        self.whitelist.push('\n');
        true
    }

    /// Remove every whitelist line naming `host`; false if none matched
    pub fn remove_whitelist_host(&mut self, host: &str) -> bool {
        let Some(target) = normalize_host(host) else {
            return false;
        };
        let before = self.whitelist.lines().count();
        let kept: Vec<&str> = self
            .whitelist
            .lines()
            .filter(|line| normalize_host(line).as_deref() != Some(target.as_str()))
            .collect();
        if kept.len() == before {
            return false;
        }
        self.whitelist = crate::document::render(
            &kept.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        );
        true
    }

    /// Look up a source by name
    pub fn find_source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Add a source after validating it
    pub fn add_source(&mut self, name: &str, url: &str) -> Result<()> {
        validate_source_name(name)?;
        validate_url(url)?;
        if self.find_source(name).is_some() {
            anyhow::bail!("A source named '{}' already exists", name);
        }
        self.sources.push(Source {
            name: name.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    /// Remove a source by name; false if it did not exist
    pub fn remove_source(&mut self, name: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.name != name);
        self.sources.len() != before
    }
}
