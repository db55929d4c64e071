//! # hostscrub - hosts-file blocklist cleaner
//!
//! Maintains a hosts file used as a DNS blocklist: every entry is rewritten
//! to `0.0.0.0 <host>`, duplicates and whitelisted hosts are removed, and
//! lists can be imported from URLs or pfSense DNSBL logs.
//!
//! Every change is shown as a line diff and applied only after review. The
//! hosts file is never written without first copying its previous content
//! to a backup slot, and restoring swaps the two.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        hostscrub                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: shell, clean, save, restore, import...     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Session                                                    │
//! │    ├── Document (in-memory lines)                           │
//! │    └── Change review (diff → operator → apply/cancel)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Transformations                                            │
//! │    ├── clean, dedup, whitelist filter, keyword removal      │
//! │    └── diff (similar, Myers)                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Storage (FileSystem trait)                                 │
//! │    └── hosts file + single backup slot                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml) / applied state (serde_json)           │
//! │  Fetcher (reqwest + rustls)                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use hostscrub::config::Config;
//! use hostscrub::fs_abstraction::RealFileSystem;
//! use hostscrub::operator::{ConsoleOperator, ReviewMode};
//! use hostscrub::session::Session;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("/etc/hostscrub/config.yaml")?;
//!     let operator = ConsoleOperator::new(ReviewMode::Interactive);
//!     let mut session = Session::open(config, RealFileSystem, operator)?;
//!
//!     // Review the canonicalized document, then write it with a backup
//!     session.clean()?;
//!     session.save()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`clean`] - Canonicalization of block entries
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`dedup`] - Order-preserving duplicate removal
//! - [`diff`] - Line diffs between document versions
//! - [`document`] - The in-memory hosts document
//! - [`fetcher`] - HTTP client for remote lists
//! - [`flush`] - DNS resolver cache flush
//! - [`log_import`] - Hostname extraction from DNSBL logs
//! - [`operator`] - Review decisions and confirmations
//! - [`review`] - The change-review protocol
//! - [`session`] - Editing session tying it all together
//! - [`state`] - Applied-state marker persistence
//! - [`storage`] - Hosts file and backup slot I/O
//! - [`whitelist`] - Whitelist parsing and filtering
//! - [`format`] - Counts, sizes and column clipping for output

pub mod clean;
pub mod cli;
pub mod cmd_abstraction;
pub mod commands;
pub mod config;
pub mod dedup;
pub mod diff;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod flush;
pub mod format;
pub mod fs_abstraction;
pub mod log_import;
pub mod operator;
pub mod privilege;
pub mod review;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;
pub mod whitelist;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::HostsError;
pub use session::Session;
