//! Editing session: owns the document and drives every change through review.
//!
//! The session is the only owner of the in-memory [`Document`]. Each
//! operation computes a candidate from the current lines, hands it to
//! [`review`] and only replaces the document when the operator applied it.
//! Saving and restoring additionally write the hosts file, always after a
//! backup of its previous content.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::clean::clean;
use crate::config::Config;
use crate::dedup::deduplicate;
use crate::document::Document;
use crate::error::HostsError;
use crate::fetcher::Fetcher;
use crate::format::counted;
use crate::fs_abstraction::FileSystem;
use crate::log_import::extract_hostnames;
use crate::operator::{Operator, Question};
use crate::review::{review, ReviewOutcome, Transformation};
use crate::storage::{BackupStatus, HostsStore};
use crate::validation::validate_keyword;
use crate::whitelist::filter_whitelisted;

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The hosts file already holds the document
    NoChanges,
    Saved(BackupStatus),
    Cancelled,
}

/// Result of a revert-to-backup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    NoBackup,
    /// The hosts file already matches the backup
    NoChanges,
    Restored(BackupStatus),
    Cancelled,
}

/// What an import added to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub origin: String,
    /// Lines appended below the separator
    pub appended: usize,
    /// Lines removed by the whitelist pass that followed
    pub whitelisted: usize,
}

/// Snapshot for the `status` display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub hosts_path: PathBuf,
    pub backup_path: PathBuf,
    pub lines: usize,
    pub entries: usize,
    pub applied: bool,
    pub has_backup: bool,
    pub whitelist_size: usize,
}

/// Interactive editing session over one hosts file
pub struct Session<F: FileSystem, O: Operator> {
    document: Document,
    /// Fingerprint of the content last loaded, saved or restored
    applied: Option<String>,
    store: HostsStore<F>,
    operator: O,
    config: Config,
}

impl<F: FileSystem, O: Operator> Session<F, O> {
    /// Create a session with an empty document; call [`Session::load`] next
    pub fn new(config: Config, fs: F, operator: O) -> Self {
        let store = HostsStore::new(fs, config.hosts_path.clone(), config.backup_path());
        Self {
            document: Document::new(),
            applied: None,
            store,
            operator,
            config,
        }
    }

    /// Create a session and load the hosts file
    pub fn open(config: Config, fs: F, operator: O) -> Result<Self> {
        let mut session = Self::new(config, fs, operator);
        session.load()?;
        Ok(session)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn hosts_path(&self) -> &Path {
        self.store.hosts_path()
    }

    /// Fingerprint of the content last loaded, saved or restored
    pub fn applied_marker(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Whether the document equals what was last durably applied
    pub fn is_applied(&self) -> bool {
        self.applied.as_deref() == Some(self.document.fingerprint().as_str())
    }

    /// Read the hosts file into the document.
    ///
    /// A missing file starts an empty document. On error the current
    /// document is kept.
    pub fn load(&mut self) -> Result<()> {
        match self.store.read()? {
            Some(content) => {
                self.document = Document::from_text(&content);
                self.applied = Some(self.document.fingerprint());
                self.operator.notify(&format!(
                    "Loaded '{}' ({})",
                    self.hosts_path().display(),
                    counted(self.document.len(), "line", "lines")
                ));
            }
            None => {
                self.document = Document::new();
                self.applied = None;
                self.operator.notify(&format!(
                    "Hosts file not found at '{}', starting with an empty document.",
                    self.hosts_path().display()
                ));
            }
        }
        Ok(())
    }

    /// Re-read the hosts file, asking first if edits would be lost
    pub fn reload(&mut self) -> Result<bool> {
        let persisted = self
            .store
            .read()?
            .map(|content| Document::from_text(&content))
            .unwrap_or_default();
        if persisted != self.document && !self.operator.confirm(Question::DiscardUnsavedEdits) {
            self.operator.notify("Reload cancelled.");
            return Ok(false);
        }
        self.load()?;
        Ok(true)
    }

    /// Propose the canonicalized document
    pub fn clean(&mut self) -> Result<ReviewOutcome> {
        let candidate = clean(self.document.lines());
        self.transform(Transformation::Clean, candidate)
    }

    /// Propose the document without repeated entries
    pub fn deduplicate(&mut self) -> Result<ReviewOutcome> {
        let candidate = deduplicate(self.document.lines());
        self.transform(Transformation::Deduplicate, candidate)
    }

    /// Propose the document without whitelisted entries
    pub fn filter_whitelist(&mut self) -> Result<ReviewOutcome> {
        let whitelist = self.config.whitelist_set();
        if whitelist.is_empty() {
            self.operator.notify("The whitelist is empty; nothing to filter.");
            return Ok(ReviewOutcome::NoChanges);
        }
        let candidate = filter_whitelisted(self.document.lines(), &whitelist);
        self.transform(Transformation::WhitelistFilter, candidate)
    }

    /// Propose removing lines containing `keyword` (case-insensitive).
    ///
    /// The operator picks which of the matching lines go.
    pub fn remove_keyword(&mut self, keyword: &str) -> Result<ReviewOutcome> {
        validate_keyword(keyword)?;
        let keyword = keyword.trim();
        let needle = keyword.to_lowercase();

        let lines = self.document.lines();
        let positions: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();

        if positions.is_empty() {
            self.operator.notify(&format!(
                "No entries were found containing '{}'.",
                keyword
            ));
            return Ok(ReviewOutcome::NoChanges);
        }

        let matches: Vec<String> = positions.iter().map(|&i| lines[i].clone()).collect();
        let chosen: BTreeSet<usize> = self
            .operator
            .select(keyword, &matches)
            .into_iter()
            .filter_map(|k| positions.get(k).copied())
            .collect();
        if chosen.is_empty() {
            self.operator.notify("No entries were selected for removal.");
            return Ok(ReviewOutcome::Cancelled);
        }
        debug!("Removing {} of {} matching lines", chosen.len(), matches.len());

        let candidate: Vec<String> = lines
            .iter()
            .enumerate()
            .filter(|(i, _)| !chosen.contains(i))
            .map(|(_, line)| line.clone())
            .collect();
        self.transform(Transformation::RemoveKeyword(keyword.to_string()), candidate)
    }

    fn transform(
        &mut self,
        transformation: Transformation,
        candidate: Vec<String>,
    ) -> Result<ReviewOutcome> {
        let title = transformation.title();
        debug!("Reviewing {}", transformation);
        let outcome = review(
            &self.operator,
            transformation,
            self.document.lines(),
            candidate,
        )?;

        match &outcome {
            ReviewOutcome::NoChanges => self.operator.notify("No changes found to apply."),
            ReviewOutcome::Applied(lines) => {
                self.document.set(lines.clone());
                self.operator
                    .notify(&format!("Changes from '{}' applied.", title));
            }
            ReviewOutcome::Cancelled => self.operator.notify("Changes discarded."),
        }
        Ok(outcome)
    }

    /// Append a line typed by the operator
    pub fn append_line(&mut self, line: &str) {
        self.document.push(line);
    }

    /// Delete a line by its 1-based number
    pub fn delete_line(&mut self, number: usize) -> Result<String> {
        number
            .checked_sub(1)
            .and_then(|index| self.document.remove(index))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No line {} (document has {} lines)",
                    number,
                    self.document.len()
                )
            })
    }

    /// Append imported lines under a separator, then drop whitelisted entries
    pub fn import_lines(&mut self, origin: &str, lines: Vec<String>) -> ImportSummary {
        if lines.is_empty() {
            self.operator
                .notify(&format!("No entries found in '{}'.", origin));
            return ImportSummary {
                origin: origin.to_string(),
                appended: 0,
                whitelisted: 0,
            };
        }

        let appended = lines.len();
        let mut imported = self.document.clone();
        imported.append_block(origin, lines);

        let filtered = filter_whitelisted(imported.lines(), &self.config.whitelist_set());
        let whitelisted = imported.len() - filtered.len();
        self.document.set(filtered);

        info!(
            "Imported {} lines from {} ({} whitelisted)",
            appended, origin, whitelisted
        );
        self.operator.notify(&format!(
            "Imported {} from '{}' ({} removed by whitelist). Run 'clean' to process them.",
            counted(appended, "line", "lines"),
            origin,
            whitelisted
        ));

        ImportSummary {
            origin: origin.to_string(),
            appended,
            whitelisted,
        }
    }

    /// Download a remote list and import it.
    ///
    /// The document is only touched once the whole body has arrived.
    pub async fn import_remote(
        &mut self,
        fetcher: &Fetcher,
        origin: &str,
        url: &str,
    ) -> Result<ImportSummary> {
        let result = fetcher.fetch_lines(url).await?;
        Ok(self.import_lines(origin, result.lines))
    }

    /// Import hostnames from a DNSBL log file
    pub fn import_log(&mut self, path: &Path) -> Result<ImportSummary> {
        let bytes = self
            .store
            .fs()
            .read(path)
            .map_err(|e| HostsError::io(path, e))?;
        let content = String::from_utf8_lossy(&bytes);
        let hosts = extract_hostnames(&content, &self.config.log_marker);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.import_lines(&name, hosts))
    }

    /// Save: whitelist filter then Clean, review, back up, write.
    ///
    /// When the composite changes nothing the review is skipped, but the
    /// document is still backed up and written if it differs from disk.
    pub fn save(&mut self) -> Result<SaveOutcome> {
        let whitelist = self.config.whitelist_set();
        let candidate = clean(&filter_whitelisted(self.document.lines(), &whitelist));

        let to_write = match review(
            &self.operator,
            Transformation::Save,
            self.document.lines(),
            candidate,
        )? {
            ReviewOutcome::Cancelled => {
                self.operator.notify("Save cancelled.");
                return Ok(SaveOutcome::Cancelled);
            }
            ReviewOutcome::NoChanges => self.document.clone(),
            ReviewOutcome::Applied(lines) => Document::from_lines(lines),
        };

        let persisted = self.store.read()?.map(|content| Document::from_text(&content));
        if persisted.as_ref() == Some(&to_write) {
            self.applied = Some(to_write.fingerprint());
            self.document = to_write;
            self.operator
                .notify("No changes to save; the hosts file is already up to date.");
            return Ok(SaveOutcome::NoChanges);
        }

        if to_write.is_blank() && !self.operator.confirm(Question::SaveEmptyDocument) {
            self.operator.notify("Save cancelled by user.");
            return Ok(SaveOutcome::Cancelled);
        }

        let Some(backup) = self.backup_or_confirm()? else {
            self.operator
                .notify("Save cancelled by user due to backup failure.");
            return Ok(SaveOutcome::Cancelled);
        };

        self.store
            .write(&to_write.to_text())
            .context("Save failed")?;

        self.applied = Some(to_write.fingerprint());
        self.document = to_write;
        self.operator.notify(&format!(
            "Successfully saved to '{}'; {}.",
            self.hosts_path().display(),
            backup
        ));
        Ok(SaveOutcome::Saved(backup))
    }

    /// Revert the hosts file to the backup slot, after review
    pub fn restore(&mut self) -> Result<RestoreOutcome> {
        let backup = match self.store.read_backup() {
            Ok(content) => content,
            Err(HostsError::NoBackup(path)) => {
                self.operator
                    .notify(&format!("No backup file found at '{}'.", path.display()));
                return Ok(RestoreOutcome::NoBackup);
            }
            Err(e) => return Err(e.into()),
        };

        let current = Document::from_text(&self.store.read()?.unwrap_or_default());
        let restored = Document::from_text(&backup);

        match review(
            &self.operator,
            Transformation::Restore,
            current.lines(),
            restored.lines().to_vec(),
        )? {
            ReviewOutcome::NoChanges => {
                self.operator
                    .notify("The hosts file already matches the backup.");
                return Ok(RestoreOutcome::NoChanges);
            }
            ReviewOutcome::Cancelled => {
                self.operator.notify("Restore cancelled.");
                return Ok(RestoreOutcome::Cancelled);
            }
            ReviewOutcome::Applied(_) => {}
        }

        let Some(backup_status) = self.backup_or_confirm()? else {
            self.operator
                .notify("Restore cancelled by user due to backup failure.");
            return Ok(RestoreOutcome::Cancelled);
        };

        if let Err(e) = self.store.write(&backup) {
            // The slot now holds the current file; put the previous backup back
            if let BackupStatus::Saved(_) = backup_status {
                if let Err(rollback) = self.store.write_backup(&backup) {
                    warn!(
                        "Could not put the previous backup back: {}",
                        rollback.with_causes()
                    );
                }
            }
            return Err(anyhow::Error::from(e).context("Restore failed"));
        }

        self.applied = Some(restored.fingerprint());
        self.document = restored;
        self.operator.notify(&format!(
            "Restored '{}' from backup; {}.",
            self.hosts_path().display(),
            backup_status
        ));
        Ok(RestoreOutcome::Restored(backup_status))
    }

    /// Back up the hosts file; on failure let the operator decide.
    ///
    /// Returns `None` when the operator chose to abort.
    fn backup_or_confirm(&self) -> Result<Option<BackupStatus>> {
        match self.store.capture_backup() {
            Ok(status) => Ok(Some(status)),
            Err(e @ HostsError::Backup { .. }) => {
                let reason = e.with_causes();
                warn!("{}", reason);
                let question = Question::ContinueWithoutBackup { reason };
                if self.operator.confirm(question) {
                    Ok(Some(BackupStatus::Skipped))
                } else {
                    Ok(None)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Snapshot of counts and markers
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            hosts_path: self.store.hosts_path().to_path_buf(),
            backup_path: self.store.backup_path().to_path_buf(),
            lines: self.document.len(),
            entries: self.document.entry_count(),
            applied: self.is_applied(),
            has_backup: self.store.has_backup(),
            whitelist_size: self.config.whitelist_set().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_abstraction::{MockFileSystem, RealFileSystem};
    use crate::operator::MockOperator;
    use crate::review::Decision;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn config_in(dir: &TempDir) -> Config {
        Config {
            hosts_path: dir.path().join("hosts"),
            state_path: dir.path().join("state.json"),
            ..Default::default()
        }
    }

    /// Operator that applies every review and accepts every question
    fn approving() -> MockOperator {
        let mut operator = MockOperator::new();
        operator.expect_notify().returning(|_| ());
        operator.expect_review().returning(|_, _| Decision::Apply);
        operator.expect_confirm().returning(|_| true);
        operator
            .expect_select()
            .returning(|_, matches| (0..matches.len()).collect());
        operator
    }

    /// Operator that fails the test if asked anything
    fn silent() -> MockOperator {
        let mut operator = MockOperator::new();
        operator.expect_notify().returning(|_| ());
        operator
    }

    fn open(
        dir: &TempDir,
        content: Option<&str>,
        operator: MockOperator,
    ) -> Session<RealFileSystem, MockOperator> {
        let config = config_in(dir);
        if let Some(content) = content {
            std::fs::write(&config.hosts_path, content).unwrap();
        }
        Session::open(config, RealFileSystem, operator).unwrap()
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let session = open(&dir, Some("# hosts\n0.0.0.0 a.com\n"), silent());
        assert_eq!(session.document().lines(), lines(&["# hosts", "0.0.0.0 a.com"]));
        assert!(session.is_applied());
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let session = open(&dir, None, silent());
        assert!(session.document().is_empty());
        assert!(session.applied_marker().is_none());
    }

    #[test]
    fn test_clean_applied_replaces_document() {
        let dir = TempDir::new().unwrap();
        let mut session = open(
            &dir,
            Some("example.com # ads\n*.tracker.net\n0.0.0.0 localhost\n"),
            approving(),
        );

        let outcome = session.clean().unwrap();
        let expected = lines(&["0.0.0.0 example.com", "0.0.0.0 tracker.net"]);
        assert_eq!(outcome, ReviewOutcome::Applied(expected.clone()));
        assert_eq!(session.document().lines(), expected);
        assert!(!session.is_applied());

        // Clean never writes the file
        let on_disk = std::fs::read_to_string(dir.path().join("hosts")).unwrap();
        assert!(on_disk.contains("*.tracker.net"));
    }

    #[test]
    fn test_cancelled_transformation_keeps_document() {
        let dir = TempDir::new().unwrap();
        let mut operator = silent();
        operator
            .expect_review()
            .times(1)
            .returning(|_, _| Decision::Cancel);
        let mut session = open(&dir, Some("a.com\nA.COM\n"), operator);

        assert_eq!(session.deduplicate().unwrap(), ReviewOutcome::Cancelled);
        assert_eq!(session.document().lines(), lines(&["a.com", "A.COM"]));
    }

    #[test]
    fn test_no_changes_skips_review() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 a.com\n"), silent());
        assert_eq!(session.clean().unwrap(), ReviewOutcome::NoChanges);
        assert_eq!(session.deduplicate().unwrap(), ReviewOutcome::NoChanges);
    }

    #[test]
    fn test_filter_whitelist_exact_match() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 ads.example.com\n"), approving());

        session.config_mut().whitelist = "example.com\n".to_string();
        assert_eq!(session.filter_whitelist().unwrap(), ReviewOutcome::NoChanges);

        session.config_mut().whitelist = "ads.example.com\n".to_string();
        assert_eq!(
            session.filter_whitelist().unwrap(),
            ReviewOutcome::Applied(Vec::new())
        );
    }

    #[test]
    fn test_remove_keyword() {
        let dir = TempDir::new().unwrap();
        let mut session = open(
            &dir,
            Some("0.0.0.0 ads.com\n0.0.0.0 good.org\n0.0.0.0 ADS.net\n"),
            approving(),
        );

        assert_eq!(
            session.remove_keyword("nomatch").unwrap(),
            ReviewOutcome::NoChanges
        );
        assert!(session.remove_keyword("   ").is_err());

        session.remove_keyword("ads").unwrap();
        assert_eq!(session.document().lines(), lines(&["0.0.0.0 good.org"]));
    }

    #[test]
    fn test_remove_keyword_only_selected_lines() {
        let dir = TempDir::new().unwrap();
        let mut operator = silent();
        operator
            .expect_select()
            .withf(|keyword, matches| {
                keyword == "ads"
                    && matches.len() == 2
                    && matches[0] == "0.0.0.0 ads.com"
                    && matches[1] == "0.0.0.0 ADS.net"
            })
            .times(1)
            .returning(|_, _| vec![1]);
        operator.expect_review().times(1).returning(|_, _| Decision::Apply);
        let mut session = open(
            &dir,
            Some("0.0.0.0 ads.com\n0.0.0.0 good.org\n0.0.0.0 ADS.net\n"),
            operator,
        );

        session.remove_keyword(" ads ").unwrap();
        assert_eq!(
            session.document().lines(),
            lines(&["0.0.0.0 ads.com", "0.0.0.0 good.org"])
        );
    }

    #[test]
    fn test_remove_keyword_nothing_selected() {
        let dir = TempDir::new().unwrap();
        let notes = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&notes);
        let mut operator = MockOperator::new();
        operator
            .expect_notify()
            .returning(move |message| recorded.lock().unwrap().push(message.to_string()));
        operator
            .expect_select()
            .times(1)
            .returning(|_, _| Vec::new());
        // No review is shown when nothing was picked
        let mut session = open(&dir, Some("0.0.0.0 ads.com\n"), operator);

        assert_eq!(session.remove_keyword("ads").unwrap(), ReviewOutcome::Cancelled);
        assert_eq!(session.document().lines(), lines(&["0.0.0.0 ads.com"]));
        assert_eq!(
            notes.lock().unwrap().last().map(String::as_str),
            Some("No entries were selected for removal.")
        );
    }

    #[test]
    fn test_direct_edits() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("a\nb\n"), silent());
        session.append_line("c");
        assert_eq!(session.delete_line(1).unwrap(), "a");
        assert!(session.delete_line(0).is_err());
        assert!(session.delete_line(9).is_err());
        assert_eq!(session.document().lines(), lines(&["b", "c"]));
    }

    #[test]
    fn test_import_lines_filters_whitelist() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 old.com\n"), silent());
        session.config_mut().whitelist = "good.com".to_string();

        let summary = session.import_lines(
            "list.txt",
            lines(&["0.0.0.0 good.com", "0.0.0.0 bad.com", "plain.com"]),
        );
        assert_eq!(summary.appended, 3);
        assert_eq!(summary.whitelisted, 1);
        assert_eq!(
            session.document().lines(),
            lines(&[
                "0.0.0.0 old.com",
                "",
                "# --- Imported from list.txt ---",
                "0.0.0.0 bad.com",
                "plain.com"
            ])
        );
    }

    #[test]
    fn test_import_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 a.com\n"), silent());
        let summary = session.import_lines("empty", Vec::new());
        assert_eq!(summary.appended, 0);
        assert_eq!(session.document().lines(), lines(&["0.0.0.0 a.com"]));
    }

    async fn serve_list(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list.txt"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_import_remote_appends_then_filters_whitelist() {
        let server = serve_list(200, "0.0.0.0 bad.com\n0.0.0.0 good.com\n").await;
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 old.com\n"), silent());
        session.config_mut().whitelist = "good.com".to_string();

        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/list.txt", server.uri());
        let summary = session.import_remote(&fetcher, "mylist", &url).await.unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                origin: "mylist".to_string(),
                appended: 2,
                whitelisted: 1,
            }
        );
        assert_eq!(
            session.document().lines(),
            lines(&[
                "0.0.0.0 old.com",
                "",
                "# --- Imported from mylist ---",
                "0.0.0.0 bad.com"
            ])
        );
        assert!(!session.is_applied());
    }

    #[tokio::test]
    async fn test_import_remote_failure_leaves_document() {
        let server = serve_list(500, "boom").await;
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 old.com\n"), silent());

        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/list.txt", server.uri());
        let err = session
            .import_remote(&fetcher, "mylist", &url)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<HostsError>(),
            Some(HostsError::Network(_))
        ));
        assert_eq!(session.document().lines(), lines(&["0.0.0.0 old.com"]));
        assert!(session.is_applied());
    }

    #[test]
    fn test_import_log() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("dnsbl.log");
        std::fs::write(
            &log_path,
            "DNSBL-Full,t,z.com,1\nDNSBL-Full,t,a.com,1\nother,t,skip.com\nDNSBL-Full,t,a.com,2\n",
        )
        .unwrap();

        let mut session = open(&dir, None, silent());
        let summary = session.import_log(&log_path).unwrap();
        assert_eq!(summary.appended, 2);
        assert_eq!(
            session.document().lines(),
            lines(&["# --- Imported from dnsbl.log ---", "a.com", "z.com"])
        );
    }

    #[test]
    fn test_import_log_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 a.com\n"), silent());
        let err = session.import_log(&dir.path().join("absent.log")).unwrap_err();
        assert!(err.to_string().contains("absent.log"));
        assert_eq!(session.document().lines(), lines(&["0.0.0.0 a.com"]));
    }

    #[test]
    fn test_save_without_prior_file_then_restore_reports_no_backup() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, None, approving());
        session.append_line("ads.com");

        let outcome = session.save().unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(BackupStatus::NoOriginal));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts")).unwrap(),
            "0.0.0.0 ads.com\n"
        );
        assert!(session.is_applied());

        assert_eq!(session.restore().unwrap(), RestoreOutcome::NoBackup);
    }

    #[test]
    fn test_save_noop_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 a.com\n"), silent());

        assert_eq!(session.save().unwrap(), SaveOutcome::NoChanges);
        assert!(!dir.path().join("hosts.txt").exists());
    }

    #[test]
    fn test_save_noop_composite_still_writes_edited_document() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 a.com\n"), silent());
        session.append_line("0.0.0.0 b.com");

        // Already canonical: no review, but the file is backed up and written
        let outcome = session.save().unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved(BackupStatus::Saved(dir.path().join("hosts.txt")))
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts.txt")).unwrap(),
            "0.0.0.0 a.com\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts")).unwrap(),
            "0.0.0.0 a.com\n0.0.0.0 b.com\n"
        );
    }

    #[test]
    fn test_save_applies_whitelist_then_clean() {
        let dir = TempDir::new().unwrap();
        let mut session = open(
            &dir,
            Some("# mine\n0.0.0.0 keep.me\nzzz.com\n0.0.0.0 good.com\n"),
            approving(),
        );
        session.config_mut().whitelist = "good.com".to_string();

        session.save().unwrap();
        assert_eq!(
            session.document().lines(),
            lines(&["0.0.0.0 keep.me", "0.0.0.0 zzz.com"])
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts.txt")).unwrap(),
            "# mine\n0.0.0.0 keep.me\nzzz.com\n0.0.0.0 good.com\n"
        );
    }

    #[test]
    fn test_save_cancelled_review_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut operator = silent();
        operator
            .expect_review()
            .times(1)
            .returning(|_, _| Decision::Cancel);
        let mut session = open(&dir, Some("ads.com\n"), operator);

        assert_eq!(session.save().unwrap(), SaveOutcome::Cancelled);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts")).unwrap(),
            "ads.com\n"
        );
        assert!(!dir.path().join("hosts.txt").exists());
        assert_eq!(session.document().lines(), lines(&["ads.com"]));
    }

    #[test]
    fn test_save_empty_document_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut operator = silent();
        operator
            .expect_confirm()
            .withf(|q| *q == Question::SaveEmptyDocument)
            .times(1)
            .returning(|_| false);
        let mut session = open(&dir, Some("0.0.0.0 a.com\n"), operator);
        session.delete_line(1).unwrap();

        assert_eq!(session.save().unwrap(), SaveOutcome::Cancelled);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts")).unwrap(),
            "0.0.0.0 a.com\n"
        );
    }

    #[test]
    fn test_restore_swaps_with_backup() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("0.0.0.0 old.com\n"), approving());
        session.append_line("0.0.0.0 new.com");
        session.save().unwrap();

        let outcome = session.restore().unwrap();
        assert!(matches!(outcome, RestoreOutcome::Restored(BackupStatus::Saved(_))));
        assert_eq!(session.document().lines(), lines(&["0.0.0.0 old.com"]));
        assert!(session.is_applied());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts")).unwrap(),
            "0.0.0.0 old.com\n"
        );
        // The content replaced by the restore is now the backup
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts.txt")).unwrap(),
            "0.0.0.0 old.com\n0.0.0.0 new.com\n"
        );

        // Nothing left to restore once both match
        std::fs::write(dir.path().join("hosts.txt"), "0.0.0.0 old.com\n").unwrap();
        assert_eq!(session.restore().unwrap(), RestoreOutcome::NoChanges);
    }

    #[test]
    fn test_restore_cancelled() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hosts.txt"), "0.0.0.0 backup.com\n").unwrap();
        let mut operator = silent();
        operator
            .expect_review()
            .withf(|title, _| title == "Preview: Revert to backup")
            .times(1)
            .returning(|_, _| Decision::Cancel);
        let mut session = open(&dir, Some("0.0.0.0 current.com\n"), operator);

        assert_eq!(session.restore().unwrap(), RestoreOutcome::Cancelled);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hosts")).unwrap(),
            "0.0.0.0 current.com\n"
        );
    }

    #[test]
    fn test_reload_asks_before_discarding_edits() {
        let dir = TempDir::new().unwrap();
        let mut operator = silent();
        operator
            .expect_confirm()
            .withf(|q| *q == Question::DiscardUnsavedEdits)
            .times(1)
            .returning(|_| false);
        let mut session = open(&dir, Some("0.0.0.0 a.com\n"), operator);

        // Unchanged document reloads without asking
        assert!(session.reload().unwrap());

        session.append_line("edit");
        assert!(!session.reload().unwrap());
        assert_eq!(session.document().len(), 2);
    }

    #[test]
    fn test_status() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir, Some("# c\n0.0.0.0 a.com\n"), silent());
        session.config_mut().whitelist = "x.com\ny.com\n".to_string();

        let status = session.status();
        assert_eq!(status.lines, 2);
        assert_eq!(status.entries, 1);
        assert!(status.applied);
        assert!(!status.has_backup);
        assert_eq!(status.whitelist_size, 2);
    }

    fn mock_store_fs(existing: &'static str) -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("/etc/hosts"))
            .returning(|_| true);
        fs.expect_read_to_string()
            .withf(|p| p == Path::new("/etc/hosts"))
            .returning(move |_| Ok(existing.to_string()));
        fs
    }

    fn mock_config() -> Config {
        Config {
            hosts_path: PathBuf::from("/etc/hosts"),
            ..Default::default()
        }
    }

    #[test]
    fn test_backup_failure_abort_keeps_file() {
        let mut fs = mock_store_fs("ads.com\n");
        fs.expect_write()
            .withf(|p, _| p == Path::new("/etc/hosts.txt"))
            .times(1)
            .returning(|_, _| Err(io::Error::new(io::ErrorKind::Other, "disk full")));
        // The hosts file itself must never be written

        let mut operator = silent();
        operator.expect_review().returning(|_, _| Decision::Apply);
        operator
            .expect_confirm()
            .withf(|q| matches!(q, Question::ContinueWithoutBackup { reason } if reason.contains("disk full")))
            .times(1)
            .returning(|_| false);

        let mut session = Session::open(mock_config(), fs, operator).unwrap();
        assert_eq!(session.save().unwrap(), SaveOutcome::Cancelled);
        assert_eq!(session.document().lines(), lines(&["ads.com"]));
    }

    #[test]
    fn test_backup_failure_continue_writes_without_backup() {
        let mut fs = mock_store_fs("ads.com\n");
        fs.expect_write()
            .withf(|p, _| p == Path::new("/etc/hosts.txt"))
            .times(1)
            .returning(|_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        fs.expect_write()
            .withf(|p, c| p == Path::new("/etc/hosts") && c == b"0.0.0.0 ads.com\n")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut session = Session::open(mock_config(), fs, approving()).unwrap();
        assert_eq!(
            session.save().unwrap(),
            SaveOutcome::Saved(BackupStatus::Skipped)
        );
    }

    #[test]
    fn test_restore_write_failure_puts_previous_backup_back() {
        let mut fs = mock_store_fs("0.0.0.0 new.com\n");
        fs.expect_exists()
            .withf(|p| p == Path::new("/etc/hosts.txt"))
            .returning(|_| true);
        fs.expect_read_to_string()
            .withf(|p| p == Path::new("/etc/hosts.txt"))
            .returning(|_| Ok("0.0.0.0 old.com\n".to_string()));

        let slot = Arc::new(Mutex::new(Vec::new()));
        let written = Arc::clone(&slot);
        fs.expect_write()
            .withf(|p, _| p == Path::new("/etc/hosts.txt"))
            .returning(move |_, content| {
                written
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(content).into_owned());
                Ok(())
            });
        fs.expect_write()
            .withf(|p, _| p == Path::new("/etc/hosts"))
            .times(1)
            .returning(|_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));

        let mut session = Session::open(mock_config(), fs, approving()).unwrap();
        let err = session.restore().unwrap_err();
        assert!(format!("{:#}", err).starts_with("Restore failed"));

        // Captured the current file, then rolled the slot back
        assert_eq!(
            *slot.lock().unwrap(),
            ["0.0.0.0 new.com\n", "0.0.0.0 old.com\n"]
        );
        assert_eq!(session.document().lines(), lines(&["0.0.0.0 new.com"]));
        assert!(session.is_applied());
    }

    #[test]
    fn test_write_failure_leaves_document_unchanged() {
        let mut fs = mock_store_fs("ads.com\n");
        fs.expect_write()
            .withf(|p, _| p == Path::new("/etc/hosts.txt"))
            .returning(|_, _| Ok(()));
        fs.expect_write()
            .withf(|p, _| p == Path::new("/etc/hosts"))
            .returning(|_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));

        let mut session = Session::open(mock_config(), fs, approving()).unwrap();
        let err = session.save().unwrap_err();
        let io_err = err.downcast_ref::<HostsError>();
        assert!(matches!(io_err, Some(HostsError::Io { .. })));
        assert_eq!(session.document().lines(), lines(&["ads.com"]));
        assert!(session.is_applied());
    }
}
