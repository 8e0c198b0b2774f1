mod diagnostics;
mod file;
mod pending;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use playtime_core::{DurationRecord, format_duration};
use playtime_store::Storage;

use crate::error::LedgerError;

pub use diagnostics::LedgerIssue;
pub use file::{LEDGER_FILE_NAME, LEDGER_MIME_TYPE, LOG_DIR_NAME};

use diagnostics::IssueLog;
use file::{Entries, load_entries, save_entries};
use pending::PendingChanges;

struct LedgerState {
    entries: Entries,
    issues: IssueLog,
    pending: PendingChanges,
    warm: bool,
}

/// Cumulative play time per title, persisted as `log/playtime.json`.
///
/// Every operation runs under one lock, so a reload-modify-save sequence is
/// atomic with respect to other calls on the same ledger. Reads always reload
/// the file first; mutations reload, apply, then write the whole map back.
/// Mutations whose save failed are replayed over every reload until a later
/// save succeeds. Storage problems never reach callers of the plain
/// operations, they are kept as [`LedgerIssue`]s and logged.
pub struct Ledger {
    storage: Arc<dyn Storage>,
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// Opens the ledger and performs the initial load. A missing or broken
    /// file yields an empty ledger.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let ledger = Self {
            storage,
            state: Mutex::new(LedgerState {
                entries: Entries::new(),
                issues: IssueLog::default(),
                pending: PendingChanges::default(),
                warm: false,
            }),
        };
        {
            let mut state = ledger.state();
            ledger.refresh(&mut state);
        }
        ledger
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        // Entries are plain data and never left half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds one finished session for `id`. Save failures are logged and the
    /// in-memory total is kept.
    pub fn accumulate(&self, id: u64, label: &str, delta_ms: u64) {
        let _ = self.try_accumulate(id, label, delta_ms);
    }

    /// Like [`Ledger::accumulate`], but reports a failed save. The update is
    /// kept either way; [`Ledger::try_flush`] or any later mutation saves it.
    pub fn try_accumulate(&self, id: u64, label: &str, delta_ms: u64) -> Result<(), LedgerError> {
        let mut state = self.state();
        self.refresh(&mut state);
        state
            .entries
            .entry(id)
            .or_insert_with(|| DurationRecord::new(id, label))
            .add_session(label, delta_ms);
        state.pending.add_session(id, label, delta_ms);
        self.persist(&mut state)
    }

    /// Formatted total for `id`, e.g. `1h 2m 5s`. Unknown ids read as `0s`.
    pub fn query(&self, id: u64) -> String {
        format_duration(self.total_ms(id))
    }

    pub fn total_ms(&self, id: u64) -> u64 {
        let mut state = self.state();
        self.refresh(&mut state);
        state
            .entries
            .get(&id)
            .map(|record| record.total_duration_ms)
            .unwrap_or(0)
    }

    /// All records sorted by id, after a reload.
    pub fn records(&self) -> Vec<DurationRecord> {
        let mut state = self.state();
        self.refresh(&mut state);
        state.entries.values().cloned().collect()
    }

    pub fn delete(&self, id: u64) {
        let _ = self.try_delete(id);
    }

    pub fn try_delete(&self, id: u64) -> Result<(), LedgerError> {
        let mut state = self.state();
        self.refresh(&mut state);
        state.entries.remove(&id);
        state.pending.delete(id);
        self.persist(&mut state)
    }

    /// Saves mutations left unsaved by earlier failures. Succeeds at once
    /// when nothing is pending.
    pub fn try_flush(&self) -> Result<(), LedgerError> {
        let mut state = self.state();
        if state.pending.is_empty() {
            return Ok(());
        }
        self.refresh(&mut state);
        self.persist(&mut state)
    }

    /// Number of titles with changes not yet saved.
    pub fn pending_changes(&self) -> usize {
        self.state().pending.len()
    }

    /// Replaces the cache with the file content, plus any unsaved changes, and
    /// returns the record count. On failure the cache is left as it was.
    pub fn try_reload(&self) -> Result<usize, LedgerError> {
        let mut state = self.state();
        let mut entries = load_entries(self.storage.as_ref())?;
        state.pending.apply(&mut entries);
        let count = entries.len();
        state.entries = entries;
        state.warm = true;
        Ok(count)
    }

    /// Whether any load has succeeded since the ledger was opened.
    pub fn is_warm(&self) -> bool {
        self.state().warm
    }

    pub fn issues(&self) -> Vec<LedgerIssue> {
        self.state().issues.snapshot()
    }

    pub fn take_issues(&self) -> Vec<LedgerIssue> {
        self.state().issues.drain()
    }

    fn refresh(&self, state: &mut LedgerState) {
        match load_entries(self.storage.as_ref()) {
            Ok(mut entries) => {
                tracing::debug!(records = entries.len(), "loaded play times");
                state.pending.apply(&mut entries);
                state.entries = entries;
                state.warm = true;
            }
            Err(err) => state.issues.record(&err),
        }
    }

    fn persist(&self, state: &mut LedgerState) -> Result<(), LedgerError> {
        match save_entries(self.storage.as_ref(), &state.entries) {
            Ok(()) => {
                tracing::debug!(records = state.entries.len(), "saved play times");
                state.pending.clear();
                Ok(())
            }
            Err(err) => {
                state.issues.record(&err);
                Err(err)
            }
        }
    }
}
