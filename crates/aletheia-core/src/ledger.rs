//! # Truth Ledger
//!
//! Append-only record of accepted truths, rejected candidates and finished
//! conclusion cycles.
//!
//! The ledger owns the session's `PersistentStore`. Every record is written
//! through to the store as it is appended; a failed write is logged and
//! the in-memory record is kept.

use crate::storage::PersistentStore;
use crate::types::{
    AletheiaError, ConclusionRecord, LogicTables, NotPremise, Severity, Timestamp, ValidTruth,
};

// =============================================================================
// WRITE FAILURE LOGGING
// =============================================================================

/// Log a failed store write. Writes never abort the reasoning session.
#[inline]
fn log_write(result: Result<(), AletheiaError>, context: &str) {
    if let Err(e) = result {
        tracing::warn!(context, "Storage error in {}: {}", context, e);
    }
}

// =============================================================================
// LEDGER ENTRY
// =============================================================================

/// One ledger record, for chronological replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEntry {
    Truth(ValidTruth),
    Rejected(NotPremise),
    Conclusion(ConclusionRecord),
}

impl LedgerEntry {
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Truth(t) => t.timestamp,
            Self::Rejected(n) => n.timestamp,
            Self::Conclusion(c) => c.timestamp,
        }
    }
}

// =============================================================================
// TRUTH LEDGER
// =============================================================================

/// Append-only ledger backed by a `PersistentStore`.
#[derive(Debug, Default)]
pub struct TruthLedger<S: PersistentStore> {
    store: S,
    truths: Vec<ValidTruth>,
    rejected: Vec<NotPremise>,
    conclusions: Vec<ConclusionRecord>,
}

impl<S: PersistentStore> TruthLedger<S> {
    /// Start an empty ledger writing to `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            truths: Vec::new(),
            rejected: Vec::new(),
            conclusions: Vec::new(),
        }
    }

    /// Reload the history already persisted in `store`.
    pub fn restore(store: S) -> Result<Self, AletheiaError> {
        let truths = store.list_truths()?;
        let rejected = store.list_not_premises()?;
        let conclusions = store.list_conclusions()?;
        tracing::info!(
            truths = truths.len(),
            rejected = rejected.len(),
            conclusions = conclusions.len(),
            "Restored ledger"
        );
        Ok(Self {
            store,
            truths,
            rejected,
            conclusions,
        })
    }

    /// Append an accepted truth.
    pub fn record_truth(&mut self, truth: ValidTruth) {
        log_write(self.store.append_truth(&truth), "append_truth");
        self.truths.push(truth);
    }

    /// Append a rejected candidate, logging it at its severity.
    pub fn reject(&mut self, entry: NotPremise) {
        match entry.severity {
            Severity::Info => tracing::info!(kind = %entry.kind, "{}", entry.message),
            Severity::Warning => tracing::warn!(kind = %entry.kind, "{}", entry.message),
            Severity::Error => tracing::error!(kind = %entry.kind, "{}", entry.message),
        }
        log_write(self.store.append_not_premise(&entry), "append_not_premise");
        self.rejected.push(entry);
    }

    /// Append the batch record of a finished conclusion cycle.
    pub fn record_conclusion(&mut self, record: ConclusionRecord) {
        log_write(self.store.append_conclusion(&record), "append_conclusion");
        self.conclusions.push(record);
    }

    /// Overwrite the persisted premise list.
    pub fn save_premises(&mut self, premises: &[String]) {
        log_write(self.store.save_premises(premises), "save_premises");
    }

    /// Overwrite the persisted engine snapshot.
    pub fn save_logic_tables(&mut self, tables: &LogicTables) {
        log_write(self.store.save_logic_tables(tables), "save_logic_tables");
    }

    #[must_use]
    pub fn truths(&self) -> &[ValidTruth] {
        &self.truths
    }

    #[must_use]
    pub fn rejected(&self) -> &[NotPremise] {
        &self.rejected
    }

    #[must_use]
    pub fn conclusions(&self) -> &[ConclusionRecord] {
        &self.conclusions
    }

    /// All records merged and sorted by timestamp.
    ///
    /// Records with equal timestamps keep truths, then rejections, then
    /// conclusions, each in append order.
    #[must_use]
    pub fn entries_chronological(&self) -> Vec<LedgerEntry> {
        let mut entries: Vec<LedgerEntry> = self
            .truths
            .iter()
            .cloned()
            .map(LedgerEntry::Truth)
            .chain(self.rejected.iter().cloned().map(LedgerEntry::Rejected))
            .chain(self.conclusions.iter().cloned().map(LedgerEntry::Conclusion))
            .collect();
        entries.sort_by_key(LedgerEntry::timestamp);
        entries
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, dropping the in-memory history.
    pub fn into_store(self) -> S {
        self.store
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::RejectionKind;
    use chrono::Duration;

    /// A store whose every write fails.
    struct BrokenStore;

    impl PersistentStore for BrokenStore {
        fn save_premises(&mut self, _: &[String]) -> Result<(), AletheiaError> {
            Err(AletheiaError::Storage("disk full".into()))
        }
        fn append_not_premise(&mut self, _: &NotPremise) -> Result<(), AletheiaError> {
            Err(AletheiaError::Storage("disk full".into()))
        }
        fn append_conclusion(&mut self, _: &ConclusionRecord) -> Result<(), AletheiaError> {
            Err(AletheiaError::Storage("disk full".into()))
        }
        fn append_truth(&mut self, _: &ValidTruth) -> Result<(), AletheiaError> {
            Err(AletheiaError::Storage("disk full".into()))
        }
        fn save_logic_tables(&mut self, _: &LogicTables) -> Result<(), AletheiaError> {
            Err(AletheiaError::Storage("disk full".into()))
        }
    }

    #[test]
    fn records_are_written_through() {
        let mut ledger = TruthLedger::new(MemoryStore::new());
        ledger.record_truth(ValidTruth::new("A or not A"));
        ledger.reject(NotPremise::new(
            RejectionKind::InvalidConclusion,
            Severity::Error,
            "socrates is mortal",
        ));

        assert_eq!(ledger.truths().len(), 1);
        assert_eq!(ledger.store().list_truths().expect("list").len(), 1);
        assert_eq!(ledger.store().list_not_premises().expect("list").len(), 1);
    }

    #[test]
    fn failed_writes_do_not_lose_memory_record() {
        let mut ledger = TruthLedger::new(BrokenStore);
        ledger.record_truth(ValidTruth::new("A or not A"));
        ledger.save_premises(&["p".to_string()]);
        assert_eq!(ledger.truths().len(), 1);
    }

    #[test]
    fn restore_reloads_history() {
        let mut ledger = TruthLedger::new(MemoryStore::new());
        ledger.record_truth(ValidTruth::new("A or not A"));
        let restored = TruthLedger::restore(ledger.into_store()).expect("restore");
        assert_eq!(restored.truths()[0].expression, "A or not A");
    }

    #[test]
    fn chronological_entries_sorted_by_timestamp() {
        let mut ledger = TruthLedger::new(MemoryStore::new());
        let mut late = ValidTruth::new("late");
        late.timestamp += Duration::seconds(10);
        ledger.record_truth(late);
        ledger.reject(NotPremise::new(
            RejectionKind::PremiseNotFound,
            Severity::Error,
            "early",
        ));

        let entries = ledger.entries_chronological();
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], LedgerEntry::Rejected(n) if n.message == "early"));
        assert!(matches!(&entries[1], LedgerEntry::Truth(t) if t.expression == "late"));
    }
}
