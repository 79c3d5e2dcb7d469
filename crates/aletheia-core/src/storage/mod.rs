//! # Storage Module
//!
//! The persistence collaborator of a reasoning session.
//!
//! Writes are fire-and-forget from the core's point of view: the session
//! logs a failed write and carries on. Read-back is only used when a
//! session is restored after a restart.
//!
//! ## Backends
//!
//! - `MemoryStore`: volatile, used by tests and `--memory` runs
//! - `RedbStore`: disk-backed ACID storage on redb

mod redb_store;

pub use redb_store::RedbStore;

use crate::types::{AletheiaError, ConclusionRecord, LogicTables, NotPremise, ValidTruth};

// =============================================================================
// PERSISTENT STORE TRAIT
// =============================================================================

/// Durable sink for premises, ledger records and logic tables.
pub trait PersistentStore {
    /// Overwrite the stored premise list.
    fn save_premises(&mut self, premises: &[String]) -> Result<(), AletheiaError>;

    /// Append a rejected candidate.
    fn append_not_premise(&mut self, entry: &NotPremise) -> Result<(), AletheiaError>;

    /// Append the `{premises, conclusion}` batch of a finished cycle.
    fn append_conclusion(&mut self, record: &ConclusionRecord) -> Result<(), AletheiaError>;

    /// Append an accepted truth.
    fn append_truth(&mut self, truth: &ValidTruth) -> Result<(), AletheiaError>;

    /// Overwrite the stored engine snapshot.
    fn save_logic_tables(&mut self, tables: &LogicTables) -> Result<(), AletheiaError>;

    fn load_premises(&self) -> Result<Vec<String>, AletheiaError> {
        Ok(Vec::new())
    }

    fn load_logic_tables(&self) -> Result<LogicTables, AletheiaError> {
        Ok(LogicTables::default())
    }

    fn list_not_premises(&self) -> Result<Vec<NotPremise>, AletheiaError> {
        Ok(Vec::new())
    }

    fn list_conclusions(&self) -> Result<Vec<ConclusionRecord>, AletheiaError> {
        Ok(Vec::new())
    }

    fn list_truths(&self) -> Result<Vec<ValidTruth>, AletheiaError> {
        Ok(Vec::new())
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Volatile store. Everything is lost when it is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    premises: Vec<String>,
    not_premises: Vec<NotPremise>,
    conclusions: Vec<ConclusionRecord>,
    truths: Vec<ValidTruth>,
    logic_tables: LogicTables,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for MemoryStore {
    fn save_premises(&mut self, premises: &[String]) -> Result<(), AletheiaError> {
        self.premises = premises.to_vec();
        Ok(())
    }

    fn append_not_premise(&mut self, entry: &NotPremise) -> Result<(), AletheiaError> {
        self.not_premises.push(entry.clone());
        Ok(())
    }

    fn append_conclusion(&mut self, record: &ConclusionRecord) -> Result<(), AletheiaError> {
        self.conclusions.push(record.clone());
        Ok(())
    }

    fn append_truth(&mut self, truth: &ValidTruth) -> Result<(), AletheiaError> {
        self.truths.push(truth.clone());
        Ok(())
    }

    fn save_logic_tables(&mut self, tables: &LogicTables) -> Result<(), AletheiaError> {
        self.logic_tables = tables.clone();
        Ok(())
    }

    fn load_premises(&self) -> Result<Vec<String>, AletheiaError> {
        Ok(self.premises.clone())
    }

    fn load_logic_tables(&self) -> Result<LogicTables, AletheiaError> {
        Ok(self.logic_tables.clone())
    }

    fn list_not_premises(&self) -> Result<Vec<NotPremise>, AletheiaError> {
        Ok(self.not_premises.clone())
    }

    fn list_conclusions(&self) -> Result<Vec<ConclusionRecord>, AletheiaError> {
        Ok(self.conclusions.clone())
    }

    fn list_truths(&self) -> Result<Vec<ValidTruth>, AletheiaError> {
        Ok(self.truths.clone())
    }
}

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a Session.
#[derive(Debug)]
pub enum StorageBackend {
    /// Volatile in-memory store.
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl StorageBackend {
    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Persistent(_))
    }

    fn as_store(&self) -> &dyn PersistentStore {
        match self {
            Self::InMemory(store) => store,
            Self::Persistent(store) => store,
        }
    }

    fn as_store_mut(&mut self) -> &mut dyn PersistentStore {
        match self {
            Self::InMemory(store) => store,
            Self::Persistent(store) => store,
        }
    }
}

impl PersistentStore for StorageBackend {
    fn save_premises(&mut self, premises: &[String]) -> Result<(), AletheiaError> {
        self.as_store_mut().save_premises(premises)
    }

    fn append_not_premise(&mut self, entry: &NotPremise) -> Result<(), AletheiaError> {
        self.as_store_mut().append_not_premise(entry)
    }

    fn append_conclusion(&mut self, record: &ConclusionRecord) -> Result<(), AletheiaError> {
        self.as_store_mut().append_conclusion(record)
    }

    fn append_truth(&mut self, truth: &ValidTruth) -> Result<(), AletheiaError> {
        self.as_store_mut().append_truth(truth)
    }

    fn save_logic_tables(&mut self, tables: &LogicTables) -> Result<(), AletheiaError> {
        self.as_store_mut().save_logic_tables(tables)
    }

    fn load_premises(&self) -> Result<Vec<String>, AletheiaError> {
        self.as_store().load_premises()
    }

    fn load_logic_tables(&self) -> Result<LogicTables, AletheiaError> {
        self.as_store().load_logic_tables()
    }

    fn list_not_premises(&self) -> Result<Vec<NotPremise>, AletheiaError> {
        self.as_store().list_not_premises()
    }

    fn list_conclusions(&self) -> Result<Vec<ConclusionRecord>, AletheiaError> {
        self.as_store().list_conclusions()
    }

    fn list_truths(&self) -> Result<Vec<ValidTruth>, AletheiaError> {
        self.as_store().list_truths()
    }
}

// =============================================================================
// TESTS
// =============================================================================
