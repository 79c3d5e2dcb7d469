//! # redb-backed Session Storage
//!
//! A disk-backed store using the redb embedded database:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! Records are postcard-encoded. Snapshots (premises, logic tables) live
//! under a single key and are overwritten; ledger records are appended
//! under a sequence key equal to the table length at insert time, so
//! iteration order is append order.

use crate::storage::PersistentStore;
use crate::types::{AletheiaError, ConclusionRecord, LogicTables, NotPremise, ValidTruth};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

type SnapshotTable = TableDefinition<'static, &'static str, &'static [u8]>;
type LogTable = TableDefinition<'static, u64, &'static [u8]>;

/// Table for the current premise list: "current" -> Vec<String>
const PREMISES: SnapshotTable = TableDefinition::new("premises");

/// Table for the engine snapshot: "current" -> LogicTables
const LOGIC_TABLES: SnapshotTable = TableDefinition::new("logic_tables");

/// Table for rejected candidates: seq -> NotPremise
const NOT_PREMISES: LogTable = TableDefinition::new("not_premises");

/// Table for finished cycles: seq -> ConclusionRecord
const CONCLUSIONS: LogTable = TableDefinition::new("conclusions");

/// Table for accepted truths: seq -> ValidTruth
const TRUTHS: LogTable = TableDefinition::new("truths");

const CURRENT_KEY: &str = "current";

fn storage_err(e: impl std::fmt::Display) -> AletheiaError {
    AletheiaError::Storage(e.to_string())
}

/// A disk-backed session store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AletheiaError> {
        let db = Database::create(path.as_ref()).map_err(|e| AletheiaError::Io(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(storage_err)?;
            for table in [PREMISES, LOGIC_TABLES] {
                let _ = write_txn.open_table(table).map_err(storage_err)?;
            }
            for table in [NOT_PREMISES, CONCLUSIONS, TRUTHS] {
                let _ = write_txn.open_table(table).map_err(storage_err)?;
            }
            write_txn.commit().map_err(storage_err)?;
        }

        tracing::debug!(path = %path.as_ref().display(), "Opened redb store");
        Ok(Self { db })
    }

    fn put_snapshot<T: Serialize>(&self, def: SnapshotTable, value: &T) -> Result<(), AletheiaError> {
        let bytes =
            postcard::to_allocvec(value).map_err(|e| AletheiaError::Serialization(e.to_string()))?;
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(def).map_err(storage_err)?;
            table
                .insert(CURRENT_KEY, bytes.as_slice())
                .map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)
    }

    fn get_snapshot<T: DeserializeOwned>(&self, def: SnapshotTable) -> Result<Option<T>, AletheiaError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(def).map_err(storage_err)?;
        let Some(guard) = table.get(CURRENT_KEY).map_err(storage_err)? else {
            return Ok(None);
        };
        let value = postcard::from_bytes(guard.value())
            .map_err(|e| AletheiaError::Deserialization(e.to_string()))?;
        Ok(Some(value))
    }

    fn append<T: Serialize>(&self, def: LogTable, value: &T) -> Result<(), AletheiaError> {
        let bytes =
            postcard::to_allocvec(value).map_err(|e| AletheiaError::Serialization(e.to_string()))?;
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(def).map_err(storage_err)?;
            let seq = table.len().map_err(storage_err)?;
            table.insert(seq, bytes.as_slice()).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)
    }

    fn list<T: DeserializeOwned>(&self, def: LogTable) -> Result<Vec<T>, AletheiaError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(def).map_err(storage_err)?;
        let mut records = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            let record = postcard::from_bytes(value.value())
                .map_err(|e| AletheiaError::Deserialization(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}

impl PersistentStore for RedbStore {
    fn save_premises(&mut self, premises: &[String]) -> Result<(), AletheiaError> {
        self.put_snapshot(PREMISES, &premises)
    }

    fn append_not_premise(&mut self, entry: &NotPremise) -> Result<(), AletheiaError> {
        self.append(NOT_PREMISES, entry)
    }

    fn append_conclusion(&mut self, record: &ConclusionRecord) -> Result<(), AletheiaError> {
        self.append(CONCLUSIONS, record)
    }

    fn append_truth(&mut self, truth: &ValidTruth) -> Result<(), AletheiaError> {
        self.append(TRUTHS, truth)
    }

    fn save_logic_tables(&mut self, tables: &LogicTables) -> Result<(), AletheiaError> {
        self.put_snapshot(LOGIC_TABLES, tables)
    }

    fn load_premises(&self) -> Result<Vec<String>, AletheiaError> {
        Ok(self.get_snapshot(PREMISES)?.unwrap_or_default())
    }

    fn load_logic_tables(&self) -> Result<LogicTables, AletheiaError> {
        Ok(self.get_snapshot(LOGIC_TABLES)?.unwrap_or_default())
    }

    fn list_not_premises(&self) -> Result<Vec<NotPremise>, AletheiaError> {
        self.list(NOT_PREMISES)
    }

    fn list_conclusions(&self) -> Result<Vec<ConclusionRecord>, AletheiaError> {
        self.list(CONCLUSIONS)
    }

    fn list_truths(&self) -> Result<Vec<ValidTruth>, AletheiaError> {
        self.list(TRUTHS)
    }
}

// =============================================================================
// TESTS
// =============================================================================
