//! # Formats Module
//!
//! Serialization formats for Aletheia data.

pub mod persistence;

pub use persistence::{
    ExportHeader, LedgerExport, MAX_EXPORT_SIZE, ledger_checksum, ledger_from_bytes,
    ledger_to_bytes,
};

#[cfg(feature = "crypto-hash")]
pub use persistence::ledger_crypto_hash;
