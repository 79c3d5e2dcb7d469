//! # Ledger Export Format
//!
//! Binary serialization of a session's ledger.
//!
//! Format: Header (5 bytes) + postcard-serialized ledger sections.
//! - 4 bytes: Magic ("ALTH")
//! - 1 byte: Version
//!
//! File I/O happens in the app layer. The size limit and the header are
//! checked before any payload is decoded.

use crate::ledger::TruthLedger;
use crate::primitives;
use crate::storage::PersistentStore;
use crate::types::{AletheiaError, ConclusionRecord, NotPremise, ValidTruth};
use serde::{Deserialize, Serialize};

/// Maximum accepted export size (64 MB).
pub const MAX_EXPORT_SIZE: usize = 64 * 1024 * 1024;

const HEADER_SIZE: usize = 5;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The export header precedes all ledger data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl ExportHeader {
    /// Create a header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), AletheiaError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(AletheiaError::Deserialization(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(AletheiaError::Deserialization(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AletheiaError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(AletheiaError::Deserialization(
                "Header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        Ok(Self {
            magic,
            version: header[4],
        })
    }
}

impl Default for ExportHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// LEDGER EXPORT
// =============================================================================

/// Every ledger section, in append order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerExport {
    pub truths: Vec<ValidTruth>,
    pub rejected: Vec<NotPremise>,
    pub conclusions: Vec<ConclusionRecord>,
}

impl<S: PersistentStore> From<&TruthLedger<S>> for LedgerExport {
    fn from(ledger: &TruthLedger<S>) -> Self {
        Self {
            truths: ledger.truths().to_vec(),
            rejected: ledger.rejected().to_vec(),
            conclusions: ledger.conclusions().to_vec(),
        }
    }
}

/// Serialize a ledger export to bytes (header + payload).
pub fn ledger_to_bytes(export: &LedgerExport) -> Result<Vec<u8>, AletheiaError> {
    let payload =
        postcard::to_stdvec(export).map_err(|e| AletheiaError::Serialization(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&ExportHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Deserialize a ledger export.
///
/// Size and header are validated before the payload is touched.
pub fn ledger_from_bytes(bytes: &[u8]) -> Result<LedgerExport, AletheiaError> {
    if bytes.len() > MAX_EXPORT_SIZE {
        return Err(AletheiaError::Deserialization(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_EXPORT_SIZE
        )));
    }

    let header = ExportHeader::from_bytes(bytes)?;
    header.validate()?;

    postcard::from_bytes(&bytes[HEADER_SIZE..]).map_err(|e| {
        AletheiaError::Deserialization(format!("Failed to deserialize ledger data: {}", e))
    })
}

/// FNV-1a checksum of exported bytes.
///
/// Detects accidental corruption. Not a defence against tampering; use
/// `ledger_crypto_hash` for that.
#[must_use]
pub fn ledger_checksum(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// BLAKE3 hash of exported bytes, as a 64-character hex string.
///
/// Only available with the `crypto-hash` feature.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn ledger_crypto_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::{RejectionKind, Severity};

    fn sample() -> LedgerExport {
        let mut ledger = TruthLedger::new(MemoryStore::new());
        ledger.record_truth(ValidTruth::new("A or not A"));
        ledger.reject(NotPremise::new(
            RejectionKind::InvalidConclusion,
            Severity::Error,
            "socrates is mortal",
        ));
        LedgerExport::from(&ledger)
    }

    #[test]
    fn header_roundtrip() {
        let header = ExportHeader::new();
        let restored = ExportHeader::from_bytes(&header.to_bytes()).expect("parse header");
        assert_eq!(restored, header);
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn export_reimports_identically() {
        let export = sample();
        let bytes = ledger_to_bytes(&export).expect("serialize");
        assert_eq!(&bytes[0..4], primitives::MAGIC_BYTES);
        let restored = ledger_from_bytes(&bytes).expect("deserialize");
        assert_eq!(restored, export);
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(b"XXXX");
        assert!(ledger_from_bytes(&bytes).is_err());
    }

    #[test]
    fn short_input_rejected() {
        assert!(ledger_from_bytes(b"ALT").is_err());
    }

    #[test]
    fn checksum_changes_with_content() {
        assert_eq!(ledger_checksum(b""), FNV_OFFSET_BASIS);
        assert_ne!(ledger_checksum(b"a"), ledger_checksum(b"b"));
        assert_eq!(ledger_checksum(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[cfg(feature = "crypto-hash")]
    #[test]
    fn crypto_hash_is_hex() {
        let hash = ledger_crypto_hash(b"aletheia");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
