//! # aletheia-core
//!
//! The deterministic reasoning core of Aletheia.
//!
//! This crate implements the propositional-logic side of an LLM-assisted
//! reasoning loop: a sandboxed boolean expression evaluator, a truth-table
//! engine that answers tautology queries, a premise store, and a bounded
//! conclusion loop that accepts generated text only when it passes the
//! tautology oracle.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never executes expression text; it parses a closed grammar
//! - Reaches language models and storage only through traits
//!   (`TextGenerator`, `PersistentStore`, `ConclusionValidator`)
//! - Never installs a tracing subscriber; the app layer does that

// =============================================================================
// MODULES
// =============================================================================

pub mod expr;
pub mod formats;
pub mod generator;
pub mod ledger;
pub mod premises;
pub mod primitives;
pub mod reasoning;
pub mod session;
pub mod storage;
pub mod truth_table;
pub mod types;
pub mod unify;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AletheiaError, Conclusion, ConclusionRecord, EvaluationError, GeneratorError, LogicTables,
    NotPremise, Registration, RejectionKind, Severity, Timestamp, ValidTruth, ValidationError,
};

// =============================================================================
// RE-EXPORTS: Reasoning Engine
// =============================================================================

pub use expr::{Assignment, Expr, Operator, evaluate};
pub use generator::{TextGenerator, Unconfigured};
pub use ledger::{LedgerEntry, TruthLedger};
pub use premises::{Challenge, PremiseStore};
pub use reasoning::{ConclusionLoop, ConclusionValidator, LoopState, ReasoningConfig};
pub use session::Session;
pub use storage::{MemoryStore, PersistentStore, RedbStore, StorageBackend};
pub use truth_table::{TruthTableEngine, TruthTableRow};
pub use unify::{Fact, FactKind, modus_ponens, statements_overlap, unify_variables};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{LedgerExport, ledger_checksum, ledger_from_bytes, ledger_to_bytes};

#[cfg(feature = "crypto-hash")]
pub use formats::ledger_crypto_hash;
