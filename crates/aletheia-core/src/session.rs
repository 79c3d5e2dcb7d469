//! # Session Module
//!
//! One reasoning session: the explicit context object that owns the
//! truth-table engine, the premise store, the ledger (and through it the
//! persistent store) and the conclusion loop.
//!
//! A session is not internally synchronized. Callers serialize access,
//! for example by moving it into a blocking task and back.
//!
//! ## Storage Backends
//!
//! - `InMemory`: volatile, lost when the session is dropped
//! - `Persistent`: `RedbStore`, reloaded by `Session::with_redb`

use crate::formats::{LedgerExport, ledger_to_bytes};
use crate::generator::TextGenerator;
use crate::ledger::TruthLedger;
use crate::premises::{Challenge, PremiseStore};
use crate::reasoning::{ConclusionLoop, LoopState, ReasoningConfig};
use crate::storage::{PersistentStore, RedbStore, StorageBackend};
use crate::truth_table::{TruthTableEngine, TruthTableRow};
use crate::types::{
    AletheiaError, Conclusion, NotPremise, Registration, RejectionKind, Severity, ValidationError,
};
use crate::unify::Fact;
use std::path::Path;

/// A reasoning session over a persistent store.
#[derive(Debug)]
pub struct Session<S: PersistentStore = StorageBackend> {
    engine: TruthTableEngine,
    premises: PremiseStore,
    ledger: TruthLedger<S>,
    reasoning: ConclusionLoop,
}

impl Default for Session<StorageBackend> {
    fn default() -> Self {
        Self::with_store(StorageBackend::default())
    }
}

impl Session<StorageBackend> {
    /// Create a new empty session with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or create) a redb database and restore the session it holds.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, AletheiaError> {
        let store = RedbStore::open(path)?;
        Self::restore(StorageBackend::Persistent(store))
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.ledger.store().is_persistent()
    }
}

impl<S: PersistentStore> Session<S> {
    /// Start a fresh session writing to `store`. Existing data is ignored.
    pub fn with_store(store: S) -> Self {
        Self {
            engine: TruthTableEngine::new(),
            premises: PremiseStore::new(),
            ledger: TruthLedger::new(store),
            reasoning: ConclusionLoop::default(),
        }
    }

    /// Rebuild a session from everything persisted in `store`.
    pub fn restore(store: S) -> Result<Self, AletheiaError> {
        let engine = TruthTableEngine::from_tables(store.load_logic_tables()?);
        let premises = PremiseStore::restore(store.load_premises()?);
        let ledger = TruthLedger::restore(store)?;
        tracing::info!(
            variables = engine.variables().len(),
            expressions = engine.expressions().len(),
            premises = premises.len(),
            "Restored session"
        );
        Ok(Self {
            engine,
            premises,
            ledger,
            reasoning: ConclusionLoop::default(),
        })
    }

    /// Replace the reasoning configuration.
    #[must_use]
    pub fn with_config(mut self, config: ReasoningConfig) -> Self {
        self.reasoning = ConclusionLoop::new(config);
        self
    }

    #[must_use]
    pub fn engine(&self) -> &TruthTableEngine {
        &self.engine
    }

    #[must_use]
    pub fn premises(&self) -> &[String] {
        self.premises.premises()
    }

    #[must_use]
    pub fn ledger(&self) -> &TruthLedger<S> {
        &self.ledger
    }

    #[must_use]
    pub fn config(&self) -> &ReasoningConfig {
        self.reasoning.config()
    }

    #[must_use]
    pub fn loop_state(&self) -> LoopState {
        self.reasoning.state()
    }

    pub fn set_max_attempts(&mut self, max_attempts: usize) {
        self.reasoning.set_max_attempts(max_attempts);
    }

    /// Give the store back.
    pub fn into_store(self) -> S {
        self.ledger.into_store()
    }

    // =========================================================================
    // TRUTH TABLES
    // =========================================================================

    pub fn add_variable(&mut self, name: &str) -> Result<Registration, ValidationError> {
        let registration = self.engine.add_variable(name)?;
        if registration.is_added() {
            self.save_logic_tables();
        }
        Ok(registration)
    }

    pub fn add_expression(&mut self, expression: &str) -> Result<Registration, ValidationError> {
        let registration = self.engine.add_expression(expression)?;
        if registration.is_added() {
            self.save_logic_tables();
        }
        Ok(registration)
    }

    /// Forget all variables and expressions.
    pub fn reset_logic_tables(&mut self) {
        self.engine.reset();
        self.save_logic_tables();
    }

    #[must_use]
    pub fn generate_truth_table(&self) -> Vec<TruthTableRow> {
        self.engine.generate_truth_table()
    }

    #[must_use]
    pub fn render_table(&self) -> String {
        self.engine.render_table()
    }

    /// Validate a registered expression; on success the truth is also
    /// appended to the ledger.
    pub fn validate_truth(&mut self, expression: &str) -> bool {
        if !self.engine.validate_truth(expression) {
            return false;
        }
        if let Some(truth) = self.engine.valid_truths().last().cloned() {
            self.ledger.record_truth(truth);
        }
        self.save_logic_tables();
        true
    }

    #[must_use]
    pub fn tautology(&self, expression: &str) -> bool {
        self.engine.tautology(expression)
    }

    #[must_use]
    pub fn modus_ponens(&self, fact: &Fact, rule: &Fact) -> Option<Fact> {
        self.engine.modus_ponens(fact, rule)
    }

    fn save_logic_tables(&mut self) {
        self.ledger.save_logic_tables(&self.engine.snapshot());
    }

    // =========================================================================
    // PREMISES AND CONCLUSIONS
    // =========================================================================

    pub fn add_premise(&mut self, premise: &str) -> Result<(), ValidationError> {
        self.premises.add(premise, &mut self.ledger)
    }

    pub fn challenge_premise(&mut self, premise: &str) -> Challenge {
        self.premises.challenge(premise, &mut self.ledger)
    }

    /// Run one conclusion cycle, validating candidates against the engine.
    pub fn draw_conclusion<G: TextGenerator + ?Sized>(&mut self, generator: &mut G) -> Conclusion {
        self.reasoning.draw_conclusion(
            &mut self.premises,
            &mut self.ledger,
            generator,
            &self.engine,
        )
    }

    /// Record a rejection raised outside the core, e.g. a bad REPL command.
    pub fn log_not_premise(
        &mut self,
        kind: RejectionKind,
        severity: Severity,
        message: impl Into<String>,
    ) {
        self.ledger.reject(NotPremise::new(kind, severity, message));
    }

    /// Serialize the ledger in the export format.
    pub fn export_ledger(&self) -> Result<Vec<u8>, AletheiaError> {
        ledger_to_bytes(&LedgerExport::from(&self.ledger))
    }
}

// =============================================================================
// TESTS
// =============================================================================
