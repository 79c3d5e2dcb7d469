//! # Premise Store
//!
//! The ordered working set of premises fed to the conclusion loop.
//!
//! Every mutation persists the full list through the ledger's store before
//! returning. Rejections go to the ledger as not-premises.

use crate::ledger::TruthLedger;
use crate::primitives::MAX_PREMISE_LENGTH;
use crate::storage::PersistentStore;
use crate::types::{NotPremise, RejectionKind, Severity, ValidationError};
use crate::unify::statements_overlap;

/// Check that `text` is acceptable as a premise.
pub fn validate_premise(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if text.len() > MAX_PREMISE_LENGTH {
        return Err(ValidationError::TooLong {
            len: text.len(),
            max: MAX_PREMISE_LENGTH,
        });
    }
    Ok(())
}

/// Outcome of challenging a premise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    /// The premise was not in the store; nothing changed.
    NotFound,
    /// The premise was removed, along with every overlapping premise.
    Removed { equivalents: Vec<String> },
}

/// Ordered premises. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PremiseStore {
    premises: Vec<String>,
}

impl PremiseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload a persisted premise list.
    #[must_use]
    pub fn restore(premises: Vec<String>) -> Self {
        Self { premises }
    }

    #[must_use]
    pub fn premises(&self) -> &[String] {
        &self.premises
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.premises.first().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.premises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.premises.is_empty()
    }

    /// Append a premise and persist the list.
    ///
    /// Invalid text is logged as a not-premise and not appended.
    pub fn add<S: PersistentStore>(
        &mut self,
        premise: &str,
        ledger: &mut TruthLedger<S>,
    ) -> Result<(), ValidationError> {
        if let Err(e) = validate_premise(premise) {
            ledger.reject(NotPremise::new(
                RejectionKind::InvalidPremise,
                Severity::Error,
                format!("Invalid premise: {e}"),
            ));
            return Err(e);
        }
        self.premises.push(premise.to_string());
        ledger.save_premises(&self.premises);
        tracing::info!(premise, "Added premise: {}", premise);
        Ok(())
    }

    /// Remove `premise` and every other premise that overlaps it.
    pub fn challenge<S: PersistentStore>(
        &mut self,
        premise: &str,
        ledger: &mut TruthLedger<S>,
    ) -> Challenge {
        let Some(index) = self.premises.iter().position(|p| p == premise) else {
            ledger.reject(NotPremise::new(
                RejectionKind::PremiseNotFound,
                Severity::Error,
                format!("Premise not found: {premise}"),
            ));
            return Challenge::NotFound;
        };

        self.premises.remove(index);
        tracing::info!(premise, "Removed premise: {}", premise);

        let (equivalents, kept): (Vec<String>, Vec<String>) = self
            .premises
            .drain(..)
            .partition(|other| statements_overlap(premise, other));
        self.premises = kept;

        for removed in &equivalents {
            ledger.reject(NotPremise::new(
                RejectionKind::EquivalentRemoved,
                Severity::Info,
                format!("Removed equivalent premise: {removed}"),
            ));
        }

        ledger.save_premises(&self.premises);
        Challenge::Removed { equivalents }
    }

    /// Empty the store and persist the empty list.
    pub fn clear<S: PersistentStore>(&mut self, ledger: &mut TruthLedger<S>) {
        self.premises.clear();
        ledger.save_premises(&self.premises);
        tracing::debug!("Cleared premises");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn ledger() -> TruthLedger<MemoryStore> {
        TruthLedger::new(MemoryStore::new())
    }

    #[test]
    fn empty_premise_rejected_and_logged() {
        let mut ledger = ledger();
        let mut store = PremiseStore::new();
        assert_eq!(store.add("", &mut ledger), Err(ValidationError::Empty));
        assert_eq!(store.add("   ", &mut ledger), Err(ValidationError::Empty));
        assert!(store.is_empty());
        assert_eq!(ledger.rejected().len(), 2);
        assert_eq!(ledger.rejected()[0].kind, RejectionKind::InvalidPremise);
    }

    #[test]
    fn oversized_premise_rejected() {
        let mut ledger = ledger();
        let mut store = PremiseStore::new();
        let text = "a".repeat(MAX_PREMISE_LENGTH + 1);
        assert!(matches!(
            store.add(&text, &mut ledger),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn valid_premise_persisted() {
        let mut ledger = ledger();
        let mut store = PremiseStore::new();
        store
            .add("Socrates is a human.", &mut ledger)
            .expect("add");
        assert_eq!(store.premises(), ["Socrates is a human."]);
        assert_eq!(
            ledger.store().load_premises().expect("load"),
            ["Socrates is a human."]
        );
    }

    #[test]
    fn challenge_missing_leaves_list_unchanged() {
        let mut ledger = ledger();
        let mut store = PremiseStore::new();
        store.add("All humans are mortal.", &mut ledger).expect("add");
        let before = store.clone();

        assert_eq!(store.challenge("Zeus is a god.", &mut ledger), Challenge::NotFound);
        assert_eq!(store, before);
        assert_eq!(ledger.rejected().len(), 1);
        assert_eq!(ledger.rejected()[0].kind, RejectionKind::PremiseNotFound);
    }

    #[test]
    fn challenge_removes_overlapping_premises() {
        let mut ledger = ledger();
        let mut store = PremiseStore::new();
        for p in [
            "Socrates is a human.",
            "All humans are mortal.",
            "Socrates drinks hemlock.",
        ] {
            store.add(p, &mut ledger).expect("add");
        }

        let outcome = store.challenge("Socrates is a human.", &mut ledger);
        assert_eq!(
            outcome,
            Challenge::Removed {
                equivalents: vec!["Socrates drinks hemlock.".to_string()]
            }
        );
        assert_eq!(store.premises(), ["All humans are mortal."]);
        assert_eq!(
            ledger.store().load_premises().expect("load"),
            ["All humans are mortal."]
        );
        assert_eq!(ledger.rejected()[0].kind, RejectionKind::EquivalentRemoved);
    }

    #[test]
    fn challenge_removes_only_first_exact_match_before_overlap() {
        let mut ledger = ledger();
        let mut store = PremiseStore::new();
        store.add("it is", &mut ledger).expect("add");
        store.add("it is", &mut ledger).expect("add");
        store.challenge("it is", &mut ledger);
        assert_eq!(store.premises(), ["it is"]);
    }

    #[test]
    fn clear_persists_empty_list() {
        let mut ledger = ledger();
        let mut store = PremiseStore::new();
        store.add("p", &mut ledger).expect("add");
        store.clear(&mut ledger);
        assert!(store.is_empty());
        assert!(ledger.store().load_premises().expect("load").is_empty());
    }
}
