//! # Reasoning Module
//!
//! The conclusion loop: ask the generator, validate, retry.
//!
//! ## State Machine
//!
//! ```text
//! Idle -> Generating -> Validating -> Accepted
//!             ^                    \-> Retrying -> Generating ...
//!             |                                 \-> Exhausted
//! ```
//!
//! `Accepted` and `Exhausted` are terminal for one `draw_conclusion` call.
//! The attempt budget counts every pass through `Generating`, including
//! passes whose new premise was rejected.

use crate::generator::TextGenerator;
use crate::ledger::TruthLedger;
use crate::premises::PremiseStore;
use crate::primitives::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_PREMISE_PROMPT_PREFIX, GENERATOR_ERROR_PREFIX,
};
use crate::storage::PersistentStore;
use crate::truth_table::TruthTableEngine;
use crate::types::{
    Conclusion, ConclusionRecord, NotPremise, RejectionKind, Severity, ValidTruth, now,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Tunables of the conclusion loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Generate/validate passes per `draw_conclusion` call.
    pub max_attempts: usize,
    /// Prepended to the current premise when asking for a new premise.
    pub premise_prompt_prefix: String,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            premise_prompt_prefix: DEFAULT_PREMISE_PROMPT_PREFIX.to_string(),
        }
    }
}

// =============================================================================
// VALIDATOR SEAM
// =============================================================================

/// The oracle deciding whether a candidate counts as a conclusion.
pub trait ConclusionValidator {
    fn is_tautology(&self, candidate: &str) -> bool;
}

impl ConclusionValidator for TruthTableEngine {
    fn is_tautology(&self, candidate: &str) -> bool {
        self.tautology(candidate)
    }
}

// =============================================================================
// CONCLUSION LOOP
// =============================================================================

/// Observable state of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Generating,
    Validating,
    Accepted,
    Retrying,
    Exhausted,
}

/// Drives one reasoning cycle at a time.
#[derive(Debug, Clone, Default)]
pub struct ConclusionLoop {
    config: ReasoningConfig,
    state: LoopState,
}

impl ConclusionLoop {
    #[must_use]
    pub fn new(config: ReasoningConfig) -> Self {
        Self {
            config,
            state: LoopState::Idle,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    /// State reached by the last call (`Idle` before the first one).
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn set_max_attempts(&mut self, max_attempts: usize) {
        self.config.max_attempts = max_attempts;
    }

    fn transition(&mut self, next: LoopState) {
        tracing::debug!(from = ?self.state, to = ?next, "Conclusion loop transition");
        self.state = next;
    }

    /// Run one cycle over `premises`.
    ///
    /// On exit the `{premises, conclusion}` batch is written to the ledger,
    /// a `ValidTruth` is written only if a candidate passed `validator`,
    /// and the premises are cleared.
    pub fn draw_conclusion<S, G, V>(
        &mut self,
        premises: &mut PremiseStore,
        ledger: &mut TruthLedger<S>,
        generator: &mut G,
        validator: &V,
    ) -> Conclusion
    where
        S: PersistentStore,
        G: TextGenerator + ?Sized,
        V: ConclusionValidator + ?Sized,
    {
        self.transition(LoopState::Idle);
        let Some(current) = premises.first().map(str::to_string) else {
            tracing::info!("No premises available for logic as conclusion.");
            return Conclusion::NoPremises;
        };
        if self.config.max_attempts == 0 {
            // No cycle runs, so nothing is recorded and premises stay.
            tracing::warn!("Attempt budget is zero; conclusion not drawn");
            self.transition(LoopState::Exhausted);
            return Conclusion::Exhausted {
                candidate: None,
                premises: premises.premises().to_vec(),
            };
        }

        let mut candidate: Option<String> = None;
        let mut accepted = false;

        for attempt in 1..=self.config.max_attempts {
            self.transition(LoopState::Generating);
            tracing::debug!(attempt, "Generating new premise");

            let prompt = format!("{}{}", self.config.premise_prompt_prefix, current);
            let new_premise = ask(generator, &prompt, ledger);
            if premises.add(&new_premise, ledger).is_err() {
                self.transition(LoopState::Retrying);
                continue;
            }

            let text = ask(generator, &current, ledger);
            self.transition(LoopState::Validating);
            if validator.is_tautology(&text) {
                candidate = Some(text);
                accepted = true;
                break;
            }

            ledger.reject(NotPremise::new(
                RejectionKind::InvalidConclusion,
                Severity::Error,
                format!("Invalid conclusion '{text}'. Generating more premises."),
            ));
            candidate = Some(text);
            self.transition(LoopState::Retrying);
        }

        let snapshot = premises.premises().to_vec();
        let conclusion_text = candidate.clone().unwrap_or_default();
        ledger.record_conclusion(ConclusionRecord {
            premises: snapshot.clone(),
            conclusion: conclusion_text.clone(),
            validated: accepted,
            timestamp: now(),
        });

        let result = if accepted {
            self.transition(LoopState::Accepted);
            ledger.record_truth(ValidTruth::new(conclusion_text.clone()));
            tracing::info!(conclusion = conclusion_text.as_str(), "Accepted conclusion");
            Conclusion::Accepted {
                text: conclusion_text,
                premises: snapshot,
            }
        } else {
            self.transition(LoopState::Exhausted);
            tracing::warn!(
                attempts = self.config.max_attempts,
                "No valid conclusion within the attempt budget"
            );
            Conclusion::Exhausted {
                candidate,
                premises: snapshot,
            }
        };

        premises.clear(ledger);
        result
    }
}

/// Ask the generator, mapping a failure to an error string.
fn ask<S, G>(generator: &mut G, prompt: &str, ledger: &mut TruthLedger<S>) -> String
where
    S: PersistentStore,
    G: TextGenerator + ?Sized,
{
    match generator.generate(prompt) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            let message = format!("{GENERATOR_ERROR_PREFIX}: {e}");
            ledger.reject(NotPremise::new(
                RejectionKind::GeneratorFailure,
                Severity::Warning,
                message.clone(),
            ));
            message
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
