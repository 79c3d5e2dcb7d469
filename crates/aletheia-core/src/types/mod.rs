//! # Core Type Definitions
//!
//! This module contains the shared types of the Aletheia reasoning core:
//! - Ledger records (`ValidTruth`, `NotPremise`, `ConclusionRecord`)
//! - Logic table snapshots (`LogicTables`)
//! - The tagged result of a conclusion cycle (`Conclusion`)
//! - Error types (`AletheiaError`, `ValidationError`, `EvaluationError`, `GeneratorError`)
//!
//! ## Timestamps
//!
//! Every persisted record carries a UTC `chrono` timestamp. Timestamps
//! serialize as RFC 3339 strings, so ledger replay can sort chronologically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::primitives::NO_PREMISES_SENTINEL;

/// Wall-clock time attached to every ledger record.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

// =============================================================================
// REGISTRATION
// =============================================================================

/// Outcome of registering a variable or expression with the engine.
///
/// Registration is idempotent: a duplicate is reported, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The item was new and has been appended.
    Added,
    /// The item was already registered; nothing changed.
    AlreadyPresent,
}

impl Registration {
    /// True when the registration changed engine state.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

// =============================================================================
// LEDGER RECORDS
// =============================================================================

/// An expression (or conclusion) that passed the universality check.
///
/// Append-only: once written, a `ValidTruth` is never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidTruth {
    /// The accepted expression text.
    pub expression: String,
    /// When the truth was accepted.
    pub timestamp: Timestamp,
}

impl ValidTruth {
    /// Stamp an accepted expression with the current time.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            timestamp: now(),
        }
    }
}

/// Severity attached to a rejected candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Why a statement ended up in the not-premise log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    /// A premise failed the non-empty / length check.
    InvalidPremise,
    /// A challenged premise was not in the store.
    PremiseNotFound,
    /// A premise was removed because it overlaps a challenged premise.
    EquivalentRemoved,
    /// A generated conclusion failed the tautology check.
    InvalidConclusion,
    /// The text generator failed and an error string was substituted.
    GeneratorFailure,
    /// An interactive command was not recognised.
    InvalidCommand,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidPremise => "invalid_premise",
            Self::PremiseNotFound => "premise_not_found",
            Self::EquivalentRemoved => "equivalent_removed",
            Self::InvalidConclusion => "invalid_conclusion",
            Self::GeneratorFailure => "generator_failure",
            Self::InvalidCommand => "invalid_command",
        };
        f.write_str(name)
    }
}

/// A rejected candidate: invalid premise, invalid conclusion,
/// or a premise removed by equivalence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotPremise {
    pub kind: RejectionKind,
    pub severity: Severity,
    pub message: String,
    pub timestamp: Timestamp,
}

impl NotPremise {
    /// Create a not-premise entry stamped with the current time.
    #[must_use]
    pub fn new(kind: RejectionKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            timestamp: now(),
        }
    }
}

/// The `{premises, conclusion}` batch persisted at the end of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConclusionRecord {
    /// Premises in effect when the conclusion was drawn.
    pub premises: Vec<String>,
    /// The returned conclusion text (may be unvalidated).
    pub conclusion: String,
    /// Whether the conclusion passed the tautology check.
    pub validated: bool,
    pub timestamp: Timestamp,
}

/// Snapshot of the engine written by `PersistentStore::save_logic_tables`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicTables {
    pub variables: Vec<String>,
    pub expressions: Vec<String>,
    pub valid_truths: Vec<ValidTruth>,
}

// =============================================================================
// CONCLUSION
// =============================================================================

/// Result of one `draw_conclusion` cycle.
///
/// Callers can tell a proven conclusion from a best-effort guess
/// without consulting the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    /// There were no premises; no generator call was made.
    NoPremises,
    /// A candidate passed the tautology check.
    Accepted {
        text: String,
        premises: Vec<String>,
    },
    /// The attempt budget ran out. `candidate` is the last generated
    /// conclusion, if any was produced.
    Exhausted {
        candidate: Option<String>,
        premises: Vec<String>,
    },
}

impl Conclusion {
    /// The conclusion text as it would be displayed.
    ///
    /// `NoPremises` yields the fixed sentinel; an exhausted cycle with no
    /// candidate yields an empty string.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::NoPremises => NO_PREMISES_SENTINEL,
            Self::Accepted { text, .. } => text,
            Self::Exhausted { candidate, .. } => candidate.as_deref().unwrap_or(""),
        }
    }

    /// True only for a conclusion that passed the tautology check.
    #[must_use]
    pub const fn is_validated(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Premises that were in effect when the cycle ran.
    #[must_use]
    pub fn premises(&self) -> &[String] {
        match self {
            Self::NoPremises => &[],
            Self::Accepted { premises, .. } | Self::Exhausted { premises, .. } => premises,
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// A statement failed the premise shape check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("statement is empty")]
    Empty,

    #[error("statement is {len} bytes, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(String),
}

/// An expression could not be evaluated.
///
/// Recovered locally: the engine treats the row as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("expression is empty")]
    Empty,

    #[error("expression exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("expression nests deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("unexpected '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: &'static str,
    },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unbound variable '{0}'")]
    UnboundVariable(String),

    #[error("'{0}' is not an allowed operator")]
    NotCallable(String),

    #[error("operator '{operator}' takes {expected} argument(s), got {found}")]
    Arity {
        operator: &'static str,
        expected: usize,
        found: usize,
    },
}

/// The external text generator failed.
///
/// Recovered locally: the conclusion loop substitutes an error string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("no text generator configured")]
    NotConfigured,

    #[error("generator unavailable: {0}")]
    Unavailable(String),

    #[error("generator timed out after {0}s")]
    Timeout(u64),

    #[error("unauthorized: invalid or missing API key")]
    Unauthorized,

    #[error("rate limited: too many requests")]
    RateLimited,

    #[error("server error ({0}): {1}")]
    Server(u16, String),

    #[error("could not parse generator response: {0}")]
    Parse(String),
}

/// Errors that can occur in the Aletheia core.
///
/// - No silent failures at the API boundary
/// - The core never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum AletheiaError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_premises_uses_sentinel_text() {
        let conclusion = Conclusion::NoPremises;
        assert_eq!(conclusion.text(), NO_PREMISES_SENTINEL);
        assert!(!conclusion.is_validated());
        assert!(conclusion.premises().is_empty());
    }

    #[test]
    fn exhausted_without_candidate_is_empty_text() {
        let conclusion = Conclusion::Exhausted {
            candidate: None,
            premises: vec!["p".to_string()],
        };
        assert_eq!(conclusion.text(), "");
        assert!(!conclusion.is_validated());
        assert_eq!(conclusion.premises(), ["p".to_string()]);
    }

    #[test]
    fn accepted_is_validated() {
        let conclusion = Conclusion::Accepted {
            text: "A or not A".to_string(),
            premises: Vec::new(),
        };
        assert!(conclusion.is_validated());
        assert_eq!(conclusion.to_string(), "A or not A");
    }

    #[test]
    fn severity_orders_by_seriousness() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }

    #[test]
    fn validation_error_converts_into_crate_error() {
        let err: AletheiaError = ValidationError::Empty.into();
        assert!(matches!(err, AletheiaError::Validation(ValidationError::Empty)));
    }
}
