//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Aletheia core.
//!
//! Tunable values (the attempt budget, the premise prompt prefix) have
//! defaults here and are overridden through `ReasoningConfig`.

/// Text returned by `draw_conclusion` when there is nothing to reason about.
pub const NO_PREMISES_SENTINEL: &str = "No premises available for logic as conclusion.";

/// Default number of generate/validate attempts per conclusion cycle.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Default prefix prepended to a premise when asking for a new premise.
pub const DEFAULT_PREMISE_PROMPT_PREFIX: &str = "- ";

/// Prefix of the conclusion substituted when the generator fails.
///
/// The resulting text never parses as a boolean expression,
/// so it always fails the tautology check.
pub const GENERATOR_ERROR_PREFIX: &str = "error: unable to generate a response";

/// Variable count above which truth-table generation logs a scaling warning.
///
/// Enumeration is `2^n`; there is no hard cap.
pub const WIDE_TABLE_VARIABLES: usize = 20;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of a premise in bytes.
pub const MAX_PREMISE_LENGTH: usize = 65536;

/// Maximum length of an expression in bytes.
pub const MAX_EXPRESSION_LENGTH: usize = 4096;

/// Maximum nesting depth accepted by the expression parser.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

// =============================================================================
// EXPORT FORMAT
// =============================================================================

/// Magic bytes for the ledger export header.
pub const MAGIC_BYTES: &[u8; 4] = b"ALTH";

/// Current ledger export format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attempt_budget_is_five() {
        assert_eq!(DEFAULT_MAX_ATTEMPTS, 5);
    }

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"ALTH");
    }
}
