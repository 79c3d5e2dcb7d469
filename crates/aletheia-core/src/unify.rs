//! # Shallow Unification
//!
//! Structured facts and rules, a lexical-overlap unification test, and
//! single-step modus ponens.
//!
//! This is not first-order unification. Two structures
//! "unify" when they share at least one term: a necessary, not sufficient,
//! condition. The same overlap rule, applied to plain text, decides which
//! premises a challenge removes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Leading characters that mark a negated relation.
const NEGATION_MARKERS: [char; 4] = ['~', '¬', '!', '-'];

/// Words too common to count as overlap between two statements.
const STOP_WORDS: [&str; 16] = [
    "a", "an", "the", "is", "are", "was", "be", "of", "to", "and", "or", "not", "in", "on", "it",
    "all",
];

/// Whether a structure is a ground fact or a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    Fact,
    Rule,
}

/// A `{type, relation, arguments}` structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub kind: FactKind,
    pub relation: String,
    pub arguments: Vec<String>,
}

impl Fact {
    /// A ground fact.
    #[must_use]
    pub fn fact(relation: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            kind: FactKind::Fact,
            relation: relation.into(),
            arguments,
        }
    }

    /// A rule.
    #[must_use]
    pub fn rule(relation: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            kind: FactKind::Rule,
            relation: relation.into(),
            arguments,
        }
    }

    fn argument_terms(&self) -> BTreeSet<String> {
        self.arguments.iter().flat_map(|a| terms(a)).collect()
    }
}

/// Lowercased alphanumeric terms of `text`, with any leading negation
/// marker removed first.
#[must_use]
pub fn terms(text: &str) -> BTreeSet<String> {
    strip_negation(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `text` without its leading negation marker, if it has one.
#[must_use]
pub fn strip_negation(text: &str) -> &str {
    let trimmed = text.trim_start();
    trimmed
        .strip_prefix(NEGATION_MARKERS)
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

/// True when the two structures share a term in either direction:
/// `a`'s arguments against `b`'s relation, or `b`'s arguments against `a`'s.
#[must_use]
pub fn unify_variables(a: &Fact, b: &Fact) -> bool {
    let forward = !a.argument_terms().is_disjoint(&terms(&b.relation));
    let backward = !b.argument_terms().is_disjoint(&terms(&a.relation));
    forward || backward
}

/// Single-step modus ponens.
///
/// Requires a fact and a rule that unify. The result keeps the fact's
/// arguments and takes the rule's relation without its negation marker.
#[must_use]
pub fn modus_ponens(fact: &Fact, rule: &Fact) -> Option<Fact> {
    if fact.kind != FactKind::Fact || rule.kind != FactKind::Rule {
        return None;
    }
    if !unify_variables(fact, rule) {
        tracing::debug!(
            fact = fact.relation.as_str(),
            rule = rule.relation.as_str(),
            "Fact and rule share no terms"
        );
        return None;
    }
    Some(Fact::fact(strip_negation(&rule.relation), fact.arguments.clone()))
}

/// Token-set overlap between two plain-text statements, ignoring stop words.
#[must_use]
pub fn statements_overlap(a: &str, b: &str) -> bool {
    let content = |text: &str| -> BTreeSet<String> {
        terms(text)
            .into_iter()
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .collect()
    };
    !content(a).is_disjoint(&content(b))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn terms_lowercase_and_split() {
        let t = terms("Socrates is-a Human.");
        assert!(t.contains("socrates"));
        assert!(t.contains("human"));
        assert!(t.contains("a"));
    }

    #[test]
    fn negation_marker_stripped() {
        assert_eq!(strip_negation("~mortal"), "mortal");
        assert_eq!(strip_negation("¬ mortal"), "mortal");
        assert_eq!(strip_negation("mortal"), "mortal");
    }

    #[test]
    fn unify_needs_overlap() {
        let fact = Fact::fact("human", args(&["socrates"]));
        let rule = Fact::rule("~mortal", args(&["human"]));
        assert!(unify_variables(&fact, &rule));

        let unrelated = Fact::rule("flies", args(&["bird"]));
        assert!(!unify_variables(&fact, &unrelated));
    }

    #[test]
    fn modus_ponens_drops_negation_and_keeps_fact_arguments() {
        let fact = Fact::fact("human", args(&["socrates"]));
        let rule = Fact::rule("~mortal", args(&["human"]));
        let derived = modus_ponens(&fact, &rule).expect("derived");
        assert_eq!(derived, Fact::fact("mortal", args(&["socrates"])));
    }

    #[test]
    fn modus_ponens_keeps_unnegated_relation() {
        let fact = Fact::fact("human", args(&["socrates"]));
        let rule = Fact::rule("mortal", args(&["human"]));
        let derived = modus_ponens(&fact, &rule).expect("derived");
        assert_eq!(derived.relation, "mortal");
    }

    #[test]
    fn modus_ponens_requires_fact_then_rule() {
        let fact = Fact::fact("human", args(&["socrates"]));
        let rule = Fact::rule("~mortal", args(&["human"]));
        assert_eq!(modus_ponens(&rule, &fact), None);
        assert_eq!(modus_ponens(&fact, &fact), None);
    }

    #[test]
    fn statements_overlap_ignores_stop_words() {
        assert!(statements_overlap("Socrates is a human.", "Socrates is mortal."));
        assert!(!statements_overlap("All humans are mortal.", "Socrates is a man."));
        assert!(!statements_overlap("it is", "it is"));
    }
}
