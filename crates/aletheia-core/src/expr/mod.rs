//! # Expression Module
//!
//! Sandboxed evaluation of boolean expressions.
//!
//! Expression text is tokenized and parsed into an [`Expr`] tree over a
//! closed grammar: variables, parentheses and the seven operators
//! `and`, `or`, `not`, `xor`, `nand`, `nor`, `implication`. There are no
//! literals, no attribute access and no other callables, so nothing in the
//! text can reach the host environment.
//!
//! Evaluation is strict: every variable in the tree must be bound, even on
//! a branch whose value would not change the result.

mod lexer;
mod parser;

pub use parser::parse;

use crate::types::EvaluationError;
use std::collections::BTreeSet;

// =============================================================================
// OPERATORS
// =============================================================================

/// The reserved operator keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
    Xor,
    Nand,
    Nor,
    Implication,
}

impl Operator {
    /// All operators, in the order they are documented.
    pub const ALL: [Self; 7] = [
        Self::And,
        Self::Or,
        Self::Not,
        Self::Xor,
        Self::Nand,
        Self::Nor,
        Self::Implication,
    ];

    /// The keyword spelling of this operator.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Xor => "xor",
            Self::Nand => "nand",
            Self::Nor => "nor",
            Self::Implication => "implication",
        }
    }

    /// Look up an operator by keyword (case-sensitive).
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == word)
    }

    /// Number of operands in call form.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            _ => 2,
        }
    }

    /// The binary operation, or `None` for `not`.
    #[must_use]
    pub const fn binary(self) -> Option<BinaryOp> {
        match self {
            Self::And => Some(BinaryOp::And),
            Self::Or => Some(BinaryOp::Or),
            Self::Not => None,
            Self::Xor => Some(BinaryOp::Xor),
            Self::Nand => Some(BinaryOp::Nand),
            Self::Nor => Some(BinaryOp::Nor),
            Self::Implication => Some(BinaryOp::Implication),
        }
    }
}

/// Two-operand boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Implication,
}

impl BinaryOp {
    /// Apply the connective.
    #[must_use]
    pub const fn apply(self, x: bool, y: bool) -> bool {
        match self {
            Self::And => x && y,
            Self::Or => x || y,
            Self::Xor => x ^ y,
            Self::Nand => !(x && y),
            Self::Nor => !(x || y),
            Self::Implication => !x || y,
        }
    }
}

// =============================================================================
// ASSIGNMENT
// =============================================================================

/// A variable → boolean mapping in column order.
///
/// Bindings keep insertion order. Lookups are linear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<(String, bool)>,
}

impl Assignment {
    /// Create an empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Value bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Bindings in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut assignment = Self::new();
        for (name, value) in iter {
            assignment.set(name, value);
        }
        assignment
    }
}

// =============================================================================
// AST
// =============================================================================

/// Parsed boolean expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    Not(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Build a binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Evaluate under `assignment`.
    ///
    /// Both operands of every connective are evaluated, so an unbound
    /// variable is reported regardless of short-circuiting.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<bool, EvaluationError> {
        match self {
            Self::Var(name) => assignment
                .get(name)
                .ok_or_else(|| EvaluationError::UnboundVariable(name.clone())),
            Self::Not(inner) => Ok(!inner.evaluate(assignment)?),
            Self::Binary(op, lhs, rhs) => {
                let x = lhs.evaluate(assignment)?;
                let y = rhs.evaluate(assignment)?;
                Ok(op.apply(x, y))
            }
        }
    }

    /// Distinct variable names referenced by the expression.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::Var(name) => {
                names.insert(name.as_str());
            }
            Self::Not(inner) => inner.collect_variables(names),
            Self::Binary(_, lhs, rhs) => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
        }
    }
}

/// Parse and evaluate `expression` under `assignment`.
pub fn evaluate(expression: &str, assignment: &Assignment) -> Result<bool, EvaluationError> {
    parse(expression)?.evaluate(assignment)
}

/// True when `name` could be used as a variable in an expression.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && Operator::from_keyword(name).is_none()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(pairs: &[(&str, bool)]) -> Assignment {
        pairs.iter().map(|&(n, v)| (n, v)).collect()
    }

    #[test]
    fn and_false_when_one_side_false() {
        let values = assign(&[("A", true), ("B", false)]);
        assert_eq!(evaluate("A and B", &values), Ok(false));
    }

    #[test]
    fn implication_true_when_antecedent_false() {
        let values = assign(&[("A", false), ("B", false)]);
        assert_eq!(evaluate("A implication B", &values), Ok(true));
    }

    #[test]
    fn xor_false_when_equal() {
        let values = assign(&[("A", true), ("B", true)]);
        assert_eq!(evaluate("A xor B", &values), Ok(false));
    }

    #[test]
    fn full_operator_table() {
        let cases = [
            (true, true),
            (true, false),
            (false, true),
            (false, false),
        ];
        for (a, b) in cases {
            let values = assign(&[("A", a), ("B", b)]);
            assert_eq!(evaluate("A or B", &values), Ok(a || b));
            assert_eq!(evaluate("not A", &values), Ok(!a));
            assert_eq!(evaluate("nand(A, B)", &values), Ok(!(a && b)));
            assert_eq!(evaluate("A nor B", &values), Ok(!(a || b)));
            assert_eq!(evaluate("implication(A, B)", &values), Ok(!a || b));
        }
    }

    #[test]
    fn unbound_variable_reported_even_when_short_circuit_would_hide_it() {
        let values = assign(&[("A", false)]);
        assert_eq!(
            evaluate("A and C", &values),
            Err(EvaluationError::UnboundVariable("C".into()))
        );
    }

    #[test]
    fn assignment_set_replaces() {
        let mut values = Assignment::new();
        values.set("A", true);
        values.set("A", false);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("A"), Some(false));
    }

    #[test]
    fn variables_are_collected_once() {
        let expr = parse("(A and B) or not A").expect("parse");
        let names: Vec<_> = expr.variables().into_iter().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("A"));
        assert!(is_identifier("_rain2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2A"));
        assert!(!is_identifier("not"));
        assert!(!is_identifier("A-B"));
    }
}
