//! # Truth Table Module
//!
//! The `TruthTableEngine` holds an ordered set of variables and expressions,
//! enumerates every assignment, and answers validity queries.
//!
//! ## Enumeration Order
//!
//! Rows are produced lexicographically over the variables in insertion
//! order, `true` before `false`:
//!
//! ```text
//! A     B
//! true  true
//! true  false
//! false true
//! false false
//! ```
//!
//! ## Scaling
//!
//! A table has `2^n` rows. Nothing is cached between calls: every query
//! regenerates against the current variables and expressions. Beyond
//! `WIDE_TABLE_VARIABLES` a warning is logged, but no cap is applied.

use crate::expr::{self, Assignment, Expr};
use crate::primitives::{MAX_EXPRESSION_LENGTH, WIDE_TABLE_VARIABLES};
use crate::types::{LogicTables, Registration, ValidTruth, ValidationError};
use crate::unify::{self, Fact};

// =============================================================================
// ASSIGNMENT ENUMERATION
// =============================================================================

/// Iterator over the full assignment space `{true,false}^n`.
///
/// Works as an odometer over a `Vec<bool>`, so it never overflows an
/// integer counter however many variables there are.
#[derive(Debug, Clone)]
pub struct Assignments {
    variables: Vec<String>,
    state: Option<Vec<bool>>,
}

impl Assignments {
    /// Enumerate assignments for `variables` (column order preserved).
    #[must_use]
    pub fn new(variables: &[String]) -> Self {
        Self {
            variables: variables.to_vec(),
            state: Some(vec![true; variables.len()]),
        }
    }
}

impl Iterator for Assignments {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        let state = self.state.as_mut()?;
        let current: Assignment = self
            .variables
            .iter()
            .zip(state.iter())
            .map(|(name, &value)| (name.as_str(), value))
            .collect();

        // Advance: flip the right-most `true` to `false` and reset
        // everything after it to `true`.
        match state.iter().rposition(|&v| v) {
            Some(pivot) => {
                state[pivot] = false;
                for slot in &mut state[pivot + 1..] {
                    *slot = true;
                }
            }
            None => self.state = None,
        }

        Some(current)
    }
}

// =============================================================================
// TRUTH TABLE ROW
// =============================================================================

/// One assignment plus the result of every registered expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTableRow {
    pub assignment: Assignment,
    /// `(expression, result)` in registration order.
    pub results: Vec<(String, bool)>,
}

impl TruthTableRow {
    /// Result of a registered expression in this row.
    #[must_use]
    pub fn result(&self, expression: &str) -> Option<bool> {
        self.results
            .iter()
            .find(|(e, _)| e == expression)
            .map(|(_, v)| *v)
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Ordered variables, ordered expressions and the truths they proved.
#[derive(Debug, Clone, Default)]
pub struct TruthTableEngine {
    variables: Vec<String>,
    expressions: Vec<String>,
    valid_truths: Vec<ValidTruth>,
}

impl TruthTableEngine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an engine from a persisted snapshot.
    #[must_use]
    pub fn from_tables(tables: LogicTables) -> Self {
        Self {
            variables: tables.variables,
            expressions: tables.expressions,
            valid_truths: tables.valid_truths,
        }
    }

    /// Snapshot of the current state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> LogicTables {
        LogicTables {
            variables: self.variables.clone(),
            expressions: self.expressions.clone(),
            valid_truths: self.valid_truths.clone(),
        }
    }

    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    #[must_use]
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    #[must_use]
    pub fn valid_truths(&self) -> &[ValidTruth] {
        &self.valid_truths
    }

    /// Register a variable.
    ///
    /// A duplicate is a no-op that logs a warning. A name that could never
    /// appear in an expression (not an identifier, or an operator keyword)
    /// is rejected.
    pub fn add_variable(&mut self, name: &str) -> Result<Registration, ValidationError> {
        if !expr::is_identifier(name) {
            return Err(ValidationError::InvalidIdentifier(name.to_string()));
        }
        if self.variables.iter().any(|v| v == name) {
            tracing::warn!(variable = name, "Variable {} already exists.", name);
            return Ok(Registration::AlreadyPresent);
        }
        self.variables.push(name.to_string());
        tracing::info!(variable = name, "Added variable: {}", name);
        Ok(Registration::Added)
    }

    /// Register an expression.
    ///
    /// The text is stored as given; it is not required to parse; an
    /// unparseable expression simply evaluates `false` on every row.
    pub fn add_expression(&mut self, expression: &str) -> Result<Registration, ValidationError> {
        if expression.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        if expression.len() > MAX_EXPRESSION_LENGTH {
            return Err(ValidationError::TooLong {
                len: expression.len(),
                max: MAX_EXPRESSION_LENGTH,
            });
        }
        if self.expressions.iter().any(|e| e == expression) {
            tracing::warn!(expression, "Expression {} already exists.", expression);
            return Ok(Registration::AlreadyPresent);
        }
        self.expressions.push(expression.to_string());
        tracing::info!(expression, "Added expression: {}", expression);
        Ok(Registration::Added)
    }

    /// Forget all variables and expressions. Valid truths are kept.
    pub fn reset(&mut self) {
        self.variables.clear();
        self.expressions.clear();
        tracing::info!("Reset logic tables");
    }

    /// Number of rows a table would have, or `None` if it overflows `usize`.
    #[must_use]
    pub fn row_count(&self) -> Option<usize> {
        2usize.checked_pow(u32::try_from(self.variables.len()).ok()?)
    }

    /// Every assignment of the current variables, in table order.
    #[must_use]
    pub fn assignments(&self) -> Assignments {
        if self.variables.len() > WIDE_TABLE_VARIABLES {
            tracing::warn!(
                variables = self.variables.len(),
                "Truth table over {} variables has 2^{} rows",
                self.variables.len(),
                self.variables.len()
            );
        }
        Assignments::new(&self.variables)
    }

    /// Evaluate `expression`, returning `false` on any evaluation failure.
    ///
    /// Failures are logged, never propagated: validity checks built on top
    /// of this fail closed.
    #[must_use]
    pub fn evaluate_expression(&self, expression: &str, assignment: &Assignment) -> bool {
        match expr::evaluate(expression, assignment) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(expression, "Error evaluating expression '{}': {}", expression, e);
                false
            }
        }
    }

    /// Enumerate every assignment and evaluate each expression.
    ///
    /// Each expression is parsed once per call.
    #[must_use]
    pub fn generate_truth_table(&self) -> Vec<TruthTableRow> {
        let parsed: Vec<(&str, Option<Expr>)> = self
            .expressions
            .iter()
            .map(|text| match expr::parse(text) {
                Ok(tree) => (text.as_str(), Some(tree)),
                Err(e) => {
                    tracing::error!(expression = text.as_str(), "Error parsing expression '{}': {}", text, e);
                    (text.as_str(), None)
                }
            })
            .collect();

        let rows: Vec<TruthTableRow> = self
            .assignments()
            .map(|assignment| {
                let results = parsed
                    .iter()
                    .map(|(text, tree)| {
                        let value = tree
                            .as_ref()
                            .map(|t| fail_closed(text, t, &assignment))
                            .unwrap_or(false);
                        ((*text).to_string(), value)
                    })
                    .collect();
                TruthTableRow {
                    assignment,
                    results,
                }
            })
            .collect();

        tracing::debug!("Generated truth table with {} rows", rows.len());
        rows
    }

    /// Render the table as tab-separated text, variables then expressions.
    #[must_use]
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self
            .variables
            .iter()
            .chain(self.expressions.iter())
            .map(String::as_str)
            .collect();
        out.push_str(&headers.join("\t"));
        out.push('\n');

        for row in self.generate_truth_table() {
            let cells: Vec<String> = row
                .assignment
                .iter()
                .map(|(_, v)| v.to_string())
                .chain(row.results.iter().map(|(_, v)| v.to_string()))
                .collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    /// Check a registered expression against a fresh table.
    ///
    /// Returns `true` and records a `ValidTruth` only if the expression is
    /// registered and holds on every row.
    pub fn validate_truth(&mut self, expression: &str) -> bool {
        if !self.expressions.iter().any(|e| e == expression) {
            tracing::warn!(
                expression,
                "Expression '{}' is not in the list of expressions.",
                expression
            );
            return false;
        }

        let holds = self
            .generate_truth_table()
            .iter()
            .all(|row| row.result(expression) == Some(true));
        if !holds {
            tracing::info!(expression, "Expression '{}' is not valid.", expression);
            return false;
        }

        let truth = ValidTruth::new(expression);
        tracing::info!(
            expression,
            "Saved valid truth: '{}' at {}",
            expression,
            truth.timestamp
        );
        self.valid_truths.push(truth);
        true
    }

    /// Pure universality oracle over the current variables.
    ///
    /// The expression need not be registered and nothing is recorded.
    /// Text that does not parse, or that references a variable the engine
    /// does not know, fails every row.
    #[must_use]
    pub fn tautology(&self, expression: &str) -> bool {
        let tree = match expr::parse(expression) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::info!(expression, "Expression '{}' is not a tautology: {}", expression, e);
                return false;
            }
        };

        let holds = self
            .assignments()
            .all(|assignment| fail_closed(expression, &tree, &assignment));
        if holds {
            tracing::info!(expression, "Expression '{}' is a tautology.", expression);
        } else {
            tracing::info!(expression, "Expression '{}' is not a tautology.", expression);
        }
        holds
    }

    /// Shallow modus ponens over structured facts.
    #[must_use]
    pub fn modus_ponens(&self, fact: &Fact, rule: &Fact) -> Option<Fact> {
        unify::modus_ponens(fact, rule)
    }
}

fn fail_closed(text: &str, tree: &Expr, assignment: &Assignment) -> bool {
    match tree.evaluate(assignment) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(expression = text, "Error evaluating expression '{}': {}", text, e);
            false
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    fn engine_with(vars: &[&str], exprs: &[&str]) -> TruthTableEngine {
        let mut engine = TruthTableEngine::new();
        for v in vars {
            engine.add_variable(v).expect("variable");
        }
        for e in exprs {
            engine.add_expression(e).expect("expression");
        }
        engine
    }

    #[test]
    fn duplicate_variable_is_noop() {
        let mut engine = TruthTableEngine::new();
        assert_eq!(engine.add_variable("A"), Ok(Registration::Added));
        assert_eq!(engine.add_variable("A"), Ok(Registration::AlreadyPresent));
        assert_eq!(engine.variables(), ["A".to_string()]);
    }

    /// Counts `WARN` events.
    struct CountWarnings(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountWarnings {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn duplicate_variable_logs_one_warning() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(CountWarnings(Arc::clone(&warnings)));
        tracing::subscriber::with_default(subscriber, || {
            let mut engine = TruthTableEngine::new();
            engine.add_variable("A").expect("first");
            assert_eq!(warnings.load(Ordering::SeqCst), 0);
            engine.add_variable("A").expect("second");
        });
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn evaluation_failure_is_false() {
        let engine = engine_with(&["A"], &[]);
        let assignment: Assignment = [("A", true)].into_iter().collect();
        assert!(engine.evaluate_expression("A or not A", &assignment));
        assert!(!engine.evaluate_expression("A and Z", &assignment));
        assert!(!engine.evaluate_expression("A and", &assignment));
    }

    #[test]
    fn duplicate_expression_is_noop() {
        let mut engine = TruthTableEngine::new();
        assert!(engine.add_expression("A and B").expect("add").is_added());
        assert!(!engine.add_expression("A and B").expect("add").is_added());
        assert_eq!(engine.expressions().len(), 1);
    }

    #[test]
    fn keyword_variable_rejected() {
        let mut engine = TruthTableEngine::new();
        assert_eq!(
            engine.add_variable("and"),
            Err(ValidationError::InvalidIdentifier("and".into()))
        );
    }

    #[test]
    fn zero_variables_yield_one_empty_row() {
        let engine = TruthTableEngine::new();
        let rows = engine.generate_truth_table();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].assignment.is_empty());
        assert!(rows[0].results.is_empty());
    }

    #[test]
    fn rows_follow_true_first_order() {
        let engine = engine_with(&["A", "B"], &[]);
        let rows: Vec<Vec<bool>> = engine
            .generate_truth_table()
            .iter()
            .map(|r| r.assignment.iter().map(|(_, v)| v).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec![true, true],
                vec![true, false],
                vec![false, true],
                vec![false, false],
            ]
        );
    }

    #[test]
    fn expressions_evaluated_per_row() {
        let engine = engine_with(&["A", "B"], &["A and B", "A implication B"]);
        let rows = engine.generate_truth_table();
        let and_column: Vec<_> = rows.iter().map(|r| r.result("A and B")).collect();
        assert_eq!(
            and_column,
            vec![Some(true), Some(false), Some(false), Some(false)]
        );
        let implies_column: Vec<_> = rows.iter().map(|r| r.result("A implication B")).collect();
        assert_eq!(
            implies_column,
            vec![Some(true), Some(false), Some(true), Some(true)]
        );
    }

    #[test]
    fn broken_expression_is_false_everywhere() {
        let engine = engine_with(&["A"], &["A and"]);
        assert!(
            engine
                .generate_truth_table()
                .iter()
                .all(|r| r.result("A and") == Some(false))
        );
    }

    #[test]
    fn validate_truth_requires_registration() {
        let mut engine = engine_with(&["A"], &[]);
        assert!(!engine.validate_truth("A or not A"));
        assert!(engine.valid_truths().is_empty());
    }

    #[test]
    fn validate_truth_records_tautology() {
        let mut engine = engine_with(&["A"], &["A or not A", "A and not A"]);
        assert!(engine.validate_truth("A or not A"));
        assert!(!engine.validate_truth("A and not A"));
        assert_eq!(engine.valid_truths().len(), 1);
        assert_eq!(engine.valid_truths()[0].expression, "A or not A");
    }

    #[test]
    fn tautology_does_not_record() {
        let engine = engine_with(&["A", "B"], &[]);
        assert!(engine.tautology("(A and B) implication A"));
        assert!(!engine.tautology("A implication B"));
        assert!(engine.valid_truths().is_empty());
    }

    #[test]
    fn tautology_fails_closed_on_text() {
        let engine = engine_with(&["A"], &[]);
        assert!(!engine.tautology("socrates is mortal"));
        assert!(!engine.tautology("B or not B"));
    }

    #[test]
    fn new_variable_invalidates_stale_answer() {
        let mut engine = engine_with(&["A"], &[]);
        assert!(engine.tautology("A or not A"));
        engine.add_variable("B").expect("variable");
        assert!(!engine.tautology("A or B"));
        assert!(engine.tautology("A or not A"));
    }

    #[test]
    fn row_count_matches_table() {
        let engine = engine_with(&["A", "B", "C"], &[]);
        assert_eq!(engine.row_count(), Some(8));
        assert_eq!(engine.generate_truth_table().len(), 8);
    }

    #[test]
    fn render_table_has_header_and_rows() {
        let engine = engine_with(&["A"], &["not A"]);
        let rendered = engine.render_table();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["A\tnot A", "true\tfalse", "false\ttrue"]);
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut engine = engine_with(&["A"], &["A or not A"]);
        assert!(engine.validate_truth("A or not A"));
        let restored = TruthTableEngine::from_tables(engine.snapshot());
        assert_eq!(restored.variables(), engine.variables());
        assert_eq!(restored.expressions(), engine.expressions());
        assert_eq!(restored.valid_truths(), engine.valid_truths());
    }
}
