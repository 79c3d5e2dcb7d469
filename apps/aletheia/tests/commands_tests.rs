//! Integration tests for CLI command functions against temp databases.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use aletheia::cli::{
    LedgerSection, cmd_conclude, cmd_export, cmd_expr_add, cmd_ledger, cmd_premise_add,
    cmd_premise_challenge, cmd_premise_list, cmd_reset, cmd_status, cmd_table, cmd_tautology,
    cmd_validate, cmd_var_add, open_session,
};
use aletheia::config::{GeneratorConfig, Provider};
use aletheia_core::{AletheiaError, GeneratorError, ledger_from_bytes};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// TRUTH TABLE COMMANDS
// =============================================================================

#[test]
fn test_logic_tables_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("aletheia.db");

    {
        let mut session = open_session(&db, false).unwrap();
        cmd_var_add(&mut session, &strings(&["P", "Q"]), false).unwrap();
        cmd_expr_add(
            &mut session,
            &strings(&["(P and (P implication Q)) implication Q"]),
            true,
        )
        .unwrap();
        cmd_validate(&mut session, "(P and (P implication Q)) implication Q", false).unwrap();
    }

    let session = open_session(&db, false).unwrap();
    assert!(session.is_persistent());
    assert_eq!(session.engine().variables(), ["P", "Q"]);
    assert_eq!(session.engine().expressions().len(), 1);
    assert_eq!(session.engine().valid_truths().len(), 1);
    assert_eq!(session.ledger().truths().len(), 1);
    cmd_table(&session, true).unwrap();
    cmd_tautology(&session, "P or not P", false).unwrap();
    cmd_status(&session, true).unwrap();
}

#[test]
fn test_invalid_variable_propagates() {
    let mut session = open_session(std::path::Path::new("unused.db"), true).unwrap();
    let result = cmd_var_add(&mut session, &strings(&["A", "not"]), false);
    assert!(matches!(result, Err(AletheiaError::Validation(_))));
    assert_eq!(session.engine().variables(), ["A"]);
}

#[test]
fn test_reset_clears_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("aletheia.db");
    {
        let mut session = open_session(&db, false).unwrap();
        cmd_var_add(&mut session, &strings(&["A"]), false).unwrap();
        cmd_reset(&mut session).unwrap();
    }
    let session = open_session(&db, false).unwrap();
    assert!(session.engine().variables().is_empty());
}

// =============================================================================
// PREMISE COMMANDS
// =============================================================================

#[test]
fn test_premises_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("aletheia.db");
    {
        let mut session = open_session(&db, false).unwrap();
        cmd_premise_add(&mut session, "All humans are mortal.").unwrap();
        cmd_premise_add(&mut session, "Socrates is a human.").unwrap();
        cmd_premise_challenge(&mut session, "Zeus is a god.", false).unwrap();
    }
    let session = open_session(&db, false).unwrap();
    assert_eq!(
        session.premises(),
        ["All humans are mortal.", "Socrates is a human."]
    );
    assert_eq!(session.ledger().rejected().len(), 1);
    cmd_premise_list(&session, false).unwrap();
    cmd_ledger(&session, LedgerSection::All, false).unwrap();
    cmd_ledger(&session, LedgerSection::Rejected, true).unwrap();
}

#[test]
fn test_empty_premise_is_error() {
    let mut session = open_session(std::path::Path::new("unused.db"), true).unwrap();
    let result = cmd_premise_add(&mut session, "");
    assert!(matches!(result, Err(AletheiaError::Validation(_))));
}

// =============================================================================
// REASONING COMMANDS
// =============================================================================

#[tokio::test]
async fn test_conclude_without_generator_is_refused() {
    let mut session = open_session(std::path::Path::new("unused.db"), true).unwrap();
    cmd_premise_add(&mut session, "p").unwrap();
    let config = GeneratorConfig {
        provider: Provider::None,
        ..GeneratorConfig::default()
    };
    let result = cmd_conclude(session, &config, false).await;
    assert!(matches!(
        result,
        Err(AletheiaError::Generator(GeneratorError::NotConfigured))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_conclude_with_unreachable_server_exhausts() {
    let mut session = open_session(std::path::Path::new("unused.db"), true).unwrap();
    cmd_premise_add(&mut session, "p").unwrap();
    session.set_max_attempts(1);
    let config = GeneratorConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 5,
        ..GeneratorConfig::default()
    };
    let conclusion = cmd_conclude(session, &config, true).await.unwrap();
    assert!(!conclusion.is_validated());
    assert!(conclusion.text().starts_with("error: unable to generate a response"));
}

// =============================================================================
// EXPORT
// =============================================================================

#[test]
fn test_export_writes_decodable_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir.path().join("aletheia.db"), false).unwrap();
    cmd_var_add(&mut session, &strings(&["A"]), false).unwrap();
    cmd_expr_add(&mut session, &strings(&["A or not A"]), false).unwrap();
    cmd_validate(&mut session, "A or not A", false).unwrap();

    let output = dir.path().join("ledger.alth");
    cmd_export(&session, &output).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    let export = ledger_from_bytes(&bytes).unwrap();
    assert_eq!(export.truths.len(), 1);
    assert_eq!(export.truths[0].expression, "A or not A");
}

#[test]
fn test_export_to_missing_directory_fails() {
    let session = open_session(std::path::Path::new("unused.db"), true).unwrap();
    let result = cmd_export(&session, std::path::Path::new("/no/such/dir/out.alth"));
    assert!(matches!(result, Err(AletheiaError::Io(_))));
}
