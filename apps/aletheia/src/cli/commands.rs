//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::LedgerSection;
use crate::config::{GeneratorConfig, Provider};
use crate::generator::build_generator;
use crate::repl;
use crate::think::{ThinkOptions, draw_blocking, think};
use aletheia_core::{
    AletheiaError, Challenge, Conclusion, GeneratorError, LedgerEntry, PersistentStore,
    Registration, Session, ledger_checksum, ledger_crypto_hash,
};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Handle;

/// Validate output path for security.
///
/// For output files, we validate the parent directory exists and is writable.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, AletheiaError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Canonicalize parent to resolve ".." and symlinks
    let canonical_parent = parent.canonicalize().map_err(|e| {
        AletheiaError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(AletheiaError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| AletheiaError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Open the redb database at `db_path`, or a volatile session.
pub fn open_session(db_path: &Path, memory: bool) -> Result<Session, AletheiaError> {
    if memory {
        Ok(Session::new())
    } else {
        Session::with_redb(db_path)
    }
}

fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Refuse to reason without a generator.
fn require_generator(config: &GeneratorConfig) -> Result<(), AletheiaError> {
    if config.provider == Provider::None {
        return Err(GeneratorError::NotConfigured.into());
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show session status.
pub fn cmd_status<S: PersistentStore>(
    session: &Session<S>,
    json_mode: bool,
) -> Result<(), AletheiaError> {
    let engine = session.engine();
    let ledger = session.ledger();

    if json_mode {
        print_json(&json!({
            "variables": engine.variables().len(),
            "expressions": engine.expressions().len(),
            "premises": session.premises().len(),
            "truths": ledger.truths().len(),
            "rejected": ledger.rejected().len(),
            "conclusions": ledger.conclusions().len(),
            "max_attempts": session.config().max_attempts,
        }));
    } else {
        println!("Aletheia Session Status");
        println!("=======================");
        println!("Variables:   {}", engine.variables().len());
        println!("Expressions: {}", engine.expressions().len());
        println!("Premises:    {}", session.premises().len());
        println!("Truths:      {}", ledger.truths().len());
        println!("Rejected:    {}", ledger.rejected().len());
        println!("Conclusions: {}", ledger.conclusions().len());
    }

    Ok(())
}

// =============================================================================
// TRUTH TABLE COMMANDS
// =============================================================================

fn print_registrations(kind: &str, results: &[(String, Registration)], json_mode: bool) {
    if json_mode {
        let items: Vec<Value> = results
            .iter()
            .map(|(name, r)| json!({ kind: name, "added": r.is_added() }))
            .collect();
        print_json(&Value::Array(items));
        return;
    }
    for (name, registration) in results {
        match registration {
            Registration::Added => println!("Added {kind}: {name}"),
            Registration::AlreadyPresent => println!("Already present {kind}: {name}"),
        }
    }
}

/// Register variables. Stops at the first invalid name.
pub fn cmd_var_add<S: PersistentStore>(
    session: &mut Session<S>,
    names: &[String],
    json_mode: bool,
) -> Result<(), AletheiaError> {
    let mut results = Vec::with_capacity(names.len());
    for name in names {
        results.push((name.clone(), session.add_variable(name)?));
    }
    print_registrations("variable", &results, json_mode);
    Ok(())
}

/// Register expressions. Stops at the first invalid expression.
pub fn cmd_expr_add<S: PersistentStore>(
    session: &mut Session<S>,
    expressions: &[String],
    json_mode: bool,
) -> Result<(), AletheiaError> {
    let mut results = Vec::with_capacity(expressions.len());
    for expression in expressions {
        results.push((expression.clone(), session.add_expression(expression)?));
    }
    print_registrations("expression", &results, json_mode);
    Ok(())
}

pub fn cmd_reset<S: PersistentStore>(session: &mut Session<S>) -> Result<(), AletheiaError> {
    session.reset_logic_tables();
    println!("Variables and expressions cleared");
    Ok(())
}

/// Print the truth table.
pub fn cmd_table<S: PersistentStore>(
    session: &Session<S>,
    json_mode: bool,
) -> Result<(), AletheiaError> {
    if json_mode {
        let rows: Vec<Value> = session
            .generate_truth_table()
            .iter()
            .map(|row| {
                let assignment: Map<String, Value> = row
                    .assignment
                    .iter()
                    .map(|(name, value)| (name.to_string(), Value::Bool(value)))
                    .collect();
                let results: Map<String, Value> = row
                    .results
                    .iter()
                    .map(|(expr, value)| (expr.clone(), Value::Bool(*value)))
                    .collect();
                json!({ "assignment": assignment, "results": results })
            })
            .collect();
        print_json(&Value::Array(rows));
    } else {
        print!("{}", session.render_table());
    }
    Ok(())
}

/// Validate a registered expression and record it as a truth.
pub fn cmd_validate<S: PersistentStore>(
    session: &mut Session<S>,
    expression: &str,
    json_mode: bool,
) -> Result<(), AletheiaError> {
    let valid = session.validate_truth(expression);
    if json_mode {
        print_json(&json!({ "expression": expression, "valid": valid }));
    } else if valid {
        println!("Valid truth: {expression}");
    } else {
        println!("Not a valid truth: {expression}");
    }
    Ok(())
}

/// Ask the oracle whether `expression` is a tautology.
pub fn cmd_tautology<S: PersistentStore>(
    session: &Session<S>,
    expression: &str,
    json_mode: bool,
) -> Result<(), AletheiaError> {
    let tautology = session.tautology(expression);
    if json_mode {
        print_json(&json!({ "expression": expression, "tautology": tautology }));
    } else {
        println!("{expression}: {tautology}");
    }
    Ok(())
}

// =============================================================================
// PREMISE COMMANDS
// =============================================================================

pub fn cmd_premise_add<S: PersistentStore>(
    session: &mut Session<S>,
    text: &str,
) -> Result<(), AletheiaError> {
    session.add_premise(text)?;
    println!("Added premise: {text}");
    Ok(())
}

pub fn cmd_premise_challenge<S: PersistentStore>(
    session: &mut Session<S>,
    text: &str,
    json_mode: bool,
) -> Result<(), AletheiaError> {
    let outcome = session.challenge_premise(text);
    if json_mode {
        let value = match &outcome {
            Challenge::NotFound => json!({ "premise": text, "removed": false }),
            Challenge::Removed { equivalents } => {
                json!({ "premise": text, "removed": true, "equivalents": equivalents })
            }
        };
        print_json(&value);
        return Ok(());
    }
    match outcome {
        Challenge::NotFound => println!("Premise not found: {text}"),
        Challenge::Removed { equivalents } => {
            println!("Removed premise: {text}");
            for equivalent in equivalents {
                println!("  also removed: {equivalent}");
            }
        }
    }
    Ok(())
}

pub fn cmd_premise_list<S: PersistentStore>(
    session: &Session<S>,
    json_mode: bool,
) -> Result<(), AletheiaError> {
    if json_mode {
        print_json(&json!(session.premises()));
    } else if session.premises().is_empty() {
        println!("No premises");
    } else {
        for (i, premise) in session.premises().iter().enumerate() {
            println!("{:>3}. {}", i + 1, premise);
        }
    }
    Ok(())
}

// =============================================================================
// REASONING COMMANDS
// =============================================================================

fn print_conclusion(conclusion: &Conclusion, json_mode: bool) {
    if json_mode {
        print_json(&json!({
            "conclusion": conclusion.text(),
            "validated": conclusion.is_validated(),
            "premises": conclusion.premises(),
        }));
    } else if conclusion.is_validated() {
        println!("Conclusion (validated): {conclusion}");
    } else {
        println!("Conclusion (unvalidated): {conclusion}");
    }
}

/// Draw one conclusion with the configured generator.
pub async fn cmd_conclude<S>(
    session: Session<S>,
    config: &GeneratorConfig,
    json_mode: bool,
) -> Result<Conclusion, AletheiaError>
where
    S: PersistentStore + Send + 'static,
{
    require_generator(config)?;
    let generator = build_generator(config, Handle::current());
    let (_, _, conclusion) = draw_blocking(session, generator, None).await?;
    print_conclusion(&conclusion, json_mode);
    Ok(conclusion)
}

/// Run the premise REPL on stdin/stdout.
pub async fn cmd_interact<S>(
    session: Session<S>,
    config: &GeneratorConfig,
) -> Result<(), AletheiaError>
where
    S: PersistentStore + Send + 'static,
{
    if config.provider == Provider::None {
        tracing::warn!("No text generator configured; 'conclude' will not produce conclusions");
    }
    let mut generator = build_generator(config, Handle::current());

    tokio::task::spawn_blocking(move || {
        let mut session = session;
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        repl::run(&mut session, &mut *generator, &mut input, &mut output)
    })
    .await
    .map_err(|e| AletheiaError::Io(format!("REPL task failed: {e}")))?
}

/// Reason in the background until the round limit or Ctrl-C.
pub async fn cmd_think<S>(
    session: Session<S>,
    config: &GeneratorConfig,
    prompt: String,
    rounds: Option<u64>,
    interval: Duration,
    json_mode: bool,
) -> Result<(), AletheiaError>
where
    S: PersistentStore + Send + 'static,
{
    require_generator(config)?;
    let generator = build_generator(config, Handle::current());
    let options = ThinkOptions {
        prompt,
        rounds,
        interval,
    };

    if !json_mode {
        println!("Thinking every {}s. Press Ctrl+C to stop.", interval.as_secs());
    }
    let (_, conclusions) = think(session, generator, options).await?;

    if json_mode {
        let items: Vec<Value> = conclusions
            .iter()
            .map(|c| json!({ "conclusion": c.text(), "validated": c.is_validated() }))
            .collect();
        print_json(&Value::Array(items));
    } else {
        let validated = conclusions.iter().filter(|c| c.is_validated()).count();
        println!(
            "{} round(s), {} validated conclusion(s)",
            conclusions.len(),
            validated
        );
    }
    Ok(())
}

// =============================================================================
// LEDGER COMMANDS
// =============================================================================

fn format_entry(entry: &LedgerEntry) -> String {
    let timestamp = entry.timestamp().to_rfc3339();
    match entry {
        LedgerEntry::Truth(truth) => format!("{timestamp} TRUTH {}", truth.expression),
        LedgerEntry::Rejected(rejected) => format!(
            "{timestamp} {} {}: {}",
            rejected.severity, rejected.kind, rejected.message
        ),
        LedgerEntry::Conclusion(record) => format!(
            "{timestamp} CONCLUSION [{}] {} <- {}",
            if record.validated {
                "validated"
            } else {
                "unvalidated"
            },
            record.conclusion,
            record.premises.join(" | ")
        ),
    }
}

/// List ledger entries.
pub fn cmd_ledger<S: PersistentStore>(
    session: &Session<S>,
    section: LedgerSection,
    json_mode: bool,
) -> Result<(), AletheiaError> {
    let ledger = session.ledger();

    if json_mode {
        let to_value = |v: serde_json::Result<Value>| {
            v.map_err(|e| AletheiaError::Serialization(e.to_string()))
        };
        let value = match section {
            LedgerSection::Truths => to_value(serde_json::to_value(ledger.truths()))?,
            LedgerSection::Rejected => to_value(serde_json::to_value(ledger.rejected()))?,
            LedgerSection::Conclusions => to_value(serde_json::to_value(ledger.conclusions()))?,
            LedgerSection::All => json!({
                "truths": to_value(serde_json::to_value(ledger.truths()))?,
                "rejected": to_value(serde_json::to_value(ledger.rejected()))?,
                "conclusions": to_value(serde_json::to_value(ledger.conclusions()))?,
            }),
        };
        print_json(&value);
        return Ok(());
    }

    let entries: Vec<LedgerEntry> = match section {
        LedgerSection::Truths => ledger
            .truths()
            .iter()
            .cloned()
            .map(LedgerEntry::Truth)
            .collect(),
        LedgerSection::Rejected => ledger
            .rejected()
            .iter()
            .cloned()
            .map(LedgerEntry::Rejected)
            .collect(),
        LedgerSection::Conclusions => ledger
            .conclusions()
            .iter()
            .cloned()
            .map(LedgerEntry::Conclusion)
            .collect(),
        LedgerSection::All => ledger.entries_chronological(),
    };

    if entries.is_empty() {
        println!("Ledger is empty");
    }
    for entry in &entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

/// Export the ledger and print its checksums.
pub fn cmd_export<S: PersistentStore>(
    session: &Session<S>,
    output: &Path,
) -> Result<(), AletheiaError> {
    let validated_output = validate_output_path(output)?;

    let data = session.export_ledger()?;
    println!("Checksum: {}", ledger_checksum(&data));
    println!("BLAKE3:   {}", ledger_crypto_hash(&data));

    std::fs::write(&validated_output, &data)
        .map_err(|e| AletheiaError::Io(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aletheia_core::{MemoryStore, NotPremise, RejectionKind, Severity};

    #[test]
    fn output_path_in_current_dir() {
        let path = validate_output_path(Path::new("ledger.bin")).expect("path");
        assert!(path.ends_with("ledger.bin"));
    }

    #[test]
    fn output_path_missing_parent() {
        assert!(validate_output_path(Path::new("/no/such/dir/ledger.bin")).is_err());
    }

    #[test]
    fn rejected_entry_format() {
        let entry = LedgerEntry::Rejected(NotPremise::new(
            RejectionKind::InvalidCommand,
            Severity::Error,
            "Invalid command.",
        ));
        assert!(format_entry(&entry).ends_with("ERROR invalid_command: Invalid command."));
    }

    #[test]
    fn missing_generator_is_refused() {
        let config = GeneratorConfig {
            provider: Provider::None,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            require_generator(&config),
            Err(AletheiaError::Generator(GeneratorError::NotConfigured))
        ));
        let mut session = Session::with_store(MemoryStore::new());
        cmd_var_add(&mut session, &["A".to_string()], false).expect("var");
        assert_eq!(session.engine().variables(), ["A"]);
    }
}
