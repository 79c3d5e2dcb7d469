//! # Aletheia CLI Module
//!
//! This module implements the CLI interface for Aletheia.
//!
//! ## Available Commands
//!
//! - `var add` / `expr add` - Register variables and expressions
//! - `reset` - Forget all variables and expressions
//! - `table` - Print the truth table
//! - `validate` / `tautology` - Query the tautology oracle
//! - `premise add|challenge|list` - Manage premises
//! - `conclude` - Draw a conclusion with the configured generator
//! - `ledger` - List recorded truths, rejections and conclusions
//! - `export` - Export the ledger
//! - `interact` - Interactive premise REPL
//! - `think` - Periodic background reasoning

mod commands;

use crate::config::{AppConfig, validate_max_attempts};
use aletheia_core::AletheiaError;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Aletheia - Socratic reasoning over a truth-table oracle
///
/// Premises go in, a language model proposes conclusions, and only
/// tautologies are accepted as truth.
#[derive(Parser, Debug)]
#[command(name = "aletheia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the redb database
    #[arg(short = 'D', long, global = true, default_value = "aletheia.db")]
    pub database: PathBuf,

    /// Use a volatile in-memory store instead of the database
    #[arg(long, global = true)]
    pub memory: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the attempt budget of the conclusion loop
    #[arg(long, global = true)]
    pub max_attempts: Option<usize>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register truth-table variables
    Var {
        #[command(subcommand)]
        action: VarAction,
    },

    /// Register expressions
    Expr {
        #[command(subcommand)]
        action: ExprAction,
    },

    /// Forget all variables and expressions
    Reset,

    /// Print the truth table over the registered variables
    Table,

    /// Validate a registered expression and record it as a truth
    Validate {
        /// Expression text, e.g. "(p and (p implication q)) implication q"
        expression: String,
    },

    /// Check whether an expression is a tautology
    Tautology {
        /// Expression text
        expression: String,
    },

    /// Manage premises
    Premise {
        #[command(subcommand)]
        action: PremiseAction,
    },

    /// Draw a conclusion from the current premises
    Conclude,

    /// List ledger entries
    Ledger {
        /// Which section to list
        #[arg(short, long, value_enum, default_value = "all")]
        section: LedgerSection,
    },

    /// Export the ledger to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Interactive premise REPL (add, challenge, conclude, set_tokens, exit)
    Interact,

    /// Reason in the background on a fixed interval
    Think {
        /// Premise added before every round
        #[arg(short, long)]
        prompt: String,

        /// Stop after this many rounds (default: until Ctrl-C)
        #[arg(short, long)]
        rounds: Option<u64>,

        /// Seconds between rounds (default: from configuration)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum VarAction {
    /// Add one or more variables
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExprAction {
    /// Add one or more expressions
    Add {
        #[arg(required = true)]
        expressions: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PremiseAction {
    /// Add a premise
    Add { text: String },
    /// Challenge a premise, removing it and every overlapping premise
    Challenge { text: String },
    /// List current premises
    List,
}

/// Ledger sections selectable with `ledger --section`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LedgerSection {
    Truths,
    Rejected,
    Conclusions,
    All,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AletheiaError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let mut reasoning = config.reasoning.clone();
    if let Some(max_attempts) = cli.max_attempts {
        validate_max_attempts(max_attempts)?;
        reasoning.max_attempts = max_attempts;
    }

    let mut session = open_session(&cli.database, cli.memory)?.with_config(reasoning);
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Var {
            action: VarAction::Add { names },
        }) => cmd_var_add(&mut session, &names, json_mode),
        Some(Commands::Expr {
            action: ExprAction::Add { expressions },
        }) => cmd_expr_add(&mut session, &expressions, json_mode),
        Some(Commands::Reset) => cmd_reset(&mut session),
        Some(Commands::Table) => cmd_table(&session, json_mode),
        Some(Commands::Validate { expression }) => {
            cmd_validate(&mut session, &expression, json_mode)
        }
        Some(Commands::Tautology { expression }) => {
            cmd_tautology(&session, &expression, json_mode)
        }
        Some(Commands::Premise { action }) => match action {
            PremiseAction::Add { text } => cmd_premise_add(&mut session, &text),
            PremiseAction::Challenge { text } => {
                cmd_premise_challenge(&mut session, &text, json_mode)
            }
            PremiseAction::List => cmd_premise_list(&session, json_mode),
        },
        Some(Commands::Conclude) => cmd_conclude(session, &config.generator, json_mode)
            .await
            .map(drop),
        Some(Commands::Ledger { section }) => cmd_ledger(&session, section, json_mode),
        Some(Commands::Export { output }) => cmd_export(&session, &output),
        Some(Commands::Interact) => cmd_interact(session, &config.generator).await,
        Some(Commands::Think {
            prompt,
            rounds,
            interval,
        }) => {
            let interval = Duration::from_secs(interval.unwrap_or(config.background.interval_secs));
            cmd_think(session, &config.generator, prompt, rounds, interval, json_mode).await
        }
        None => {
            // No subcommand - show status by default
            cmd_status(&session, json_mode)
        }
    }
}
