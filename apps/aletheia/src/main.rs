//! # Aletheia - Socratic Reasoning CLI
//!
//! The main binary for the Aletheia reasoning loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    apps/aletheia (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌──────────────┐    ┌──────────────────┐   │
//! │  │   CLI       │    │  Generators  │    │  REPL / think    │   │
//! │  │  (clap)     │    │  (reqwest)   │    │  (tokio)         │   │
//! │  └──────┬──────┘    └──────┬───────┘    └────────┬─────────┘   │
//! │         │                  │                     │              │
//! │         └──────────────────┼─────────────────────┘              │
//! │                            ▼                                    │
//! │                   ┌────────────────┐                            │
//! │                   │ aletheia-core  │                            │
//! │                   │  (THE LOGIC)   │                            │
//! │                   └────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! aletheia var add p q
//! aletheia expr add "(p and (p implication q)) implication q"
//! aletheia validate "(p and (p implication q)) implication q"
//! aletheia premise add "All humans are mortal."
//! aletheia conclude
//! ```

use aletheia::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // ALETHEIA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ALETHEIA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "aletheia=info,aletheia_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Aletheia startup banner.
fn print_banner() {
    println!(
        r#"
   ▄▀█ █░░ █▀▀ ▀█▀ █░█ █▀▀ █ ▄▀█
   █▀█ █▄▄ ██▄ ░█░ █▀█ ██▄ █ █▀█

  Socratic Reasoning v{}

  Premises • Truth Tables • Tautologies
"#,
        env!("CARGO_PKG_VERSION")
    );
}
