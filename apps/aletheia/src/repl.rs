//! # Premise REPL
//!
//! Line-oriented interactive loop over a session.
//!
//! Commands: `add`, `challenge`, `conclude`, `set_tokens`, `exit`.
//! Commands are case-insensitive; the argument of each command is asked
//! for on its own line. End of input behaves like `exit`.

use aletheia_core::{
    AletheiaError, Challenge, PersistentStore, RejectionKind, Session, Severity, TextGenerator,
};
use std::io::{BufRead, Write};

/// Printed before every command prompt.
pub const HELP_LINE: &str = "Commands: add, challenge, conclude, set_tokens, exit";

fn io_err(e: std::io::Error) -> AletheiaError {
    AletheiaError::Io(e.to_string())
}

/// Print `prompt` and read one trimmed line. `None` at end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<String>, AletheiaError> {
    write!(output, "{prompt}").map_err(io_err)?;
    output.flush().map_err(io_err)?;
    let mut line = String::new();
    if input.read_line(&mut line).map_err(io_err)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the REPL until `exit` or end of input.
pub fn run<S, G, R, W>(
    session: &mut Session<S>,
    generator: &mut G,
    input: &mut R,
    output: &mut W,
) -> Result<(), AletheiaError>
where
    S: PersistentStore,
    G: TextGenerator + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "\n{HELP_LINE}").map_err(io_err)?;
        let Some(command) = ask(input, output, "> ")? else {
            break;
        };

        match command.to_lowercase().as_str() {
            "exit" => {
                writeln!(output, "Exiting Socratic reasoning.").map_err(io_err)?;
                break;
            }
            "add" => {
                let Some(premise) = ask(input, output, "Enter the premise: ")? else {
                    break;
                };
                let written = match session.add_premise(&premise) {
                    Ok(()) => writeln!(output, "Added premise: {premise}"),
                    Err(e) => writeln!(output, "Rejected: {e}"),
                };
                written.map_err(io_err)?;
            }
            "challenge" => {
                let Some(premise) = ask(input, output, "Enter the premise to challenge: ")?
                else {
                    break;
                };
                let written = match session.challenge_premise(&premise) {
                    Challenge::NotFound => writeln!(output, "Premise not found: {premise}"),
                    Challenge::Removed { equivalents } => writeln!(
                        output,
                        "Removed premise: {premise} ({} equivalent removed)",
                        equivalents.len()
                    ),
                };
                written.map_err(io_err)?;
            }
            "conclude" => {
                let conclusion = session.draw_conclusion(generator);
                writeln!(output, "{conclusion}").map_err(io_err)?;
            }
            "set_tokens" => {
                let Some(tokens) = ask(
                    input,
                    output,
                    "Enter the maximum number of tokens for the conclusion: ",
                )?
                else {
                    break;
                };
                match parse_tokens(&tokens) {
                    Some(max_tokens) => {
                        generator.set_max_tokens(max_tokens);
                        writeln!(output, "Max tokens set to: {max_tokens}").map_err(io_err)?;
                    }
                    None => {
                        tracing::error!(input = %tokens, "Invalid number of tokens");
                        session.log_not_premise(
                            RejectionKind::InvalidCommand,
                            Severity::Error,
                            "Invalid number of tokens.",
                        );
                        writeln!(output, "Invalid number of tokens.").map_err(io_err)?;
                    }
                }
            }
            _ => {
                session.log_not_premise(
                    RejectionKind::InvalidCommand,
                    Severity::Error,
                    "Invalid command.",
                );
                writeln!(output, "Invalid command.").map_err(io_err)?;
            }
        }
    }
    Ok(())
}

/// A token limit: ASCII digits only, fitting in `u32`.
fn parse_tokens(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
