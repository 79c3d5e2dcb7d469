//! # Text Generator Module
//!
//! The seam between the reasoning core and a language model.
//!
//! The core never talks to a network. Whatever produces text (an HTTP
//! client, a local model, a test script) implements `TextGenerator`.

use crate::types::GeneratorError;

/// Produces text for a prompt.
///
/// Calls may block. A failure is returned as a typed error; the
/// conclusion loop turns it into an error-string candidate.
pub trait TextGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError>;

    /// Cap the length of future responses. Ignored by generators without
    /// a token limit.
    fn set_max_tokens(&mut self, _max_tokens: u32) {}
}

/// A generator that always fails with `GeneratorError::NotConfigured`.
///
/// Stands in when no provider is configured, so a draw degrades to an
/// exhausted cycle instead of aborting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl TextGenerator for Unconfigured {
    fn generate(&mut self, _prompt: &str) -> Result<String, GeneratorError> {
        Err(GeneratorError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_always_fails() {
        let mut generator = Unconfigured;
        assert_eq!(
            generator.generate("anything"),
            Err(GeneratorError::NotConfigured)
        );
    }
}
