//! # Configuration
//!
//! TOML configuration for the Aletheia binary.
//!
//! Resolution order:
//! 1. `--config <path>` (must exist)
//! 2. `ALETHEIA_CONFIG` environment variable (must exist)
//! 3. `aletheia.toml` in the working directory, if present
//! 4. Built-in defaults
//!
//! Every section and every key is optional. API keys are never stored in
//! the file; `api_key_env` names the environment variable to read.

use aletheia_core::{AletheiaError, ReasoningConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "ALETHEIA_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "aletheia.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

/// Which backend serves text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Ollama's `/api/generate`.
    #[default]
    Ollama,
    /// An OpenAI-compatible `/v1/chat/completions`.
    Openai,
    /// No generator; drawing a conclusion is refused at the CLI.
    None,
}

/// `[generator]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub provider: Provider,
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    /// Lowercase every response before it reaches the loop.
    ///
    /// Variable names are case-sensitive: with this on, register
    /// lowercase variables or no generated conclusion can validate.
    pub lowercase_responses: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            max_tokens: 100,
            lowercase_responses: true,
        }
    }
}

impl GeneratorConfig {
    /// Read the API key from the configured environment variable.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// `[background]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Seconds between background reasoning rounds.
    pub interval_secs: u64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self { interval_secs: 10 }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reasoning: ReasoningConfig,
    pub generator: GeneratorConfig,
    pub background: BackgroundConfig,
}

impl AppConfig {
    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, AletheiaError> {
        let config: Self =
            toml::from_str(content).map_err(|e| AletheiaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, AletheiaError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AletheiaError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AletheiaError::Config(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            AletheiaError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve and load the configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AletheiaError> {
        match resolve_path(explicit, std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            None => {
                tracing::debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), AletheiaError> {
        validate_max_attempts(self.reasoning.max_attempts)?;
        if self.generator.timeout_secs == 0 {
            return Err(AletheiaError::Config(
                "generator.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.background.interval_secs == 0 {
            return Err(AletheiaError::Config(
                "background.interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reject an attempt budget of zero, from the file or the command line.
pub fn validate_max_attempts(max_attempts: usize) -> Result<(), AletheiaError> {
    if max_attempts == 0 {
        return Err(AletheiaError::Config(
            "reasoning.max_attempts must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Pick the config file: explicit path, then environment, then the
/// default file if it exists.
#[must_use]
pub fn resolve_path(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = from_env {
        return Some(path);
    }
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.is_file().then_some(default)
}
