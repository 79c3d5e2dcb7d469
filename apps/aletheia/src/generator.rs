//! # HTTP Text Generators
//!
//! `TextGenerator` implementations that call a language model over HTTP.
//!
//! The core's trait is synchronous. These generators hold a tokio runtime
//! handle and block on the async reqwest call, so they must only be driven
//! from a blocking context (`spawn_blocking` or a plain thread), never from
//! inside an async task.

use crate::config::{GeneratorConfig, Provider};
use aletheia_core::{GeneratorError, TextGenerator, Unconfigured};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::runtime::Handle;

/// A generator that may be moved into a blocking task.
pub type BoxedGenerator = Box<dyn TextGenerator + Send>;

/// Build the generator described by `config`.
///
/// `Provider::None` yields `Unconfigured`, which fails every call.
#[must_use]
pub fn build_generator(config: &GeneratorConfig, handle: Handle) -> BoxedGenerator {
    match config.provider {
        Provider::None => Box::new(Unconfigured),
        Provider::Ollama | Provider::Openai => Box::new(HttpGenerator::new(config, handle)),
    }
}

/// Generator backed by Ollama or an OpenAI-compatible endpoint.
pub struct HttpGenerator {
    http: reqwest::Client,
    handle: Handle,
    provider: Provider,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
    max_tokens: u32,
    lowercase: bool,
}

impl std::fmt::Debug for HttpGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGenerator")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl HttpGenerator {
    pub fn new(config: &GeneratorConfig, handle: Handle) -> Self {
        Self {
            http: reqwest::Client::new(),
            handle,
            provider: config.provider,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key(),
            timeout_secs: config.timeout_secs,
            max_tokens: config.max_tokens,
            lowercase: config.lowercase_responses,
        }
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, prompt: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint(self.provider));
        let mut req = self
            .http
            .post(&url)
            .json(&request_body(self.provider, &self.model, prompt, self.max_tokens));
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, GeneratorError> {
        req.send()
            .await
            .map_err(|e| GeneratorError::Unavailable(format!("{}: {e}", self.base_url)))
    }

    /// Check status codes and parse JSON.
    async fn handle_response(resp: reqwest::Response) -> Result<Value, GeneratorError> {
        let status = resp.status().as_u16();
        if let Some(err) = status_error(status) {
            return Err(match err {
                GeneratorError::Server(code, _) => {
                    GeneratorError::Server(code, resp.text().await.unwrap_or_default())
                }
                other => other,
            });
        }
        resp.json::<Value>()
            .await
            .map_err(|e| GeneratorError::Parse(e.to_string()))
    }

    async fn call(&self, prompt: &str) -> Result<Value, GeneratorError> {
        let resp = self.send(self.request(prompt)).await?;
        Self::handle_response(resp).await
    }
}

impl TextGenerator for HttpGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError> {
        let timeout = Duration::from_secs(self.timeout_secs);
        let body = self
            .handle
            .block_on(async { tokio::time::timeout(timeout, self.call(prompt)).await })
            .map_err(|_| GeneratorError::Timeout(self.timeout_secs))??;

        let text = extract_text(self.provider, &body)?;
        tracing::debug!(provider = ?self.provider, chars = text.len(), "Generated text");
        Ok(normalize_response(text, self.lowercase))
    }

    fn set_max_tokens(&mut self, max_tokens: u32) {
        tracing::info!(max_tokens, "Max tokens set");
        self.max_tokens = max_tokens;
    }
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// Path appended to `base_url`.
#[must_use]
pub fn endpoint(provider: Provider) -> &'static str {
    match provider {
        Provider::Openai => "/v1/chat/completions",
        Provider::Ollama | Provider::None => "/api/generate",
    }
}

/// JSON request body for one prompt.
#[must_use]
pub fn request_body(provider: Provider, model: &str, prompt: &str, max_tokens: u32) -> Value {
    match provider {
        Provider::Openai => json!({
            "model": model,
            "messages": [
                {"role": "system", "content": ""},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": max_tokens,
        }),
        Provider::Ollama | Provider::None => json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": {"num_predict": max_tokens},
        }),
    }
}

/// Pull the generated text out of a response body.
pub fn extract_text(provider: Provider, body: &Value) -> Result<String, GeneratorError> {
    let text = match provider {
        Provider::Openai => body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str),
        Provider::Ollama | Provider::None => body.get("response").and_then(Value::as_str),
    };
    text.map(|t| t.trim().to_string()).ok_or_else(|| {
        GeneratorError::Parse(format!("missing text field in response from {provider:?}"))
    })
}

/// Map an HTTP status to a generator error, if it is one.
///
/// The `Server` body is filled in by the caller.
#[must_use]
pub fn status_error(status: u16) -> Option<GeneratorError> {
    match status {
        401 => Some(GeneratorError::Unauthorized),
        429 => Some(GeneratorError::RateLimited),
        500..=599 => Some(GeneratorError::Server(status, String::new())),
        _ => None,
    }
}

/// Apply the `lowercase_responses` setting to generated text.
///
/// Variable names are case-sensitive, so a lowercased conclusion only
/// validates against lowercase variables.
#[must_use]
pub fn normalize_response(text: String, lowercase: bool) -> String {
    if lowercase { text.to_lowercase() } else { text }
}
