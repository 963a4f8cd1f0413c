/// Ollama HTTP client implementation.
///
/// `OllamaClient` makes synchronous requests to `/api/generate` and `/api/tags`.
/// Generation requests ask for JSON output at temperature zero so repeated
/// scoring of the same pair stays stable.
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host used when neither the builder nor `OLLAMA_HOST` provides one.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Errors that can occur when talking to the Ollama API.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Connection failures, DNS resolution, unreadable bodies
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The server answered, but not with what was asked for
    #[error("Ollama API error: {message}")]
    Api { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl OllamaError {
    /// Splits reqwest failures into timeouts and other network errors.
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            OllamaError::Timeout(error)
        } else {
            OllamaError::Network(error)
        }
    }
}

/// Builder for constructing `OllamaClient` instances.
///
/// # Examples
///
/// ```
/// use qadoc::ollama::OllamaClientBuilder;
///
/// let client = OllamaClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .model("llama3.2:3b")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "llama3.2:3b");
/// ```
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl OllamaClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (e.g. "http://localhost:11434").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the default model name (e.g. "llama3.2:3b").
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the 60 second request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// Unset values fall back to `OLLAMA_HOST` / `OLLAMA_MODEL`, then to
    /// [`DEFAULT_OLLAMA_HOST`] and an empty model name. A trailing slash on
    /// the base URL is dropped.
    ///
    /// # Errors
    ///
    /// Returns `OllamaError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<OllamaClient, OllamaError> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var("OLLAMA_HOST").ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let model = self
            .model
            .or_else(|| std::env::var("OLLAMA_MODEL").ok())
            .unwrap_or_default();

        reqwest::Url::parse(&base_url)
            .map_err(|e| OllamaError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(60)))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(OllamaError::Network)?;

        Ok(OllamaClient {
            client,
            base_url,
            model,
        })
    }
}

/// Synchronous client for the Ollama API.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

/// Text generation seam, so scorers can be tested without a server.
pub trait OllamaClientTrait: Send + Sync {
    /// Sends `prompt` to `model` and returns the raw completion text.
    fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
    #[serde(default)]
    size: u64,
}

impl OllamaClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default model name; empty if none was configured.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Lists installed models, largest first.
    pub fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(OllamaError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OllamaError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(OllamaError::from_transport)?;
        parse_tags_response(&body)
    }

    fn post_generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            format: "json",
            options: GenerateOptions { temperature: 0.0 },
        };

        retry_with_backoff(|| {
            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .map_err(OllamaError::from_transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(OllamaError::Http {
                    status: status.as_u16(),
                });
            }

            let body = response.text().map_err(OllamaError::from_transport)?;
            parse_generate_response(&body)
        })
    }
}

impl OllamaClientTrait for OllamaClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        tracing::trace!(model, prompt_len = prompt.len(), "ollama generate");
        self.post_generate(model, prompt)
    }
}

/// Pulls the completion text out of a non-streaming `/api/generate` body.
fn parse_generate_response(body: &str) -> Result<String, OllamaError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(OllamaError::Serialization)?;

    if let Some(message) = parsed.error {
        return Err(OllamaError::Api { message });
    }

    parsed.response.ok_or_else(|| OllamaError::Api {
        message: "Missing 'response' field in API response".to_string(),
    })
}

/// Reads model names from an `/api/tags` body, sorted by size descending.
fn parse_tags_response(body: &str) -> Result<Vec<String>, OllamaError> {
    let mut tags: TagsResponse = serde_json::from_str(body).map_err(OllamaError::Serialization)?;
    tags.models.sort_by(|a, b| b.size.cmp(&a.size));
    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

/// Retries an operation with exponential backoff.
///
/// Up to 3 retries after the first attempt, sleeping 1s, 2s and 4s. Only
/// transient errors are retried (network, timeout, HTTP 5xx).
pub fn retry_with_backoff<F, T>(f: F) -> Result<T, OllamaError>
where
    F: FnMut() -> Result<T, OllamaError>,
{
    retry_with_delays(f, &[1, 2, 4])
}

fn retry_with_delays<F, T>(mut f: F, delays_secs: &[u64]) -> Result<T, OllamaError>
where
    F: FnMut() -> Result<T, OllamaError>,
{
    let mut last_error = match f() {
        Ok(result) => return Ok(result),
        Err(e) if !should_retry(&e) => return Err(e),
        Err(e) => e,
    };

    for &delay in delays_secs {
        tracing::warn!(error = %last_error, retry_in_secs = delay, "ollama request failed");
        thread::sleep(Duration::from_secs(delay));

        match f() {
            Ok(result) => return Ok(result),
            Err(e) if !should_retry(&e) => return Err(e),
            Err(e) => last_error = e,
        }
    }

    Err(last_error)
}

/// Returns true for transient errors worth another attempt.
fn should_retry(error: &OllamaError) -> bool {
    match error {
        OllamaError::Network(_) | OllamaError::Timeout(_) => true,
        OllamaError::Http { status } => (500..600).contains(status),
        OllamaError::Serialization(_) | OllamaError::Api { .. } | OllamaError::InvalidUrl(_) => {
            false
        }
    }
}
