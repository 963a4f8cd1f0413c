//! Question-answering scorers.
//!
//! A [`Scorer`] takes a question and a context passage and returns the
//! answer span it found in the context together with a confidence score.
//! The response selector treats it as a black box.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::Config;
use crate::models::ScoredSpan;
use crate::ollama::{OllamaClientBuilder, OllamaError};

mod lexical;
mod llm;

pub use lexical::LexicalScorer;
pub use llm::{OllamaScorer, OllamaScorerBuilder};

/// Errors a scorer can report for a single (question, context) pair.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Ollama(#[from] OllamaError),

    /// The model answered, but the reply could not be understood
    #[error("Malformed scorer response: {message}")]
    MalformedResponse { message: String },
}

/// Extractive question answering over one context passage.
pub trait Scorer: Send + Sync {
    /// Finds the span of `context` that best answers `question`.
    fn score(&self, question: &str, context: &str) -> Result<ScoredSpan, ScoringError>;

    /// Short name used in logs and the UI.
    fn name(&self) -> &str;
}

/// Which scorer implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ScorerKind {
    /// Offline term-overlap scorer
    #[default]
    Lexical,
    /// LLM served by an Ollama-compatible API
    Ollama,
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for ScorerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lexical" => Ok(Self::Lexical),
            "ollama" => Ok(Self::Ollama),
            other => anyhow::bail!("unknown scorer '{other}' (expected 'lexical' or 'ollama')"),
        }
    }
}

/// Builds the scorer selected by `config`.
///
/// For the Ollama scorer without a configured model, the largest installed
/// model is used.
///
/// # Errors
///
/// Returns an error if the Ollama client cannot be created, the model list
/// cannot be fetched, or no model is installed.
pub fn build_scorer(config: &Config) -> Result<Arc<dyn Scorer>> {
    match config.scorer {
        ScorerKind::Lexical => Ok(Arc::new(LexicalScorer::new())),
        ScorerKind::Ollama => {
            let mut builder = OllamaClientBuilder::new();
            if let Some(host) = &config.ollama_host {
                builder = builder.base_url(host.clone());
            }
            if let Some(model) = &config.ollama_model {
                builder = builder.model(model.clone());
            }
            let client = builder.build().context("Failed to create Ollama client")?;

            let model = if client.model().is_empty() {
                let models = client
                    .list_models()
                    .with_context(|| format!("Failed to list models at {}", client.base_url()))?;
                models
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("No models installed at {}", client.base_url()))?
            } else {
                client.model().to_string()
            };

            tracing::info!(model = %model, host = client.base_url(), "using ollama scorer");
            let scorer = OllamaScorerBuilder::new()
                .client(Arc::new(client))
                .model(model)
                .build()?;
            Ok(Arc::new(scorer))
        }
    }
}
