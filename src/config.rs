//! Runtime configuration.
//!
//! Values come from the process environment (after `.env` is loaded by the
//! binary) and may then be overridden by command-line flags.

use std::path::PathBuf;

use crate::scorer::ScorerKind;

/// Selects the scorer: `lexical` (default) or `ollama`.
pub const SCORER_ENV: &str = "QADOC_SCORER";
/// Log file for the terminal UI. Unset means the TUI does not log.
pub const LOG_FILE_ENV: &str = "QADOC_LOG_FILE";
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Scorer implementation used for queries
    pub scorer: ScorerKind,
    /// Ollama base URL; the client default applies when unset
    pub ollama_host: Option<String>,
    /// Ollama model; the largest installed model is used when unset
    pub ollama_model: Option<String>,
    /// Where the TUI writes its log
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads configuration from environment variables.
    ///
    /// An unrecognised `QADOC_SCORER` value falls back to the default with a
    /// warning. Empty values count as unset.
    pub fn from_env() -> Self {
        let scorer = match non_empty_var(SCORER_ENV) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring {SCORER_ENV}");
                ScorerKind::default()
            }),
            None => ScorerKind::default(),
        };

        Self {
            scorer,
            ollama_host: non_empty_var(OLLAMA_HOST_ENV),
            ollama_model: non_empty_var(OLLAMA_MODEL_ENV),
            log_file: non_empty_var(LOG_FILE_ENV).map(PathBuf::from),
        }
    }

    /// Applies command-line overrides on top of this configuration.
    pub fn with_overrides(
        mut self,
        scorer: Option<ScorerKind>,
        ollama_host: Option<String>,
        ollama_model: Option<String>,
    ) -> Self {
        if let Some(scorer) = scorer {
            self.scorer = scorer;
        }
        if ollama_host.is_some() {
            self.ollama_host = ollama_host;
        }
        if ollama_model.is_some() {
            self.ollama_model = ollama_model;
        }
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
