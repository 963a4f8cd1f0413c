/// Ollama HTTP client module.
///
/// Blocking client for an Ollama-compatible API, used by the LLM-backed scorer.
mod client;

pub use client::{
    DEFAULT_OLLAMA_HOST, OllamaClient, OllamaClientBuilder, OllamaClientTrait, OllamaError,
    retry_with_backoff,
};
