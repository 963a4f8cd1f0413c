pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod ollama;
pub mod parser;
pub mod scorer;
pub mod selector;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{Document, QueryResult, Record, ScoredSpan};
pub use ollama::{OllamaClient, OllamaClientBuilder, OllamaClientTrait, OllamaError};
pub use parser::parse_document;
pub use scorer::{LexicalScorer, OllamaScorer, Scorer, ScorerKind, ScoringError, build_scorer};
pub use selector::{ResponseSelector, ResponseSelectorBuilder};
