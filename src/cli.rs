//! Command-line interface definitions and command handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::models::Document;
use crate::scorer::{ScorerKind, build_scorer};
use crate::selector::ResponseSelector;
use crate::utils::{format_response, load_document, truncate_text};

/// qadoc - answer questions from a structured interview document
#[derive(Parser, Debug)]
#[command(name = "qadoc")]
#[command(about = "Answer questions from a plain-text Q&A document")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the records parsed from a document
    Parse(ParseCommand),
    /// Answer a single question from a document
    Ask(AskCommand),
    /// Browse a document and ask questions interactively
    Tui(TuiCommand),
}

/// Parse a document
#[derive(Parser, Debug)]
pub struct ParseCommand {
    /// Path to the document
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the records as JSON instead of a listing
    #[arg(long)]
    pub json: bool,
}

/// Ask a question
#[derive(Parser, Debug)]
pub struct AskCommand {
    /// Path to the document
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// The question to answer
    #[arg(value_name = "QUESTION")]
    pub question: String,

    #[command(flatten)]
    pub scorer: ScorerArgs,
}

/// Start the terminal UI
#[derive(Parser, Debug)]
pub struct TuiCommand {
    /// Path to the document
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub scorer: ScorerArgs,
}

/// Scorer selection flags shared by `ask` and `tui`.
///
/// Unset flags fall back to the environment.
#[derive(Args, Debug, Default, Clone)]
pub struct ScorerArgs {
    /// Scorer used to rank candidate answers
    #[arg(long, value_enum, value_name = "SCORER")]
    pub scorer: Option<ScorerKind>,

    /// Ollama model (defaults to the largest installed model)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ollama base URL
    #[arg(long, value_name = "URL")]
    pub ollama_host: Option<String>,
}

impl ScorerArgs {
    /// Layers these flags over `config`.
    pub fn apply(&self, config: Config) -> Config {
        config.with_overrides(self.scorer, self.ollama_host.clone(), self.model.clone())
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad input: an empty question or a document that cannot
/// be read. Only the top-level message is inspected, so a wrapped scorer
/// failure stays internal whatever its cause says.
pub fn is_user_error(error: &anyhow::Error) -> bool {
    let error_msg = error.to_string();
    error_msg.contains("cannot be empty")
        || error_msg.starts_with("Failed to read document")
        || error_msg.starts_with("Document is not valid UTF-8")
}

/// Handles the parse command.
pub fn handle_parse(cmd: &ParseCommand) -> Result<()> {
    let (_, document) = load_document(&cmd.file)?;
    let output = if cmd.json {
        serde_json::to_string_pretty(&document).context("Failed to serialize records")?
    } else {
        render_listing(&document)
    };
    println!("{output}");
    Ok(())
}

/// Renders records as a numbered listing with indented candidates.
fn render_listing(document: &Document) -> String {
    if document.is_empty() {
        return "No \"Main Question:\" blocks found".to_string();
    }

    let mut out = String::new();
    for (i, record) in document.records().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}. {}", i + 1, record.question()));
        for answer in record.answers() {
            out.push_str(&format!("\n   - {}", truncate_text(answer, 200)));
        }
    }
    out
}

/// Handles the ask command.
pub fn handle_ask(cmd: &AskCommand, config: &Config) -> Result<()> {
    let answer = execute_ask(&cmd.file, &cmd.question, config)?;
    println!("{answer}");
    Ok(())
}

/// Loads the document, builds the scorer and answers `question`.
///
/// Returns the response line as it should be printed.
fn execute_ask(file: &Path, question: &str, config: &Config) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question cannot be empty");
    }

    let (_, document) = load_document(file)?;
    let scorer = build_scorer(config).context("Failed to set up scorer")?;
    let selector = ResponseSelector::new(scorer);

    let outcome = selector
        .select(question, &document)
        .context("Failed to answer question")?;
    Ok(format_response(outcome.as_ref()))
}

/// Handles the tui command.
pub fn handle_tui(cmd: &TuiCommand, config: &Config) -> Result<()> {
    crate::tui::run(&cmd.file, config)
}
