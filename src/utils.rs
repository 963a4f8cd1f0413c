//! Shared helpers for document loading and response formatting.
//!
//! These functions are reused across the CLI and TUI interfaces.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Document, QueryResult};
use crate::parser::parse_document;

/// Shown when a query produced no usable answer.
pub const NO_ANSWER_MESSAGE: &str = "No relevant answer found in the document.";

/// Reads an uploaded document as UTF-8 text.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn load_document_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    String::from_utf8(bytes)
        .with_context(|| format!("Document is not valid UTF-8: {}", path.display()))
}

/// Reads and parses a document, returning the raw text alongside the records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn load_document(path: &Path) -> Result<(String, Document)> {
    let text = load_document_text(path)?;
    let document = parse_document(&text);
    tracing::info!(
        path = %path.display(),
        records = document.len(),
        candidates = document.candidate_count(),
        "loaded document"
    );
    Ok((text, document))
}

/// Formats a selector outcome as the single response line.
///
/// A missing result and a result with an empty span both read as
/// [`NO_ANSWER_MESSAGE`].
pub fn format_response(outcome: Option<&QueryResult>) -> String {
    match outcome {
        Some(result) if result.has_answer() => result.answer().to_string(),
        _ => NO_ANSWER_MESSAGE.to_string(),
    }
}

/// Truncates `text` to at most `max_chars` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
