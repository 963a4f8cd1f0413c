//! Offline extractive scorer based on term overlap.
//!
//! The context is split into clauses and each clause is scored against the
//! question's content terms. The best clause is returned as the answer span.

use std::collections::HashSet;

use crate::models::ScoredSpan;

use super::{Scorer, ScoringError};

/// Words ignored when matching question terms.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could", "did", "do",
    "does", "for", "from", "had", "has", "have", "how", "i", "if", "in", "into", "is", "it",
    "its", "me", "my", "of", "on", "or", "our", "should", "so", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "to", "was", "we", "were", "what", "when",
    "where", "which", "who", "whom", "why", "will", "with", "would", "you", "your",
];

const CLAUSE_DELIMITERS: &[char] = &['.', '!', '?', ';', '\n'];

/// Deterministic term-overlap scorer.
///
/// A clause scores `coverage * (0.5 + 0.5 * density)` where `coverage` is the
/// share of question term weight (term length in chars) found in the clause
/// and `density` is the share of clause tokens that are question terms.
/// Scores fall in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    stop_words: HashSet<&'static str>,
}

impl LexicalScorer {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Lowercased alphanumeric content terms of `question`, deduplicated in
    /// first-seen order.
    fn question_terms(&self, question: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        tokenize(question)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t.as_str()))
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    fn score_clause(&self, terms: &[String], total_weight: usize, clause: &str) -> f64 {
        let tokens = tokenize(clause);
        if tokens.is_empty() {
            return 0.0;
        }
        let present: HashSet<&str> = tokens.iter().map(String::as_str).collect();

        let matched_weight: usize = terms
            .iter()
            .filter(|t| present.contains(t.as_str()))
            .map(|t| t.chars().count())
            .sum();
        if matched_weight == 0 {
            return 0.0;
        }

        let term_set: HashSet<&str> = terms.iter().map(String::as_str).collect();
        let matched_tokens = tokens
            .iter()
            .filter(|t| term_set.contains(t.as_str()))
            .count();

        let coverage = matched_weight as f64 / total_weight as f64;
        let density = matched_tokens as f64 / tokens.len() as f64;
        coverage * (0.5 + 0.5 * density)
    }
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for LexicalScorer {
    fn score(&self, question: &str, context: &str) -> Result<ScoredSpan, ScoringError> {
        let clauses = split_clauses(context);
        let Some(first) = clauses.first() else {
            return Ok(ScoredSpan::empty());
        };

        let terms = self.question_terms(question);
        let total_weight: usize = terms.iter().map(|t| t.chars().count()).sum();
        if total_weight == 0 {
            return Ok(ScoredSpan::new(*first, 0.0));
        }

        let mut best = ScoredSpan::new(*first, 0.0);
        for clause in &clauses {
            let score = self.score_clause(&terms, total_weight, clause);
            if score > best.score {
                best = ScoredSpan::new(*clause, score);
            }
        }

        Ok(best)
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Non-empty, trimmed clauses of `context`.
fn split_clauses(context: &str) -> Vec<&str> {
    context
        .split(CLAUSE_DELIMITERS)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}
