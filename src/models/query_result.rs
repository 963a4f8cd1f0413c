use serde::{Deserialize, Serialize};

/// What a scorer returns for one (question, context) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSpan {
    /// The extracted answer span
    pub answer: String,
    /// Scorer confidence; higher is better
    pub score: f64,
}

impl ScoredSpan {
    pub fn new(answer: impl Into<String>, score: f64) -> Self {
        Self {
            answer: answer.into(),
            score,
        }
    }

    /// A span carrying no answer at all.
    pub fn empty() -> Self {
        Self::new(String::new(), 0.0)
    }
}

/// The best-scoring pairing found across a document during one query.
///
/// Recomputed on every query and never retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// The answer span returned by the scorer
    answer: String,
    /// The winning score
    score: f64,
    /// Main question of the record the winning candidate belongs to
    question: String,
    /// The candidate string that was scored as context
    context: String,
}

impl QueryResult {
    pub fn new(
        span: ScoredSpan,
        question: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            answer: span.answer,
            score: span.score,
            question: question.into(),
            context: context.into(),
        }
    }

    /// Returns the answer span.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns the winning score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the main question of the record that produced the answer.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Returns the candidate text the answer was extracted from.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns true if the answer span has visible text.
    ///
    /// An empty span is reported to the user the same way as no result.
    pub fn has_answer(&self) -> bool {
        !self.answer.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_result_keeps_span_and_provenance() {
        let result = QueryResult::new(ScoredSpan::new("blue", 0.8), "Favourite colour?", "It is blue");
        assert_eq!(result.answer(), "blue");
        assert_eq!(result.score(), 0.8);
        assert_eq!(result.question(), "Favourite colour?");
        assert_eq!(result.context(), "It is blue");
        assert!(result.has_answer());
    }

    #[test]
    fn blank_span_has_no_answer() {
        let result = QueryResult::new(ScoredSpan::new("   ", 0.9), "Q", "C");
        assert!(!result.has_answer());

        let result = QueryResult::new(ScoredSpan::empty(), "Q", "C");
        assert!(!result.has_answer());
    }
}
