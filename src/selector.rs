//! Response selection over a parsed document.
//!
//! Every candidate string in the document is scored against the user's
//! question and the highest-scoring answer span is kept.

use std::sync::Arc;

use crate::models::{Document, QueryResult};
use crate::scorer::{Scorer, ScoringError};

/// Builder for constructing `ResponseSelector` instances.
#[derive(Default)]
pub struct ResponseSelectorBuilder {
    scorer: Option<Arc<dyn Scorer>>,
}

impl ResponseSelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scorer used to evaluate candidates.
    pub fn scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Builds the selector.
    ///
    /// # Errors
    ///
    /// Returns an error if `scorer()` was not called.
    pub fn build(self) -> anyhow::Result<ResponseSelector> {
        let scorer = self
            .scorer
            .ok_or_else(|| anyhow::anyhow!("scorer must be set via scorer()"))?;
        Ok(ResponseSelector { scorer })
    }
}

/// Picks the best answer for a question from a document.
pub struct ResponseSelector {
    scorer: Arc<dyn Scorer>,
}

impl ResponseSelector {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self { scorer }
    }

    /// Returns the scorer's name.
    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Scores every candidate and returns the best result.
    ///
    /// Candidates are visited in document order, then answers order, and each
    /// is scored exactly once. A candidate replaces the current best only if
    /// its score is strictly greater, so the earliest candidate wins ties.
    /// The returned answer is the scorer's span, not the candidate text.
    ///
    /// Returns `Ok(None)` when the document has no candidates; the scorer is
    /// not called in that case.
    ///
    /// # Errors
    ///
    /// The first scorer error is returned as-is and stops the scan.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use qadoc::parser::parse_document;
    /// use qadoc::scorer::LexicalScorer;
    /// use qadoc::selector::ResponseSelector;
    ///
    /// let doc = parse_document(
    ///     "Main Question: Hobbies?\nAnswer: I climb. I also paint watercolours",
    /// );
    /// let selector = ResponseSelector::new(Arc::new(LexicalScorer::new()));
    ///
    /// let result = selector.select("Do you paint?", &doc).unwrap().unwrap();
    /// assert_eq!(result.answer(), "I also paint watercolours");
    /// ```
    pub fn select(
        &self,
        question: &str,
        document: &Document,
    ) -> Result<Option<QueryResult>, ScoringError> {
        let mut best_score = f64::NEG_INFINITY;
        let mut best: Option<QueryResult> = None;
        let mut scored = 0usize;

        for (record, candidate) in document.candidates() {
            let span = self.scorer.score(question, candidate)?;
            scored += 1;
            tracing::debug!(
                record = record.question(),
                candidate,
                answer = %span.answer,
                score = span.score,
                "scored candidate"
            );

            if span.score > best_score {
                best_score = span.score;
                best = Some(QueryResult::new(span, record.question(), candidate));
            }
        }

        match &best {
            Some(result) => tracing::info!(
                scorer = self.scorer.name(),
                candidates = scored,
                score = result.score(),
                answer = result.answer(),
                "selected response"
            ),
            None => tracing::info!(
                scorer = self.scorer.name(),
                candidates = scored,
                "no answer found"
            ),
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, ScoredSpan};
    use crate::ollama::OllamaError;
    use crate::parser::parse_document;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Returns fixed scores per context and records every call.
    struct StubScorer {
        scores: HashMap<String, f64>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubScorer {
        fn new(scores: &[(&str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                scores: scores.iter().map(|(c, s)| (c.to_string(), *s)).collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Scorer for StubScorer {
        fn score(&self, question: &str, context: &str) -> Result<ScoredSpan, ScoringError> {
            self.calls
                .lock()
                .unwrap()
                .push((question.to_string(), context.to_string()));
            let score = self.scores.get(context).copied().unwrap_or(0.0);
            Ok(ScoredSpan::new(format!("span of {context}"), score))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Fails on a given context.
    struct FailOn(&'static str, Mutex<usize>);

    impl Scorer for FailOn {
        fn score(&self, _question: &str, context: &str) -> Result<ScoredSpan, ScoringError> {
            *self.1.lock().unwrap() += 1;
            if context == self.0 {
                Err(ScoringError::Ollama(OllamaError::Http { status: 500 }))
            } else {
                Ok(ScoredSpan::new(context, 0.1))
            }
        }

        fn name(&self) -> &str {
            "fail-on"
        }
    }

    fn sample_document() -> Document {
        parse_document(
            "Main Question: Q1\nFollow-up Question: F1\nAnswer: A1\nMain Question: Q2\nAnswer: A2",
        )
    }

    #[test]
    fn builder_requires_scorer() {
        assert!(ResponseSelectorBuilder::new().build().is_err());

        let selector = ResponseSelectorBuilder::new()
            .scorer(StubScorer::new(&[]))
            .build()
            .unwrap();
        assert_eq!(selector.scorer_name(), "stub");
    }

    #[test]
    fn empty_document_returns_none_without_scoring() {
        let stub = StubScorer::new(&[]);
        let selector = ResponseSelector::new(stub.clone());

        let result = selector.select("anything", &Document::default()).unwrap();
        assert!(result.is_none());
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn records_without_candidates_return_none_without_scoring() {
        let stub = StubScorer::new(&[]);
        let selector = ResponseSelector::new(stub.clone());
        let doc = Document::new(vec![Record::new("Q", Vec::new())]);

        assert!(selector.select("q", &doc).unwrap().is_none());
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn scores_every_candidate_once_in_document_order() {
        let stub = StubScorer::new(&[]);
        let selector = ResponseSelector::new(stub.clone());

        selector.select("who?", &sample_document()).unwrap();

        let contexts: Vec<String> = stub.calls().into_iter().map(|(_, c)| c).collect();
        assert_eq!(contexts, ["F1", "A1", "A2"]);
        assert!(stub.calls().iter().all(|(q, _)| q == "who?"));
    }

    #[test]
    fn highest_score_wins_and_returns_scorer_span() {
        let stub = StubScorer::new(&[("F1", 0.2), ("A1", 0.9), ("A2", 0.5)]);
        let selector = ResponseSelector::new(stub);

        let result = selector.select("q", &sample_document()).unwrap().unwrap();
        assert_eq!(result.answer(), "span of A1");
        assert_eq!(result.score(), 0.9);
        assert_eq!(result.question(), "Q1");
        assert_eq!(result.context(), "A1");
    }

    #[test]
    fn ties_go_to_the_earliest_candidate() {
        let stub = StubScorer::new(&[("F1", 0.1), ("A1", 0.7), ("A2", 0.7)]);
        let selector = ResponseSelector::new(stub);

        let result = selector.select("q", &sample_document()).unwrap().unwrap();
        assert_eq!(result.context(), "A1");
    }

    #[test]
    fn ties_across_records_go_to_the_earlier_record() {
        let stub = StubScorer::new(&[("F1", 0.4), ("A1", 0.1), ("A2", 0.4)]);
        let selector = ResponseSelector::new(stub);

        let result = selector.select("q", &sample_document()).unwrap().unwrap();
        assert_eq!(result.question(), "Q1");
        assert_eq!(result.context(), "F1");
    }

    #[test]
    fn zero_scores_still_select_the_first_candidate() {
        let selector = ResponseSelector::new(StubScorer::new(&[]));

        let result = selector.select("q", &sample_document()).unwrap().unwrap();
        assert_eq!(result.context(), "F1");
        assert_eq!(result.score(), 0.0);
    }

    #[test]
    fn nan_scores_never_win() {
        let stub = StubScorer::new(&[("F1", f64::NAN), ("A1", 0.3), ("A2", f64::NAN)]);
        let selector = ResponseSelector::new(stub);

        let result = selector.select("q", &sample_document()).unwrap().unwrap();
        assert_eq!(result.context(), "A1");
    }

    #[test]
    fn scorer_error_propagates_and_stops_the_scan() {
        let scorer = Arc::new(FailOn("A1", Mutex::new(0)));
        let selector = ResponseSelector::new(scorer.clone());

        let result = selector.select("q", &sample_document());
        assert!(matches!(result, Err(ScoringError::Ollama(_))));
        assert_eq!(*scorer.1.lock().unwrap(), 2);
    }

    #[test]
    fn selection_is_repeatable() {
        let stub = StubScorer::new(&[("F1", 0.3), ("A1", 0.6), ("A2", 0.6)]);
        let selector = ResponseSelector::new(stub);
        let doc = sample_document();

        let first = selector.select("q", &doc).unwrap();
        let second = selector.select("q", &doc).unwrap();
        assert_eq!(first, second);
    }
}
