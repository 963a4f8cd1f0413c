//! Extractive scorer backed by an Ollama-compatible LLM.

use std::sync::Arc;

use crate::models::ScoredSpan;
use crate::ollama::OllamaClientTrait;

use super::{Scorer, ScoringError};

/// Prompt for extractive answering of one passage.
///
/// Built with `format!` so neither input is scanned for placeholders.
fn build_prompt(question: &str, context: &str) -> String {
    format!(
        r#"You are an extractive question answering model. Find the answer to the QUESTION inside the CONTEXT.

RULES:
1. The answer MUST be copied verbatim from the CONTEXT - do not paraphrase
2. Prefer the shortest span that fully answers the question
3. The score is your confidence (0.0-1.0) that the span answers the question
4. If the CONTEXT does not answer the question, return the closest span with a low score

QUESTION:
{question}

CONTEXT:
{context}

Respond with ONLY a JSON object:
{{"answer": "span copied from the context", "score": 0.0}}

JSON OUTPUT:"#
    )
}

/// Builder for constructing `OllamaScorer` instances.
#[derive(Default)]
pub struct OllamaScorerBuilder {
    client: Option<Arc<dyn OllamaClientTrait>>,
    model: Option<String>,
}

impl OllamaScorerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: Arc<dyn OllamaClientTrait>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Builds the scorer.
    ///
    /// # Errors
    ///
    /// Returns an error if the client or a non-empty model was not set.
    pub fn build(self) -> anyhow::Result<OllamaScorer> {
        let client = self
            .client
            .ok_or_else(|| anyhow::anyhow!("client must be set via client()"))?;
        let model = self
            .model
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("model must be set via model()"))?;

        Ok(OllamaScorer { client, model })
    }
}

/// Scores (question, context) pairs by asking an LLM for an answer span.
pub struct OllamaScorer {
    client: Arc<dyn OllamaClientTrait>,
    model: String,
}

impl OllamaScorer {
    pub fn new(client: Arc<dyn OllamaClientTrait>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Scorer for OllamaScorer {
    fn score(&self, question: &str, context: &str) -> Result<ScoredSpan, ScoringError> {
        let prompt = build_prompt(question, context);

        let response = self.client.generate(&self.model, &prompt)?;

        let json_str = extract_json(&response).ok_or_else(|| ScoringError::MalformedResponse {
            message: "no JSON object in model response".to_string(),
        })?;

        let span = parse_scored_span(json_str)?;
        Ok(reject_hallucinated_span(span, context))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Slice from the first `{` to the last `}`, tolerating prose or code fences
/// around the object.
fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (start <= end).then(|| &trimmed[start..=end])
}

fn parse_scored_span(json_str: &str) -> Result<ScoredSpan, ScoringError> {
    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| ScoringError::MalformedResponse {
            message: format!("Failed to parse JSON: {e}"),
        })?;

    let obj = value
        .as_object()
        .ok_or_else(|| ScoringError::MalformedResponse {
            message: "Expected JSON object".to_string(),
        })?;

    let answer = obj
        .get("answer")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    // Models sometimes quote the number.
    let score = match obj.get("score") {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ScoringError::MalformedResponse {
        message: "missing or non-numeric 'score'".to_string(),
    })?;

    Ok(ScoredSpan::new(answer, score.clamp(0.0, 1.0)))
}

/// Drops blank spans and spans that do not occur in the context.
///
/// A dropped span scores 0 so it cannot outrank a real answer.
fn reject_hallucinated_span(span: ScoredSpan, context: &str) -> ScoredSpan {
    if span.answer.is_empty() {
        if span.score > 0.0 {
            tracing::debug!(score = span.score, "discarding blank span");
        }
        return ScoredSpan::empty();
    }
    if context.to_lowercase().contains(&span.answer.to_lowercase()) {
        span
    } else {
        tracing::debug!(answer = %span.answer, "discarding span not found in context");
        ScoredSpan::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ollama::OllamaError;
    use std::sync::Mutex;

    struct MockOllamaClient {
        response: String,
        prompts: Mutex<Vec<String>>,
    }

    impl MockOllamaClient {
        fn replying(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl OllamaClientTrait for MockOllamaClient {
        fn generate(&self, _model: &str, prompt: &str) -> Result<String, OllamaError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    struct FailingClient;

    impl OllamaClientTrait for FailingClient {
        fn generate(&self, _model: &str, _prompt: &str) -> Result<String, OllamaError> {
            Err(OllamaError::Http { status: 500 })
        }
    }

    #[test]
    fn builder_requires_client_and_model() {
        assert!(OllamaScorerBuilder::new().model("m").build().is_err());

        let mock = MockOllamaClient::replying("{}");
        assert!(OllamaScorerBuilder::new().client(mock.clone()).build().is_err());
        assert!(OllamaScorerBuilder::new().client(mock.clone()).model("  ").build().is_err());

        let scorer = OllamaScorerBuilder::new().client(mock).model("m").build().unwrap();
        assert_eq!(scorer.model(), "m");
    }

    #[test]
    fn returns_span_and_score_from_model() {
        let mock = MockOllamaClient::replying(r#"{"answer": "in Lisbon", "score": 0.91}"#);
        let scorer = OllamaScorer::new(mock.clone(), "m");

        let span = scorer
            .score("Where do you live?", "I live in Lisbon with my cat.")
            .unwrap();

        assert_eq!(span, ScoredSpan::new("in Lisbon", 0.91));
        let prompts = mock.prompts.lock().unwrap();
        assert!(prompts[0].contains("Where do you live?"));
        assert!(prompts[0].contains("I live in Lisbon with my cat."));
    }

    #[test]
    fn tolerates_code_fences_and_string_scores() {
        let reply = "Sure!\n```json\n{\"answer\": \"Lisbon\", \"score\": \"0.5\"}\n```";
        let scorer = OllamaScorer::new(MockOllamaClient::replying(reply), "m");

        let span = scorer.score("Where?", "Lisbon").unwrap();
        assert_eq!(span, ScoredSpan::new("Lisbon", 0.5));
    }

    #[test]
    fn clamps_out_of_range_scores() {
        let scorer = OllamaScorer::new(
            MockOllamaClient::replying(r#"{"answer": "yes", "score": 7}"#),
            "m",
        );
        assert_eq!(scorer.score("q", "yes").unwrap().score, 1.0);
    }

    #[test]
    fn hallucinated_span_is_discarded() {
        let scorer = OllamaScorer::new(
            MockOllamaClient::replying(r#"{"answer": "in Paris", "score": 0.99}"#),
            "m",
        );

        let span = scorer.score("Where?", "I live in Lisbon").unwrap();
        assert_eq!(span, ScoredSpan::empty());
    }

    #[test]
    fn blank_span_loses_its_score() {
        let scorer = OllamaScorer::new(
            MockOllamaClient::replying(r#"{"answer": "  ", "score": 0.95}"#),
            "m",
        );

        let span = scorer.score("Where?", "Why?").unwrap();
        assert_eq!(span, ScoredSpan::empty());
    }

    #[test]
    fn placeholder_text_in_question_is_left_alone() {
        let mock = MockOllamaClient::replying(r#"{"answer": "", "score": 0}"#);
        let scorer = OllamaScorer::new(mock.clone(), "m");

        scorer.score("What is {context}?", "SECRET PASSAGE").unwrap();

        let prompts = mock.prompts.lock().unwrap();
        assert!(prompts[0].contains("What is {context}?"));
        assert_eq!(prompts[0].matches("SECRET PASSAGE").count(), 1);
        assert!(prompts[0].contains(r#"{"answer": "span copied from the context", "score": 0.0}"#));
    }

    #[test]
    fn span_match_is_case_insensitive() {
        let scorer = OllamaScorer::new(
            MockOllamaClient::replying(r#"{"answer": "LISBON", "score": 0.7}"#),
            "m",
        );
        assert_eq!(scorer.score("Where?", "lisbon").unwrap().answer, "LISBON");
    }

    #[test]
    fn reply_without_json_is_malformed() {
        let scorer = OllamaScorer::new(MockOllamaClient::replying("I don't know"), "m");
        assert!(matches!(
            scorer.score("q", "c"),
            Err(ScoringError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn missing_score_is_malformed() {
        let scorer = OllamaScorer::new(MockOllamaClient::replying(r#"{"answer": "c"}"#), "m");
        assert!(matches!(
            scorer.score("q", "c"),
            Err(ScoringError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn client_errors_propagate() {
        let scorer = OllamaScorer::new(Arc::new(FailingClient), "m");
        assert!(matches!(
            scorer.score("q", "c"),
            Err(ScoringError::Ollama(OllamaError::Http { status: 500 }))
        ));
    }

    #[test]
    fn extract_json_handles_surrounding_text() {
        assert_eq!(extract_json("x {\"a\": 1} y"), Some("{\"a\": 1}"));
        assert_eq!(extract_json("} nothing {"), None);
        assert_eq!(extract_json("plain"), None);
    }
}
