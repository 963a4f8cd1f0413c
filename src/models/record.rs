use serde::{Deserialize, Serialize};

/// One "Main Question:" block and the follow-up strings collected under it.
///
/// The `answers` list holds both follow-up questions and answers, in the
/// order they appeared in the source text. Every entry is a candidate
/// context passage for the response selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    question: String,
    answers: Vec<String>,
}

impl Record {
    /// Creates a new record.
    ///
    /// # Examples
    ///
    /// ```
    /// use qadoc::Record;
    ///
    /// let record = Record::new("Q1", vec!["F1".to_string(), "A1".to_string()]);
    /// assert_eq!(record.question(), "Q1");
    /// assert_eq!(record.answers(), ["F1", "A1"]);
    /// ```
    pub fn new(question: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            question: question.into(),
            answers,
        }
    }

    /// Returns the main question text.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Returns the follow-up questions and answers in source order.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_question_and_answers() {
        let record = Record::new("What now?", vec!["Later".to_string()]);
        let json = serde_json::to_value(&record).expect("serialize record");

        assert_eq!(json["question"], "What now?");
        assert_eq!(json["answers"][0], "Later");
    }
}
