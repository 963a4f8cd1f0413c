use serde::{Deserialize, Serialize};

use super::Record;

/// The ordered records parsed from one loaded file.
///
/// Insertion order is the order of appearance in the source text. Question
/// text is not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    records: Vec<Record>,
}

impl Document {
    /// Creates a document from records already in source order.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Returns the records in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the document has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the total number of candidate strings across all records.
    pub fn candidate_count(&self) -> usize {
        self.records.iter().map(|r| r.answers().len()).sum()
    }

    /// Iterates every `(record, candidate)` pair, in document order and then
    /// answers order.
    ///
    /// # Examples
    ///
    /// ```
    /// use qadoc::{Document, Record};
    ///
    /// let doc = Document::new(vec![
    ///     Record::new("Q1", vec!["a".to_string(), "b".to_string()]),
    ///     Record::new("Q2", vec!["c".to_string()]),
    /// ]);
    ///
    /// let order: Vec<&str> = doc.candidates().map(|(_, c)| c).collect();
    /// assert_eq!(order, ["a", "b", "c"]);
    /// ```
    pub fn candidates(&self) -> impl Iterator<Item = (&Record, &str)> + '_ {
        self.records.iter().flat_map(|record| {
            record
                .answers()
                .iter()
                .map(move |answer| (record, answer.as_str()))
        })
    }
}

impl From<Vec<Record>> for Document {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(vec![
            Record::new("Q1", vec!["F1".to_string(), "A1".to_string()]),
            Record::new("Q2", Vec::new()),
            Record::new("Q3", vec!["A3".to_string()]),
        ])
    }

    #[test]
    fn default_document_is_empty() {
        let doc = Document::default();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.candidate_count(), 0);
        assert_eq!(doc.candidates().count(), 0);
    }

    #[test]
    fn candidates_skip_records_without_answers() {
        let doc = sample();
        let pairs: Vec<(&str, &str)> = doc
            .candidates()
            .map(|(record, candidate)| (record.question(), candidate))
            .collect();

        assert_eq!(pairs, [("Q1", "F1"), ("Q1", "A1"), ("Q3", "A3")]);
        assert_eq!(doc.candidate_count(), 3);
    }

    #[test]
    fn serializes_as_a_plain_list_of_records() {
        let json = serde_json::to_value(sample()).expect("serialize document");
        assert!(json.is_array());
        assert_eq!(json.as_array().map(Vec::len), Some(3));
        assert_eq!(json[2]["question"], "Q3");
    }
}
