//! Line-marker document parser.
//!
//! Converts uploaded text into an ordered [`Document`]. Three prefix markers
//! are recognised, with exact casing and no leading whitespace:
//!
//! - `Main Question:` starts a new record
//! - `Follow-up Question:` adds a candidate to the open record
//! - `Answer:` adds a candidate to the open record
//!
//! Every other line is ignored. Parsing never fails; malformed input just
//! yields fewer records.

use crate::models::{Document, Record};

pub const MAIN_QUESTION_MARKER: &str = "Main Question:";
pub const FOLLOW_UP_MARKER: &str = "Follow-up Question:";
pub const ANSWER_MARKER: &str = "Answer:";

/// Characters that end a line, besides the `\r\n` pair.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Splits `text` into lines on `\r\n` and on every [`LINE_BREAKS`] character.
///
/// A trailing break yields one empty final line, which classifies as
/// [`Line::Other`].
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n").flat_map(|chunk| chunk.split(LINE_BREAKS))
}

/// Classification of a single input line.
///
/// Payloads are the text after the marker, already trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    MainQuestion(&'a str),
    FollowUp(&'a str),
    Answer(&'a str),
    Other,
}

/// Classifies one line by its prefix marker.
///
/// # Examples
///
/// ```
/// use qadoc::parser::{classify_line, Line};
///
/// assert_eq!(classify_line("Answer:  yes "), Line::Answer("yes"));
/// assert_eq!(classify_line("answer: yes"), Line::Other);
/// ```
pub fn classify_line(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(MAIN_QUESTION_MARKER) {
        Line::MainQuestion(rest.trim())
    } else if let Some(rest) = line.strip_prefix(FOLLOW_UP_MARKER) {
        Line::FollowUp(rest.trim())
    } else if let Some(rest) = line.strip_prefix(ANSWER_MARKER) {
        Line::Answer(rest.trim())
    } else {
        Line::Other
    }
}

/// Record under construction.
struct Accumulator {
    question: String,
    answers: Vec<String>,
}

impl Accumulator {
    fn open(question: &str) -> Self {
        Self {
            question: question.to_string(),
            answers: Vec::new(),
        }
    }

    /// Emits the record unless its question is empty.
    fn close_into(self, records: &mut Vec<Record>) {
        if !self.question.is_empty() {
            records.push(Record::new(self.question, self.answers));
        }
    }
}

/// Parses raw document text into records.
///
/// Lines before the first `Main Question:` marker are dropped. A main
/// question with an empty remainder still collects the lines after it, but
/// that block is never emitted.
///
/// # Examples
///
/// ```
/// use qadoc::parser::parse_document;
///
/// let doc = parse_document("Main Question: Q1\nAnswer: A1\nMain Question: Q2");
/// assert_eq!(doc.len(), 2);
/// assert_eq!(doc.records()[0].answers(), ["A1"]);
/// assert!(doc.records()[1].answers().is_empty());
/// ```
pub fn parse_document(text: &str) -> Document {
    let mut records = Vec::new();
    let mut current: Option<Accumulator> = None;

    for line in split_lines(text) {
        match classify_line(line) {
            Line::MainQuestion(question) => {
                if let Some(open) = current.take() {
                    open.close_into(&mut records);
                }
                current = Some(Accumulator::open(question));
            }
            Line::FollowUp(text) | Line::Answer(text) => {
                if let Some(open) = current.as_mut() {
                    open.answers.push(text.to_string());
                }
            }
            Line::Other => {}
        }
    }

    if let Some(open) = current {
        open.close_into(&mut records);
    }

    tracing::debug!(records = records.len(), "parsed document");
    Document::new(records)
}
