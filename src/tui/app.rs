use std::path::{Path, PathBuf};

use crate::models::{Document, QueryResult, Record};

/// Application state for the TUI.
///
/// Holds the loaded document, the query being typed, the latest response and
/// which panel has focus.
#[derive(Debug, Clone)]
pub struct App {
    /// File the document was loaded from (used for reloads)
    path: PathBuf,
    /// Raw uploaded text, shown read-only
    document_text: String,
    /// Records parsed from `document_text`
    document: Document,
    /// Name of the scorer answering queries
    scorer_name: String,
    /// Query input buffer
    query_input: String,
    /// Question the current response belongs to
    asked: Option<String>,
    response: Response,
    focus: Focus,
    /// Selected row in the records table
    selected_index: Option<usize>,
    /// Scroll offset for the document preview
    preview_scroll: u16,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing edits the question; Enter asks it
    QueryInput,
    /// j/k move through parsed records
    Records,
    /// j/k scroll the uploaded text
    Preview,
}

/// What the response line currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Nothing asked yet
    Idle,
    /// A query is being scored
    Pending,
    /// The selector returned a result or none
    Answered(Option<QueryResult>),
    /// Scoring or reloading failed
    Failed(String),
}

impl App {
    /// Creates a new App for a loaded document.
    ///
    /// # Examples
    ///
    /// ```
    /// use qadoc::parser::parse_document;
    /// use qadoc::tui::{App, Focus};
    ///
    /// let text = "Main Question: Q1\nAnswer: A1";
    /// let app = App::new("qa.txt", text, parse_document(text), "lexical");
    /// assert_eq!(app.document().len(), 1);
    /// assert_eq!(app.focus(), Focus::QueryInput);
    /// ```
    pub fn new(
        path: impl Into<PathBuf>,
        document_text: impl Into<String>,
        document: Document,
        scorer_name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            document_text: document_text.into(),
            document,
            scorer_name: scorer_name.into(),
            query_input: String::new(),
            asked: None,
            response: Response::Idle,
            focus: Focus::QueryInput,
            selected_index: None,
            preview_scroll: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document_text(&self) -> &str {
        &self.document_text
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn scorer_name(&self) -> &str {
        &self.scorer_name
    }

    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    /// Returns the question the current response answers, if any.
    pub fn asked(&self) -> Option<&str> {
        self.asked.as_deref()
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected_index
            .and_then(|i| self.document.records().get(i))
    }

    pub fn preview_scroll(&self) -> u16 {
        self.preview_scroll
    }

    /// Replaces the document with a freshly loaded one.
    ///
    /// Everything derived from the previous document is discarded: the
    /// selection, the preview scroll and the last response.
    pub fn replace_document(&mut self, document_text: impl Into<String>, document: Document) {
        self.document_text = document_text.into();
        self.document = document;
        self.selected_index = None;
        self.preview_scroll = 0;
        self.asked = None;
        self.response = Response::Idle;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query_input.push(c);
    }

    pub fn pop_query_char(&mut self) {
        self.query_input.pop();
    }

    /// Starts a query for the current input.
    ///
    /// Returns the trimmed question, or `None` if the input is blank. The
    /// input buffer is kept so the question can be edited and asked again.
    pub fn begin_query(&mut self) -> Option<String> {
        let question = self.query_input.trim();
        if question.is_empty() {
            return None;
        }
        let question = question.to_string();
        self.asked = Some(question.clone());
        self.response = Response::Pending;
        Some(question)
    }

    /// Stores the selector outcome for the pending query.
    pub fn finish_query(&mut self, outcome: Option<QueryResult>) {
        self.response = Response::Answered(outcome);
    }

    /// Shows an error in the response line.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.response = Response::Failed(message.into());
    }

    /// Cycles focus: `QueryInput` -> `Records` -> `Preview` -> `QueryInput`.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QueryInput => Focus::Records,
            Focus::Records => Focus::Preview,
            Focus::Preview => Focus::QueryInput,
        };
        self.auto_select_on_records_focus();
    }

    /// Cycles focus in reverse order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QueryInput => Focus::Preview,
            Focus::Records => Focus::QueryInput,
            Focus::Preview => Focus::Records,
        };
        self.auto_select_on_records_focus();
    }

    /// Returns focus to the query input (Esc).
    pub fn reset_focus(&mut self) {
        self.focus = Focus::QueryInput;
    }

    fn auto_select_on_records_focus(&mut self) {
        if self.focus == Focus::Records && self.selected_index.is_none() && !self.document.is_empty()
        {
            self.selected_index = Some(0);
        }
    }

    /// Moves the record selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        let len = self.document.len();
        if len == 0 {
            self.selected_index = None;
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    /// Moves the record selection up, wrapping at the start.
    pub fn select_previous(&mut self) {
        let len = self.document.len();
        if len == 0 {
            self.selected_index = None;
            return;
        }
        self.selected_index = Some(match self.selected_index {
            None | Some(0) => len - 1,
            Some(i) => i - 1,
        });
    }

    pub fn scroll_preview_down(&mut self, amount: u16) {
        self.preview_scroll = self.preview_scroll.saturating_add(amount);
    }

    pub fn scroll_preview_up(&mut self, amount: u16) {
        self.preview_scroll = self.preview_scroll.saturating_sub(amount);
    }
}
