//! UI rendering functions for the TUI.
//!
//! Layout: document preview and parsed-records table side by side, then the
//! query input, the response line and a shortcut bar.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use super::app::{App, Focus, Response};
use crate::utils::{format_response, truncate_text};

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Preview + records
            Constraint::Length(3), // Query input
            Constraint::Length(3), // Response
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[0]);

    render_preview(frame, app, content_chunks[0]);
    render_records(frame, app, content_chunks[1]);
    render_query_input(frame, app, main_chunks[1]);
    render_response(frame, app, main_chunks[2]);
    render_shortcut_bar(frame, app, main_chunks[3]);
}

fn panel(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
}

/// Read-only view of the uploaded text.
fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("Document: {}", app.path().display());
    let paragraph = Paragraph::new(app.document_text())
        .block(panel(title, app.focus() == Focus::Preview))
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Table of parsed records: main question and its candidates.
fn render_records(frame: &mut Frame, app: &App, area: Rect) {
    let document = app.document();
    let title = format!(
        "Parsed Q&A ({} records, {} candidates)",
        document.len(),
        document.candidate_count()
    );
    let block = panel(title, app.focus() == Focus::Records);

    if document.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No \"Main Question:\" blocks found",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![Cell::from("Question"), Cell::from("Answers")])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = document
        .records()
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(truncate_text(record.question(), 60)),
                Cell::from(truncate_text(&record.answers().join(" | "), 120)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Percentage(35), Constraint::Percentage(65)],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = TableState::default();
    state.select(app.selected_index());

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_query_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::QueryInput;

    let mut content = app.query_input().to_string();
    if is_focused {
        content.push('█');
    }

    let paragraph = Paragraph::new(content).block(panel("Ask a question".to_string(), is_focused));
    frame.render_widget(paragraph, area);
}

/// Text and style of the response line for the current state.
fn response_line(app: &App) -> Line<'static> {
    match app.response() {
        Response::Idle => Line::from(Span::styled(
            "Type a question and press Enter",
            Style::default().fg(Color::DarkGray),
        )),
        Response::Pending => Line::from(Span::styled(
            format!("Scoring {} candidates...", app.document().candidate_count()),
            Style::default().fg(Color::Yellow),
        )),
        Response::Answered(Some(result)) if result.has_answer() => Line::from(vec![
            Span::styled(
                result.answer().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (score {:.3}, from \"{}\")", result.score(), result.question()),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
        Response::Answered(outcome) => Line::from(format_response(outcome.as_ref())),
        Response::Failed(message) => Line::from(Span::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red),
        )),
    }
}

fn render_response(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.asked() {
        Some(question) => format!("Response to \"{}\"", truncate_text(question, 60)),
        None => "Response".to_string(),
    };

    let paragraph = Paragraph::new(response_line(app)).block(panel(title, false));
    frame.render_widget(paragraph, area);
}

/// Context-aware keyboard shortcuts for the current focus.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut shortcuts: Vec<(&str, &str)> = vec![
        ("Ctrl+C", "quit"),
        ("Tab", "next panel"),
        ("Esc", "query"),
        ("Ctrl+R", "reload"),
    ];
    match app.focus() {
        Focus::QueryInput => shortcuts.push(("Enter", "ask")),
        Focus::Records => shortcuts.push(("j/k", "navigate")),
        Focus::Preview => shortcuts.push(("j/k", "scroll")),
    }
    shortcuts.push(("", app.scorer_name()));

    let mut spans = Vec::new();
    for (i, (key, action)) in shortcuts.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", sep_style));
        }
        if key.is_empty() {
            spans.push(Span::styled(format!("scorer: {action}"), sep_style));
        } else {
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(format!(": {action}")));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
