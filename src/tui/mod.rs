//! Terminal User Interface for qadoc.
//!
//! Shows the uploaded document, a table of parsed records, a question input
//! and the response line, using ratatui for rendering and crossterm for
//! terminal management.

use std::io;
use std::panic;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus, Response};

use crate::config::Config;
use crate::scorer::build_scorer;
use crate::selector::ResponseSelector;
use crate::utils::load_document;
use event::KeyAction;

/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Leaves the alternate screen and disables raw mode.
///
/// Must run before exiting, on error paths too.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Terminal restoration for the panic hook, where no `Terminal` is at hand.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Restores the terminal before the original panic hook runs.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Scores the pending question and stores the outcome in `app`.
///
/// Scorer failures are shown in the response line rather than ending the
/// session.
fn answer_pending(app: &mut App, selector: &ResponseSelector) {
    let Some(question) = app.asked().map(str::to_string) else {
        return;
    };

    match selector.select(&question, app.document()) {
        Ok(outcome) => app.finish_query(outcome),
        Err(e) => {
            tracing::error!(error = %e, "query failed");
            app.fail(e.to_string());
        }
    }
}

/// Rereads the document from disk, replacing the current one.
fn reload(app: &mut App) {
    let path = app.path().to_path_buf();
    match load_document(&path) {
        Ok((text, document)) => app.replace_document(text, document),
        Err(e) => {
            tracing::error!(error = %e, "reload failed");
            app.fail(format!("{e:#}"));
        }
    }
}

/// Runs the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if event polling or rendering fails.
fn run_event_loop_internal(
    app: &mut App,
    selector: &ResponseSelector,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if !crossterm_event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = crossterm_event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match event::handle_key_event(app, key) {
            KeyAction::Continue => {}
            KeyAction::Quit => break,
            KeyAction::Ask => {
                // Show the pending state before blocking on the scorer.
                terminal.draw(|frame| ui::draw(frame, app))?;
                answer_pending(app, selector);
            }
            KeyAction::Reload => reload(app),
        }
    }

    Ok(())
}

/// Runs the event loop with terminal setup and teardown around it.
///
/// # Errors
///
/// Returns an error if terminal initialization or the event loop fails.
/// The terminal is restored either way.
pub fn run_event_loop(app: &mut App, selector: &ResponseSelector) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, selector, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

/// Entry point for the TUI application.
///
/// Loads and parses the document, builds the configured scorer and starts
/// the event loop.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, the scorer cannot be
/// built, or the terminal fails.
pub fn run(path: &Path, config: &Config) -> Result<()> {
    let (text, document) = load_document(path)?;
    let scorer = build_scorer(config).context("Failed to set up scorer")?;
    let selector = ResponseSelector::new(scorer);

    init_panic_hook();

    let mut app = App::new(path, text, document, selector.scorer_name());
    run_event_loop(&mut app, &selector).context("TUI event loop failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoredSpan;
    use crate::parser::parse_document;
    use crate::scorer::{LexicalScorer, Scorer, ScoringError};
    use crate::utils::NO_ANSWER_MESSAGE;
    use std::io::Write;
    use std::sync::Arc;

    struct Broken;

    impl Scorer for Broken {
        fn score(&self, _question: &str, _context: &str) -> Result<ScoredSpan, ScoringError> {
            Err(ScoringError::MalformedResponse {
                message: "garbage".to_string(),
            })
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn ask(app: &mut App, question: &str) {
        for c in question.chars() {
            app.push_query_char(c);
        }
        app.begin_query();
    }

    #[test]
    fn answer_pending_stores_selected_response() {
        let text = "Main Question: Pets?\nAnswer: I like birds. I have a cat";
        let mut app = App::new("qa.txt", text, parse_document(text), "lexical");
        let selector = ResponseSelector::new(Arc::new(LexicalScorer::new()));

        ask(&mut app, "Do you have a cat?");
        answer_pending(&mut app, &selector);

        match app.response() {
            Response::Answered(Some(result)) => assert_eq!(result.answer(), "I have a cat"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn answer_pending_on_empty_document_reports_no_answer() {
        let mut app = App::new("qa.txt", "", parse_document(""), "lexical");
        let selector = ResponseSelector::new(Arc::new(Broken));

        ask(&mut app, "anything");
        answer_pending(&mut app, &selector);

        assert_eq!(app.response(), &Response::Answered(None));
        assert_eq!(crate::utils::format_response(None), NO_ANSWER_MESSAGE);
    }

    #[test]
    fn scorer_failure_is_shown_not_fatal() {
        let text = "Main Question: Q\nAnswer: A";
        let mut app = App::new("qa.txt", text, parse_document(text), "broken");
        let selector = ResponseSelector::new(Arc::new(Broken));

        ask(&mut app, "q");
        answer_pending(&mut app, &selector);

        assert!(matches!(app.response(), Response::Failed(m) if m.contains("garbage")));
    }

    #[test]
    fn answer_pending_without_question_is_a_no_op() {
        let mut app = App::new("qa.txt", "", parse_document(""), "broken");
        let selector = ResponseSelector::new(Arc::new(Broken));

        answer_pending(&mut app, &selector);
        assert_eq!(app.response(), &Response::Idle);
    }

    #[test]
    fn reload_picks_up_changes_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Main Question: Old").unwrap();
        let (text, document) = load_document(file.path()).unwrap();
        let mut app = App::new(file.path(), text, document, "lexical");

        std::fs::write(file.path(), "Main Question: New 1\nMain Question: New 2").unwrap();
        reload(&mut app);

        assert_eq!(app.document().len(), 2);
        assert_eq!(app.document().records()[0].question(), "New 1");
    }

    #[test]
    fn reload_failure_keeps_the_old_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        let text = "Main Question: Kept";
        let mut app = App::new(&path, text, parse_document(text), "lexical");

        reload(&mut app);

        assert_eq!(app.document().len(), 1);
        assert!(matches!(app.response(), Response::Failed(m) if m.contains("gone.txt")));
    }
}
