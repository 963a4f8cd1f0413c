//! Keyboard event handling for the TUI.
//!
//! Maps crossterm key events to state changes. Actions that need the outside
//! world (scoring a query, rereading the file) are returned to the event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// State was updated in place (or the key was ignored)
    Continue,
    Quit,
    /// Score the question returned by `App::begin_query`
    Ask,
    /// Reload the document from disk
    Reload,
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// - `Ctrl+C`: quit from anywhere; `q` quits outside the query input
/// - `Ctrl+R`: reload the document
/// - `Tab` / `Shift+Tab`: cycle focus
/// - `Esc`: return to the query input
/// - Query input: typing edits the question, `Enter` asks it
/// - Records: `j`/`k` or arrows move the selection
/// - Preview: `j`/`k` or arrows scroll
///
/// # Examples
///
/// ```
/// use qadoc::Document;
/// use qadoc::tui::{App, event::{handle_key_event, KeyAction}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new("qa.txt", "", Document::default(), "lexical");
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert_eq!(handle_key_event(&mut app, key), KeyAction::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyAction::Quit,
            KeyCode::Char('r') => KeyAction::Reload,
            _ => KeyAction::Continue,
        };
    }

    match key.code {
        KeyCode::Tab => {
            app.next_focus();
            return KeyAction::Continue;
        }
        KeyCode::BackTab => {
            app.prev_focus();
            return KeyAction::Continue;
        }
        KeyCode::Esc => {
            app.reset_focus();
            return KeyAction::Continue;
        }
        _ => {}
    }

    match app.focus() {
        Focus::QueryInput => handle_query_input(app, key),
        Focus::Records => handle_records(app, key),
        Focus::Preview => handle_preview(app, key),
    }
}

fn handle_query_input(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_query_char(c);
        }
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Enter => {
            if app.begin_query().is_some() {
                return KeyAction::Ask;
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

fn handle_records(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_preview(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_preview_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_preview_up(1),
        KeyCode::PageDown => app.scroll_preview_down(10),
        KeyCode::PageUp => app.scroll_preview_up(10),
        _ => {}
    }
    KeyAction::Continue
}
