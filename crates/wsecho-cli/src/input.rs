//! Key bindings.
//!
//! `Ctrl+T` toggles the connection, `Enter` sends, `Esc`/`Ctrl+C` quit, and
//! printable characters edit the pending input.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle,
    Submit,
    Insert(char),
    Backspace,
    Quit,
}

/// Translate a key event into an [`Action`]. Unbound keys map to `None`.
pub fn map_key(event: &KeyEvent) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => Some(Action::Quit),
        KeyCode::Char('t') | KeyCode::Char('T') if ctrl => Some(Action::Toggle),
        KeyCode::Char(_) if ctrl || event.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(c) => Some(Action::Insert(c)),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}
