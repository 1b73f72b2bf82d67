//! Keyboard mapping for the board view
//!
//! Keys are translated into [`BoardAction`]s by a pure function so the
//! bindings can be tested without a terminal.

use iocraft::prelude::{KeyCode, KeyModifiers};

use crate::board::BoardAction;

/// What a key does while the filter box has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    /// Esc
    ClearAndExit,
    /// Enter or Tab; the filter stays applied
    Exit,
    /// Ctrl+Q
    Quit,
    /// Typed into the filter
    Continue,
}

pub fn handle_search_input(key_code: KeyCode, modifiers: KeyModifiers) -> SearchAction {
    match (key_code, modifiers.contains(KeyModifiers::CONTROL)) {
        (KeyCode::Esc, _) => SearchAction::ClearAndExit,
        (KeyCode::Enter | KeyCode::Tab, _) => SearchAction::Exit,
        (KeyCode::Char('q'), true) => SearchAction::Quit,
        _ => SearchAction::Continue,
    }
}

/// Map a key press to a board action.
///
/// While the search box has focus only the search keys are claimed; every
/// other key returns `None` and is left to the text input.
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    search_focused: bool,
) -> Option<BoardAction> {
    if search_focused {
        return match handle_search_input(code, modifiers) {
            SearchAction::ClearAndExit => Some(BoardAction::ClearSearchAndExit),
            SearchAction::Exit => Some(BoardAction::ExitSearch),
            SearchAction::Quit => Some(BoardAction::Quit),
            SearchAction::Continue => None,
        };
    }

    let shift = modifiers.contains(KeyModifiers::SHIFT);
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(BoardAction::Quit),
        KeyCode::Left if shift => Some(BoardAction::MoveCardLeft),
        KeyCode::Right if shift => Some(BoardAction::MoveCardRight),
        KeyCode::Char('h') | KeyCode::Left => Some(BoardAction::MoveLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(BoardAction::MoveRight),
        KeyCode::Char('j') | KeyCode::Down => Some(BoardAction::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(BoardAction::MoveUp),
        KeyCode::Char('g') | KeyCode::Home => Some(BoardAction::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(BoardAction::GoToBottom),
        KeyCode::Char('s') | KeyCode::Char('L') => Some(BoardAction::MoveCardRight),
        KeyCode::Char('S') | KeyCode::Char('H') => Some(BoardAction::MoveCardLeft),
        KeyCode::Char('/') => Some(BoardAction::FocusSearch),
        KeyCode::Char('r') => Some(BoardAction::Reload),
        KeyCode::Char('q') | KeyCode::Esc => Some(BoardAction::Quit),
        _ => None,
    }
}
