//! Key presses mapped to app actions. Anything not bound here goes to the
//! input editor.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    InsertNewline,
    NewChat,
    PreviousChat,
    NextChat,
    PageUp,
    PageDown,
    ToggleTheme,
    Dismiss,
    Quit,
    /// Editing or cursor motion handled by the text area.
    Edit(Input),
}

impl KeyAction {
    /// Actions that change the input box; these are ignored while a reply is
    /// pending.
    pub fn edits_input(&self) -> bool {
        matches!(self, KeyAction::InsertNewline | KeyAction::Edit(_))
    }
}

pub fn map_key(key: &KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('n') if ctrl => KeyAction::NewChat,
        KeyCode::Char('t') if ctrl => KeyAction::ToggleTheme,
        // Many terminals send Ctrl+J for Ctrl+Enter.
        KeyCode::Char('j') if ctrl => KeyAction::InsertNewline,
        KeyCode::Enter if alt || shift => KeyAction::InsertNewline,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Up if ctrl => KeyAction::PreviousChat,
        KeyCode::Down if ctrl => KeyAction::NextChat,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Esc => KeyAction::Dismiss,
        _ => KeyAction::Edit(Input::from(*key)),
    }
}
