use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lumen_core::site::Page;

use crate::app::{App, Mode};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPage,
    PrevPage,
    GoToPage(Page),
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    Replay,
    ToggleHelp,
    // Login form
    StartEditing,
    NextField,
    Submit,
    InputChar(char),
    Backspace,
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    match app.mode {
        Mode::Help => return Action::ExitMode,
        Mode::Editing(_) => return handle_editing_mode(key),
        Mode::Normal => {}
    }

    let binding = KeyBinding::from_event(&key);

    if keymap.is_g_prefix(&binding) {
        return match (app.pending_key, keymap.get_pending_g_action()) {
            (Some('g'), Some(action)) => action.clone(),
            _ => Action::PendingG,
        };
    }

    if binding.modifiers == KeyModifiers::NONE {
        if let KeyCode::Char(c @ '1'..='9') = binding.code {
            let index = usize::from(c as u8 - b'1');
            if let Some(page) = Page::from_index(index) {
                return Action::GoToPage(page);
            }
        }
    }

    keymap.get(&binding).cloned().unwrap_or(Action::None)
}

/// Handle key events while typing into a login field
fn handle_editing_mode(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::ExitMode,
        (KeyCode::Tab, _) => Action::NextField,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Backspace, _) => Action::Backspace,
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => Action::InputChar(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lumen_core::site::{Field, Site};
    use lumen_core::AppConfig;

    use super::*;
    use crate::theme::Theme;

    fn app() -> App {
        App::new(
            Arc::new(AppConfig::default()),
            Site::builtin(),
            Theme::default(),
            Page::Home,
            (80, 24),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_gg_sequence() {
        let mut app = app();
        let keymap = Keymap::default();

        let first = handle_key_event(key(KeyCode::Char('g')), &app, &keymap);
        assert_eq!(first, Action::PendingG);
        app.handle_action(first);

        let second = handle_key_event(key(KeyCode::Char('g')), &app, &keymap);
        assert_eq!(second, Action::JumpToTop);
    }

    #[test]
    fn test_digits_jump_to_pages() {
        let app = app();
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('3')), &app, &keymap),
            Action::GoToPage(Page::Login)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('9')), &app, &keymap),
            Action::None
        );
    }

    #[test]
    fn test_shifted_symbols_match_bindings() {
        let app = app();
        let keymap = Keymap::default();
        let question = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(question, &app, &keymap), Action::ToggleHelp);
        let bottom = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(bottom, &app, &keymap), Action::JumpToBottom);
    }

    #[test]
    fn test_editing_mode_captures_text() {
        let mut app = app();
        app.mode = Mode::Editing(Field::Email);
        let keymap = Keymap::default();

        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), &app, &keymap),
            Action::InputChar('q')
        );
        assert_eq!(handle_key_event(key(KeyCode::Esc), &app, &keymap), Action::ExitMode);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, &app, &keymap), Action::Quit);
    }

    #[test]
    fn test_help_mode_closes_on_any_key() {
        let mut app = app();
        app.mode = Mode::Help;
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j')), &app, &keymap),
            Action::ExitMode
        );
    }
}
