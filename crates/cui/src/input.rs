use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Dismiss,
    Pull,
    NextFilter,
    PrevFilter,
    ResetHistory,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => InputAction::Quit,
            _ => InputAction::None,
        };
    }
    match key.code {
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Enter | KeyCode::Char(' ') => InputAction::Pull,
        KeyCode::Tab | KeyCode::Right => InputAction::NextFilter,
        KeyCode::BackTab | KeyCode::Left => InputAction::PrevFilter,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('g') => InputAction::Pull,
        KeyCode::Char('f') => InputAction::NextFilter,
        KeyCode::Char('F') => InputAction::PrevFilter,
        KeyCode::Char('r') => InputAction::ResetHistory,
        _ => InputAction::None,
    }
}
