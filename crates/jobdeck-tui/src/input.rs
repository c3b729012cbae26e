use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;

/// Map a crossterm terminal event to an action.
pub fn map_event(event: &Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }
            map_key(key)
        }
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Enter => Action::Select,
        KeyCode::Esc | KeyCode::Char('b') => Action::Back,
        KeyCode::Char('o') => Action::OpenTabs,
        KeyCode::Char('f') => Action::Fetch,
        KeyCode::Char('v') => Action::Validate,
        KeyCode::Char('p') => Action::SwitchProfile,
        KeyCode::Char('c') => Action::Cancel,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char(c) if c.is_ascii_digit() => Action::Digit(c),
        KeyCode::Backspace => Action::Backspace,
        _ => Action::None,
    }
}
