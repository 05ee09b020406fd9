//! Key handling for the tracker.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::app::Screen;

/// Action to take after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit, saving a running session first.
    Quit,
    /// Move the picker selection up.
    Up,
    /// Move the picker selection down.
    Down,
    /// Jump to the first row.
    Top,
    /// Jump to the last row.
    Bottom,
    /// Confirm the highlighted row.
    Select,
    /// Go back one screen.
    Back,
    /// Start or stop the timer.
    Toggle,
    /// Discard the running session.
    Reset,
    /// Show key help in the status line.
    Help,
}

/// Map a key press to an action for the given screen.
///
/// Returns `None` for keys that do nothing there.
pub fn action_for(key: KeyEvent, screen: Screen) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match (screen, key.code) {
        (_, KeyCode::Char('q') | KeyCode::Esc) => Some(Action::Quit),
        (_, KeyCode::Char('?')) => Some(Action::Help),
        (_, KeyCode::Backspace) => Some(Action::Back),

        // Pickers - vim style
        (Screen::ProjectPicker | Screen::TaskPicker, KeyCode::Char('j') | KeyCode::Down) => Some(Action::Down),
        (Screen::ProjectPicker | Screen::TaskPicker, KeyCode::Char('k') | KeyCode::Up) => Some(Action::Up),
        (Screen::ProjectPicker | Screen::TaskPicker, KeyCode::Char('g') | KeyCode::Home) => Some(Action::Top),
        (Screen::ProjectPicker | Screen::TaskPicker, KeyCode::Char('G') | KeyCode::End) => Some(Action::Bottom),
        (Screen::ProjectPicker | Screen::TaskPicker, KeyCode::Enter) => Some(Action::Select),

        // Timer
        (Screen::Timer, KeyCode::Char('s' | ' ')) => Some(Action::Toggle),
        (Screen::Timer, KeyCode::Char('r')) => Some(Action::Reset),

        _ => None,
    }
}

/// Key help for a screen.
pub const fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::ProjectPicker => "j/k:nav | Enter:choose project | q:quit",
        Screen::TaskPicker => "j/k:nav | Enter:choose task | Backspace:projects | q:quit",
        Screen::Timer => "s/space:start/stop | r:reset | Backspace:tasks | q:quit (saves)",
    }
}
