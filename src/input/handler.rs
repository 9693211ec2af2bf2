use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;
use crate::modes::Pace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Absolute heading requested by the player
    Heading(Direction),
    Restart,
    Pause,
    Speed(Pace),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Heading(Direction::Up),
            KeyCode::Down => KeyAction::Heading(Direction::Down),
            KeyCode::Left => KeyAction::Heading(Direction::Left),
            KeyCode::Right => KeyAction::Heading(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Heading(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Heading(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Heading(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Heading(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Pause,

            // Playback speed
            KeyCode::Char('1') => KeyAction::Speed(Pace::Slow),
            KeyCode::Char('2') => KeyAction::Speed(Pace::Normal),
            KeyCode::Char('3') => KeyAction::Speed(Pace::Fast),
            KeyCode::Char('4') => KeyAction::Speed(Pace::Configured),

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
