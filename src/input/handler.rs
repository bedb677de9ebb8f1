use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Action),
    Restart,
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
            KeyCode::Up => KeyAction::Turn(Action::Up),
            KeyCode::Down => KeyAction::Turn(Action::Down),
            KeyCode::Left => KeyAction::Turn(Action::Left),
            KeyCode::Right => KeyAction::Turn(Action::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Action::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Action::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Action::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Action::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyboard side of the control adapter
///
/// The snake keeps moving along its heading between key presses. A turn
/// request that points straight back along the heading of the last move is
/// dropped; the simulation itself never filters actions.
#[derive(Debug, Clone)]
pub struct KeyboardController {
    heading: Action,
    requested: Option<Action>,
}

impl KeyboardController {
    pub fn new(heading: Action) -> Self {
        Self {
            heading,
            requested: None,
        }
    }

    /// Queue a turn for the next tick; returns false if it was a reversal
    pub fn request(&mut self, action: Action) -> bool {
        if action.is_opposite(self.heading) {
            return false;
        }
        self.requested = Some(action);
        true
    }

    /// The action to play this tick; it becomes the new heading
    pub fn next_action(&mut self) -> Action {
        if let Some(action) = self.requested.take() {
            self.heading = action;
        }
        self.heading
    }

    pub fn heading(&self) -> Action {
        self.heading
    }

    pub fn reset(&mut self, heading: Action) {
        self.heading = heading;
        self.requested = None;
    }
}

impl Default for KeyboardController {
    fn default() -> Self {
        Self::new(Action::Right)
    }
}
