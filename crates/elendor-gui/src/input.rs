//! Keyboard adapter producing per-tick movement intents.

use elendor_core::{InputIntent, InputSource};
use macroquad::prelude::*;

/// Check if the Escape key was pressed this frame.
pub fn escape_pressed() -> bool {
    is_key_pressed(KeyCode::Escape)
}

/// Check if the Enter key was pressed this frame.
pub fn enter_pressed() -> bool {
    is_key_pressed(KeyCode::Enter)
}

/// Check if the map key was pressed this frame.
pub fn map_pressed() -> bool {
    is_key_pressed(KeyCode::M)
}

/// Collect printable characters typed this frame.
pub fn typed_chars() -> Vec<char> {
    let mut chars = Vec::new();
    while let Some(ch) = get_char_pressed() {
        if (' '..='~').contains(&ch) {
            chars.push(ch);
        }
    }
    chars
}

/// Check if the backspace key was pressed this frame.
pub fn backspace_pressed() -> bool {
    is_key_pressed(KeyCode::Backspace)
}

/// Samples the keyboard once per frame and hands the result to every tick
/// run during that frame.
///
/// A sprint-toggle press is latched until a tick consumes it, so a press on
/// a frame that runs no tick is not lost and a frame that runs several ticks
/// toggles only once.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    held: InputIntent,
    toggle_pending: bool,
}

impl KeyboardInput {
    /// Create an adapter with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the keyboard. Call once per frame before driving the session.
    pub fn poll(&mut self) {
        self.held = InputIntent {
            up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            sprint_held: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            sprint_toggle: false,
        };
        if is_key_pressed(KeyCode::R) {
            self.toggle_pending = true;
        }
    }

    /// Forget held keys, e.g. when an overlay opens.
    pub fn release(&mut self) {
        self.held = InputIntent::IDLE;
        self.toggle_pending = false;
    }
}

impl InputSource for KeyboardInput {
    fn sample(&mut self, _tick: u64) -> InputIntent {
        InputIntent {
            sprint_toggle: std::mem::take(&mut self.toggle_pending),
            ..self.held
        }
    }
}
