//! OS-level input injection behind a trait seam.
//!
//! [`InputDriver`] is the port the dispatch sequence runs against; the
//! production implementation drives synthetic keyboard/mouse events through
//! `enigo` and reads the pointer through `device_query`. Tests substitute a
//! recording driver.

use device_query::{DeviceQuery, DeviceState};
use enigo::{Enigo, Key, KeyboardControllable, MouseControllable};
use thiserror::Error;

/// Failure inside the injection layer.
#[derive(Debug, Error)]
#[error("input injection failed: {0}")]
pub struct InputError(pub String);

/// Synthetic input operations the dispatch sequence needs.
pub trait InputDriver {
    /// Current pointer position in screen coordinates.
    fn pointer_position(&mut self) -> Result<(i32, i32), InputError>;

    /// Move the pointer to screen coordinates.
    fn move_pointer(&mut self, x: i32, y: i32) -> Result<(), InputError>;

    /// Switch focus to the most recently used window (Alt+Tab).
    fn switch_window(&mut self) -> Result<(), InputError>;

    /// Press and release a character key.
    fn tap_key(&mut self, key: char) -> Result<(), InputError>;

    /// Press and release Enter.
    fn tap_enter(&mut self) -> Result<(), InputError>;

    /// Type literal text into the focused window.
    fn type_text(&mut self, text: &str) -> Result<(), InputError>;
}

/// Production driver: `enigo` for injection, `device_query` for the pointer
/// read that `enigo` 0.1 does not offer.
pub struct EnigoDriver {
    enigo: Enigo,
    pointer: DeviceState,
}

impl EnigoDriver {
    pub fn new() -> Self {
        Self {
            enigo: Enigo::new(),
            pointer: DeviceState::new(),
        }
    }
}

impl Default for EnigoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDriver for EnigoDriver {
    fn pointer_position(&mut self) -> Result<(i32, i32), InputError> {
        Ok(self.pointer.get_mouse().coords)
    }

    fn move_pointer(&mut self, x: i32, y: i32) -> Result<(), InputError> {
        self.enigo.mouse_move_to(x, y);
        Ok(())
    }

    fn switch_window(&mut self) -> Result<(), InputError> {
        self.enigo.key_down(Key::Alt);
        self.enigo.key_click(Key::Tab);
        self.enigo.key_up(Key::Alt);
        Ok(())
    }

    fn tap_key(&mut self, key: char) -> Result<(), InputError> {
        self.enigo.key_click(Key::Layout(key));
        Ok(())
    }

    fn tap_enter(&mut self) -> Result<(), InputError> {
        self.enigo.key_click(Key::Return);
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), InputError> {
        self.enigo.key_sequence(text);
        Ok(())
    }
}
