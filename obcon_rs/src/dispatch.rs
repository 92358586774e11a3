//! Best-effort command dispatch into the game console.
//!
//! The "protocol" is a fixed keystroke sequence with settle delays between
//! steps: focus-switch, open the console, type, Enter, close the console,
//! restore the pointer. There is no acknowledgement from the game and no
//! readback - success means only that every injection call returned. If a
//! step fails partway, earlier keystrokes are not rolled back; the in-game
//! console may be left open.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::input::{InputDriver, InputError};

/// Why a dispatch reported failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("refusing to dispatch an empty command")]
    EmptyCommand,
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Console key and per-step settle delays.
///
/// Defaults mirror the timings the sequence was tuned with against the
/// shipped game; tests zero them out.
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Key that opens and closes the in-game console.
    pub console_key: char,
    /// Wait after the focus switch for the game window to come forward.
    pub focus_settle: Duration,
    /// Wait after opening the console.
    pub open_settle: Duration,
    /// Wait after typing the command text.
    pub type_settle: Duration,
    /// Wait after pressing Enter.
    pub enter_settle: Duration,
    /// Wait after closing the console.
    pub close_settle: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            console_key: '`',
            focus_settle: Duration::from_millis(1500),
            open_settle: Duration::from_millis(700),
            type_settle: Duration::from_millis(400),
            enter_settle: Duration::from_millis(400),
            close_settle: Duration::from_millis(300),
        }
    }
}

impl DispatchConfig {
    /// All delays zeroed. Unusable against the real game, handy everywhere
    /// else.
    pub fn without_delays() -> Self {
        Self {
            console_key: '`',
            focus_settle: Duration::ZERO,
            open_settle: Duration::ZERO,
            type_settle: Duration::ZERO,
            enter_settle: Duration::ZERO,
            close_settle: Duration::ZERO,
        }
    }
}

/// Deliver `command` into the game console, best-effort.
///
/// Blocks the calling thread for the cumulative settle time (seconds with
/// default timings). Rejects blank input before touching the driver. Any
/// driver failure aborts the sequence and is returned as-is; there is no
/// retry and no partial-completion tracking.
pub fn send_command(
    driver: &mut dyn InputDriver,
    config: &DispatchConfig,
    command: &str,
) -> Result<(), DispatchError> {
    if command.trim().is_empty() {
        return Err(DispatchError::EmptyCommand);
    }

    debug!(command, "dispatching to game console");

    let (x, y) = driver.pointer_position()?;

    driver.switch_window()?;
    thread::sleep(config.focus_settle);

    driver.tap_key(config.console_key)?;
    thread::sleep(config.open_settle);

    driver.type_text(command)?;
    thread::sleep(config.type_settle);

    driver.tap_enter()?;
    thread::sleep(config.enter_settle);

    driver.tap_key(config.console_key)?;
    thread::sleep(config.close_settle);

    driver.move_pointer(x, y)?;

    debug!(command, "dispatch sequence completed");
    Ok(())
}
