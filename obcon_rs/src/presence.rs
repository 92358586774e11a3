//! Game presence detection via OS process enumeration.
//!
//! The check is a linear scan over the process list on every call; the
//! caller owns the polling cadence. Status transitions are edge-triggered:
//! only a Running <-> NotRunning flip produces a log line, so a steady poll
//! stays quiet.

use sysinfo::{ProcessesToUpdate, System};
use tracing::info;

/// Process-name substrings identifying the target game.
pub const TARGET_PROCESS_NAMES: &[&str] = &[
    "OblivionRemastered",
    "The Elder Scrolls IV: Oblivion Remastered",
];

/// Our own process name, excluded from matching so the companion never
/// detects itself as the game.
pub const SELF_PROCESS_NAME: &str = "obcon";

/// True when a process name identifies the game and is not this
/// application.
pub fn matches_game_process(name: &str) -> bool {
    if name.to_lowercase().contains(SELF_PROCESS_NAME) {
        return false;
    }
    TARGET_PROCESS_NAMES
        .iter()
        .any(|target| name.contains(target))
}

/// A matched game process.
#[derive(Clone, Debug)]
pub struct GameProcess {
    pub pid: u32,
    pub name: String,
}

/// Single-slot memory of the previous presence result, used to detect
/// Running <-> NotRunning edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresenceTracker {
    last: Option<bool>,
}

impl PresenceTracker {
    /// Record an observation. Returns true when it differs from the
    /// previous one (including the very first observation).
    pub fn observe(&mut self, running: bool) -> bool {
        let changed = self.last != Some(running);
        self.last = Some(running);
        changed
    }
}

/// Polls the OS process list for the game.
///
/// Owns a [`System`] handle so repeated checks refresh instead of
/// re-enumerating from scratch, and a [`PresenceTracker`] for
/// edge-triggered logging.
pub struct GameMonitor {
    system: System,
    tracker: PresenceTracker,
}

impl GameMonitor {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            tracker: PresenceTracker::default(),
        }
    }

    /// Scan the process list for the game. Processes whose details cannot
    /// be read are simply not matched, never an error.
    pub fn find_game(&mut self) -> Option<GameProcess> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        self.system.processes().iter().find_map(|(pid, process)| {
            let name = process.name().to_string_lossy();
            matches_game_process(&name).then(|| GameProcess {
                pid: pid.as_u32(),
                name: name.into_owned(),
            })
        })
    }

    /// Whether the game is currently running. Logs only on a status edge.
    pub fn is_running(&mut self) -> bool {
        let found = self.find_game();
        let running = found.is_some();
        if self.tracker.observe(running) {
            match &found {
                Some(game) => info!(pid = game.pid, name = %game.name, "game detected"),
                None => info!("game not detected"),
            }
        }
        running
    }
}

impl Default for GameMonitor {
    fn default() -> Self {
        Self::new()
    }
}
