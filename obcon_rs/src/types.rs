//! Shared types for the normalized catalog records.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::category::CategoryId;

/// How CLI handlers render their results.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputMode {
    Human,
    Json,
}

/// Placeholder used when a command record carries no description.
pub const NO_DESCRIPTION: &str = "No description available";

/// A normalized console command, e.g. `player.setav Strength 50`.
///
/// Immutable after load. The name (first whitespace-delimited token of the
/// source `Command` field) is unique across the whole catalog.
#[derive(Clone, Debug, Serialize)]
pub struct CommandRecord {
    /// Unique command name, e.g. `player.setav`.
    pub name: String,
    /// Full command line as it appeared in the source record.
    pub syntax: String,
    pub description: String,
    /// Remaining whitespace-delimited tokens after the name.
    pub parameters: Vec<String>,
    pub category: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// A normalized game object (weapon, spell, location, ...) with a
/// ready-to-send console command.
#[derive(Clone, Debug, Serialize)]
pub struct ItemRecord {
    /// Unique key, `<category>_<name>`.
    pub key: String,
    pub name: String,
    /// Game object identifier, e.g. `0001D4CA`.
    pub id: String,
    /// Console command that acquires/spawns/uses the object. Taken from the
    /// source record when present, otherwise synthesized per category.
    pub command: String,
    pub category: CategoryId,
    /// Untouched source fields, carried through for display.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ItemRecord {
    /// Build the unique key an item gets inside the catalog.
    pub fn make_key(category: CategoryId, name: &str) -> String {
        format!("{}_{}", category.label(), name)
    }
}
