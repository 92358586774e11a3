//! # obcon
//!
//! **Console companion for Oblivion Remastered** - load the command/item
//! catalog once, search everything, and dispatch console commands into the
//! running game via synthetic keystrokes.
//!
//! ## Features
//!
//! - **Catalog loader** - Normalizes a directory of heterogeneously-shaped
//!   JSON files into command and item records, classified by filename into a
//!   fixed category set
//! - **Fuzzy category resolution** - Tolerates years of inconsistent data
//!   filenames; ambiguous filenames are flagged, never silently guessed
//! - **Presence detection** - Finds the game in the OS process list with
//!   edge-triggered status logging
//! - **Best-effort dispatch** - Focus-switch + keystroke sequence into the
//!   in-game console; fire-and-forget, no acknowledgement exists
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let (catalog, report) = obcon::loader::load(Path::new("data"))?;
//! println!("{} commands, {} items", report.commands, report.items);
//!
//! for item in catalog.items_in(obcon::CategoryId::Weapons) {
//!     println!("{} -> {}", item.name, item.command);
//! }
//! # Ok::<(), obcon::loader::CatalogError>(())
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! obcon scan                  # Load the catalog, summarize per category
//! obcon search umbra          # Find commands and items
//! obcon exec "Weapons_Umbra"  # Send the item's command to the game
//! obcon status --watch        # Poll for the game process
//! ```

/// Catalog index and pure query operations.
pub mod catalog;

/// Category set, display metadata, and filename-to-category resolution.
pub mod category;

/// Command-line interface shared by the `obcon` binary.
pub mod cli;

/// Best-effort keystroke dispatch into the game console.
pub mod dispatch;

/// OS input injection behind the [`input::InputDriver`] seam.
pub mod input;

/// Directory-of-JSON-files to catalog transformation.
pub mod loader;

/// Game process detection with edge-triggered status transitions.
pub mod presence;

/// Spinner and status-glyph output for the CLI.
pub mod progress;

/// Shared record types.
pub mod types;

pub use catalog::{Catalog, CatalogStats, Entry};
pub use category::{CategoryId, CategoryMatch, resolve_file_base};
pub use dispatch::{DispatchConfig, DispatchError, send_command};
pub use loader::{CatalogError, LoadReport, load};
pub use presence::{GameMonitor, PresenceTracker};
pub use types::{CommandRecord, ItemRecord, OutputMode};
