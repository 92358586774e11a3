//! Command-line interface: load, browse, search, dispatch.
//!
//! The binary in `src/bin/obcon.rs` is a thin shell around [`run`]. Every
//! subcommand that reads the catalog loads it fresh from the data
//! directory; the catalog is immutable for the life of the invocation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use console::style;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::catalog::{Catalog, Entry};
use crate::category::CategoryId;
use crate::dispatch::{DispatchConfig, send_command};
use crate::input::EnigoDriver;
use crate::loader::{LoadReport, load};
use crate::presence::{GameMonitor, PresenceTracker};
use crate::progress::{self, Spinner};
use crate::types::OutputMode;

#[derive(Parser, Debug)]
#[command(name = "obcon")]
#[command(about = "Console companion for Oblivion Remastered")]
#[command(version)]
pub struct Cli {
    /// Directory holding the catalog JSON files
    #[arg(long, global = true, default_value = "data")]
    pub data: PathBuf,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose diagnostics on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Load the catalog and print a per-category summary
    Scan,
    /// List categories, or the entries of one category
    List {
        /// Category label, e.g. "Weapons" or "Useful Cheats"
        category: Option<String>,
    },
    /// Search commands and items by name, id, or description
    Search {
        query: String,
        /// Maximum hits to print
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Show one command or item in full
    Info {
        /// Command name, item key, or item name
        name: String,
    },
    /// Send a catalog entry (or raw text) to the game console
    Exec {
        /// Command name, item key, or item name
        name: Option<String>,
        /// Dispatch this literal text instead of a catalog entry
        #[arg(long, conflicts_with = "name")]
        raw: Option<String>,
        /// Print what would be sent without touching the game
        #[arg(long)]
        dry_run: bool,
    },
    /// Check whether the game is running
    Status {
        /// Keep polling and report status changes
        #[arg(long)]
        watch: bool,
        /// Poll interval in seconds
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
}

/// Run the parsed CLI. This is the shared main() body.
pub fn run(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose);
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match &cli.command {
        Cmd::Scan => cmd_scan(&cli.data, mode),
        Cmd::List { category } => cmd_list(&cli.data, category.as_deref(), mode),
        Cmd::Search { query, limit } => cmd_search(&cli.data, query, *limit, mode),
        Cmd::Info { name } => cmd_info(&cli.data, name, mode),
        Cmd::Exec { name, raw, dry_run } => {
            cmd_exec(&cli.data, name.as_deref(), raw.as_deref(), *dry_run, mode)
        }
        Cmd::Status { watch, interval } => cmd_status(*watch, *interval, mode),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "obcon=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the catalog, with a spinner in human mode.
fn load_catalog(data: &Path, mode: OutputMode) -> Result<(Catalog, LoadReport)> {
    let spinner = match mode {
        OutputMode::Human => Some(Spinner::new("Loading catalog...")),
        OutputMode::Json => None,
    };
    match load(data) {
        Ok(loaded) => {
            if let Some(spinner) = &spinner {
                spinner.finish_clear();
            }
            Ok(loaded)
        }
        Err(err) => {
            if let Some(spinner) = &spinner {
                spinner.finish_clear();
            }
            Err(err.into())
        }
    }
}

fn cmd_scan(data: &Path, mode: OutputMode) -> Result<ExitCode> {
    let (catalog, report) = load_catalog(data, mode)?;

    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    progress::success(&format!(
        "Loaded {} commands and {} items from {} of {} files in {}ms",
        report.commands, report.items, report.files_loaded, report.files_seen, report.duration_ms
    ));

    for category in CategoryId::browsable() {
        let count = catalog.category_len(category);
        if count > 0 {
            println!(
                "  {} {:<22} {:>5}",
                category.icon(),
                category.label(),
                count
            );
        }
    }

    if report.dropped_records > 0 {
        progress::warning(&format!(
            "{} records dropped (missing name or id)",
            report.dropped_records
        ));
    }
    for skipped in &report.skipped {
        progress::warning(&format!("{}: {}", skipped.file, skipped.reason));
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_list(data: &Path, category: Option<&str>, mode: OutputMode) -> Result<ExitCode> {
    let (catalog, _) = load_catalog(data, mode)?;

    let Some(raw) = category else {
        // No category: list them all.
        if mode == OutputMode::Json {
            let listing: Vec<_> = CategoryId::browsable()
                .map(|c| {
                    json!({
                        "category": c.label(),
                        "icon": c.icon(),
                        "description": c.description(),
                        "entries": catalog.category_len(c),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
            return Ok(ExitCode::SUCCESS);
        }
        for c in CategoryId::browsable() {
            println!(
                "{} {:<22} {:>5}  {}",
                c.icon(),
                style(c.label()).bold(),
                catalog.category_len(c),
                style(c.description()).dim()
            );
        }
        return Ok(ExitCode::SUCCESS);
    };

    let Some(category) = CategoryId::parse(raw) else {
        bail!("unknown category: {raw} (try `obcon list` for the full set)");
    };

    if category.holds_commands() {
        let commands = catalog.commands_in(category);
        if mode == OutputMode::Json {
            println!("{}", serde_json::to_string_pretty(&commands)?);
            return Ok(ExitCode::SUCCESS);
        }
        for cmd in commands {
            println!(
                "{:<30} {}",
                style(&cmd.syntax).bold(),
                style(&cmd.description).dim()
            );
        }
    } else {
        let items = catalog.items_in(category);
        if mode == OutputMode::Json {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(ExitCode::SUCCESS);
        }
        for item in items {
            println!(
                "{:<40} {:<10} {}",
                style(&item.name).bold(),
                item.id,
                style(&item.command).dim()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_search(data: &Path, query: &str, limit: usize, mode: OutputMode) -> Result<ExitCode> {
    let (catalog, _) = load_catalog(data, mode)?;
    let hits = catalog.search(query);

    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(ExitCode::SUCCESS);
    }

    if hits.is_empty() {
        progress::warning(&format!("no matches for \"{query}\""));
        let suggestions = catalog.suggest(query, 3);
        if !suggestions.is_empty() {
            println!("Did you mean: {}", suggestions.join(", "));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut printed = 0usize;
    for cmd in &hits.commands {
        if printed == limit {
            break;
        }
        println!(
            "{:<12} {:<40} {}",
            style(cmd.category.label()).cyan(),
            style(&cmd.syntax).bold(),
            style(&cmd.description).dim()
        );
        printed += 1;
    }
    for item in &hits.items {
        if printed == limit {
            break;
        }
        println!(
            "{:<12} {:<40} {}",
            style(item.category.label()).cyan(),
            style(&item.name).bold(),
            style(&item.command).dim()
        );
        printed += 1;
    }
    if hits.len() > limit {
        println!("... and {} more (raise --limit)", hits.len() - limit);
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_info(data: &Path, name: &str, mode: OutputMode) -> Result<ExitCode> {
    let (catalog, _) = load_catalog(data, mode)?;

    let Some(entry) = catalog.find(name) else {
        progress::error(&format!("not found in catalog: {name}"));
        let suggestions = catalog.suggest(name, 3);
        if !suggestions.is_empty() {
            println!("Did you mean: {}", suggestions.join(", "));
        }
        return Ok(ExitCode::FAILURE);
    };

    match entry {
        Entry::Command(cmd) => {
            if mode == OutputMode::Json {
                println!("{}", serde_json::to_string_pretty(cmd)?);
                return Ok(ExitCode::SUCCESS);
            }
            println!("{}", style(&cmd.name).bold());
            println!("  category:    {} {}", cmd.category.icon(), cmd.category);
            println!("  syntax:      {}", cmd.syntax);
            println!("  description: {}", cmd.description);
            if !cmd.parameters.is_empty() {
                println!("  parameters:  {}", cmd.parameters.join(" "));
            }
            if let Some(example) = &cmd.example {
                println!("  example:     {example}");
            }
        }
        Entry::Item(item) => {
            if mode == OutputMode::Json {
                println!("{}", serde_json::to_string_pretty(item)?);
                return Ok(ExitCode::SUCCESS);
            }
            println!("{}", style(&item.name).bold());
            println!("  category: {} {}", item.category.icon(), item.category);
            println!("  id:       {}", item.id);
            println!("  command:  {}", item.command);
            for (field, value) in &item.extra {
                println!("  {field}: {value}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_exec(
    data: &Path,
    name: Option<&str>,
    raw: Option<&str>,
    dry_run: bool,
    mode: OutputMode,
) -> Result<ExitCode> {
    let text = match (raw, name) {
        (Some(raw), _) => raw.to_string(),
        (None, Some(name)) => {
            let (catalog, _) = load_catalog(data, mode)?;
            let Some(entry) = catalog.find(name) else {
                progress::error(&format!("not found in catalog: {name}"));
                let suggestions = catalog.suggest(name, 3);
                if !suggestions.is_empty() {
                    println!("Did you mean: {}", suggestions.join(", "));
                }
                return Ok(ExitCode::FAILURE);
            };
            entry.console_command().to_string()
        }
        (None, None) => bail!("provide a name or --raw <TEXT>"),
    };

    if text.trim().is_empty() {
        progress::error("refusing to dispatch an empty command");
        return Ok(ExitCode::FAILURE);
    }

    if dry_run {
        if mode == OutputMode::Json {
            println!(
                "{}",
                json!({ "command": text, "dispatched": false, "dry_run": true })
            );
        } else {
            progress::success(&format!("would send: {text}"));
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Best-effort: warn when the game is missing but send anyway, matching
    // the behavior players expect when the process name changes between
    // patches.
    let mut monitor = GameMonitor::new();
    let game_running = monitor.is_running();
    if !game_running && mode == OutputMode::Human {
        progress::warning("game not detected; sending anyway");
    }

    let mut driver = EnigoDriver::new();
    let config = DispatchConfig::default();
    match send_command(&mut driver, &config, &text) {
        Ok(()) => {
            if mode == OutputMode::Json {
                println!(
                    "{}",
                    json!({ "command": text, "dispatched": true, "game_running": game_running })
                );
            } else {
                progress::success(&format!("sent: {text}"));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if mode == OutputMode::Json {
                println!(
                    "{}",
                    json!({ "command": text, "dispatched": false, "error": err.to_string() })
                );
            } else {
                progress::error(&format!("dispatch failed: {err}"));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_status(watch: bool, interval: u64, mode: OutputMode) -> Result<ExitCode> {
    let mut monitor = GameMonitor::new();

    if !watch {
        let game = monitor.find_game();
        if mode == OutputMode::Json {
            println!(
                "{}",
                json!({
                    "running": game.is_some(),
                    "pid": game.as_ref().map(|g| g.pid),
                    "process": game.as_ref().map(|g| g.name.clone()),
                })
            );
        } else {
            match &game {
                Some(g) => progress::success(&format!("game running: {} (pid {})", g.name, g.pid)),
                None => progress::warning("game not detected"),
            }
        }
        return Ok(if game.is_some() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let interval = Duration::from_secs(interval.max(1));
    let mut tracker = PresenceTracker::default();
    loop {
        let game = monitor.find_game();
        if tracker.observe(game.is_some()) {
            let timestamp = chrono::Local::now().format("%H:%M:%S");
            if mode == OutputMode::Json {
                println!(
                    "{}",
                    json!({
                        "at": timestamp.to_string(),
                        "running": game.is_some(),
                        "pid": game.as_ref().map(|g| g.pid),
                    })
                );
            } else {
                match &game {
                    Some(g) => {
                        println!("[{timestamp}] game detected: {} (pid {})", g.name, g.pid)
                    }
                    None => println!("[{timestamp}] game not detected"),
                }
            }
        }
        thread::sleep(interval);
    }
}
