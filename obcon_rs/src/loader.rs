//! Catalog loader: transforms a directory of heterogeneously-shaped JSON
//! files into the normalized [`Catalog`].
//!
//! Failure is isolated per file: a malformed or unclassifiable file is
//! recorded in the [`LoadReport`] and skipped, and the load carries on with
//! the remaining files. Only a missing or unreadable data directory fails
//! the load as a whole.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::category::{CategoryId, CategoryMatch, resolve_file_base};
use crate::types::{CommandRecord, ItemRecord, NO_DESCRIPTION};

/// Errors that abort the whole load. Per-file problems never do; they land
/// in the [`LoadReport`] instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("data directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("failed to read data directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a file contributed no records.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No category-resolution rule matched the filename.
    UnknownCategory,
    /// The filename matched more than one category.
    AmbiguousCategory { candidates: Vec<CategoryId> },
    /// The file could not be read.
    Unreadable { error: String },
    /// The file is not valid JSON.
    MalformedJson { error: String },
    /// The top-level JSON value is not an array of objects.
    NotAnArray,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnknownCategory => write!(f, "unknown category"),
            SkipReason::AmbiguousCategory { candidates } => {
                let labels: Vec<&str> = candidates.iter().map(|c| c.label()).collect();
                write!(f, "ambiguous category ({})", labels.join(", "))
            }
            SkipReason::Unreadable { error } => write!(f, "unreadable: {error}"),
            SkipReason::MalformedJson { error } => write!(f, "malformed JSON: {error}"),
            SkipReason::NotAnArray => write!(f, "top-level JSON value is not an array"),
        }
    }
}

/// One skipped file and the reason it was skipped.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: SkipReason,
}

/// What a load did: totals plus every per-file skip.
#[derive(Clone, Debug, Default, Serialize)]
pub struct LoadReport {
    /// `.json` files found in the directory.
    pub files_seen: usize,
    /// Files that contributed at least zero records (parsed and classified).
    pub files_loaded: usize,
    pub skipped: Vec<SkippedFile>,
    /// Records dropped for missing an essential field (name or id).
    pub dropped_records: usize,
    pub commands: usize,
    pub items: usize,
    pub duration_ms: u64,
}

/// Load every `.json` file of `directory` (non-recursive) into a catalog.
///
/// Returns the populated catalog and a report of everything that was loaded
/// or skipped. The catalog is immutable from here on.
pub fn load(directory: &Path) -> Result<(Catalog, LoadReport), CatalogError> {
    let started = Instant::now();

    if !directory.is_dir() {
        return Err(CatalogError::DirectoryNotFound(directory.to_path_buf()));
    }
    let entries = fs::read_dir(directory).map_err(|source| CatalogError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut json_files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    // Deterministic load order regardless of readdir order.
    json_files.sort();

    let mut catalog = Catalog::default();
    let mut report = LoadReport {
        files_seen: json_files.len(),
        ..LoadReport::default()
    };

    for path in &json_files {
        load_file(path, &mut catalog, &mut report);
    }

    let stats = catalog.stats();
    report.commands = stats.commands;
    report.items = stats.items;
    report.duration_ms = started.elapsed().as_millis() as u64;
    debug!(
        files = report.files_loaded,
        commands = report.commands,
        items = report.items,
        skipped = report.skipped.len(),
        "catalog loaded"
    );

    Ok((catalog, report))
}

/// Load a single file into the catalog, recording any skip in the report.
fn load_file(path: &Path, catalog: &mut Catalog, report: &mut LoadReport) {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_base = file_name
        .to_lowercase()
        .trim_end_matches(".json")
        .to_string();

    let mut skip = |reason: SkipReason| {
        warn!(file = %file_name, %reason, "skipping data file");
        report.skipped.push(SkippedFile {
            file: file_name.clone(),
            reason,
        });
    };

    let category = match resolve_file_base(&file_base) {
        CategoryMatch::Resolved(category) => category,
        CategoryMatch::Ambiguous(candidates) => {
            skip(SkipReason::AmbiguousCategory { candidates });
            return;
        }
        CategoryMatch::Unknown => {
            skip(SkipReason::UnknownCategory);
            return;
        }
    };

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            skip(SkipReason::Unreadable {
                error: err.to_string(),
            });
            return;
        }
    };
    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            skip(SkipReason::MalformedJson {
                error: err.to_string(),
            });
            return;
        }
    };
    let Value::Array(records) = value else {
        skip(SkipReason::NotAnArray);
        return;
    };

    let mut dropped = 0usize;
    for record in &records {
        let Value::Object(fields) = record else {
            dropped += 1;
            continue;
        };
        let normalized = if category.holds_commands() {
            normalize_command(fields, category).map(Record::Command)
        } else {
            normalize_item(fields, category).map(Record::Item)
        };
        match normalized {
            Some(Record::Command(cmd)) => catalog.insert_command(cmd),
            Some(Record::Item(item)) => catalog.insert_item(item),
            None => dropped += 1,
        }
    }

    debug!(
        file = %file_name,
        category = %category,
        records = records.len() - dropped,
        dropped,
        "loaded data file"
    );
    report.files_loaded += 1;
    report.dropped_records += dropped;
}

enum Record {
    Command(CommandRecord),
    Item(ItemRecord),
}

/// Normalize one command-category record. `None` when the `Command` field is
/// missing or blank.
fn normalize_command(fields: &Map<String, Value>, category: CategoryId) -> Option<CommandRecord> {
    let syntax = field_str(fields, "Command")?;
    let mut tokens = syntax.split_whitespace().map(str::to_string);
    let name = tokens.next()?;
    let parameters: Vec<String> = tokens.collect();

    Some(CommandRecord {
        name,
        description: field_str(fields, "Description").unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        parameters,
        category,
        example: field_str(fields, "Example"),
        syntax,
    })
}

/// Normalize one item-category record. `None` (dropped) when name or id
/// cannot be extracted.
fn normalize_item(fields: &Map<String, Value>, category: CategoryId) -> Option<ItemRecord> {
    let id = id_field_candidates(category)
        .iter()
        .find_map(|field| field_str(fields, field))?;

    let name = match category {
        CategoryId::SigilStones => field_str(fields, "Effect"),
        // Location files often have no display name; the id doubles as one.
        CategoryId::Locations => field_str(fields, "Name").or_else(|| Some(id.clone())),
        _ => field_str(fields, "Name"),
    }?;

    let command =
        field_str(fields, "Copy Paste Cheat").unwrap_or_else(|| default_command(category, &id));

    Some(ItemRecord {
        key: ItemRecord::make_key(category, &name),
        name,
        id,
        command,
        category,
        extra: fields.clone(),
    })
}

/// Ordered candidate source-field names holding the game object id, per
/// category. Potions data shipped under three different field names over
/// time, hence the fallback chain.
fn id_field_candidates(category: CategoryId) -> &'static [&'static str] {
    match category {
        CategoryId::Weapons => &["Weapon ID"],
        CategoryId::Armor => &["Armor ID"],
        CategoryId::Spells => &["Spell ID"],
        CategoryId::Potions => &["Ingredient ID", "Potion ID", "ID"],
        CategoryId::Books => &["Book ID"],
        CategoryId::Clothing | CategoryId::Miscellaneous => &["ID"],
        CategoryId::Npcs => &["NPC ID"],
        CategoryId::Locations => &["Location ID"],
        CategoryId::Keys => &["Key ID"],
        CategoryId::Horses => &["Horse ID"],
        CategoryId::SoulGems => &["Soul Gem ID"],
        // Sigil stones carry one id per strength tier; Ascendent is the default.
        CategoryId::SigilStones => &["Ascendent ID"],
        CategoryId::AlchemyEquipment => &["Equipment ID"],
        CategoryId::AlchemyIngredients => &["Ingredient ID"],
        CategoryId::Arrows => &["Arrow ID"],
        _ => &[],
    }
}

/// Synthesized console command for an item without a ready-made one.
fn default_command(category: CategoryId, id: &str) -> String {
    match category {
        CategoryId::Npcs => format!("player.placeatme {id}"),
        CategoryId::Spells => format!("player.addspell {id}"),
        CategoryId::Locations => format!("coc {id}"),
        _ => format!("player.additem {id} 1"),
    }
}

/// Read a field as a non-blank string. Numbers are stringified; anything
/// else counts as absent.
fn field_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn missing_directory_fails_cleanly() {
        let err = load(Path::new("/no/such/directory")).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryNotFound(_)));
    }

    #[test]
    fn empty_directory_loads_zero_records() {
        let dir = TempDir::new().unwrap();
        let (catalog, report) = load(dir.path()).unwrap();
        assert_eq!(report.files_seen, 0);
        assert_eq!(catalog.stats().commands + catalog.stats().items, 0);
    }

    #[test]
    fn command_record_splits_name_and_parameters() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "Useful Cheats.json",
            r#"[{"Command": "player.setav Strength 50", "Description": "Sets attribute"}]"#,
        );

        let (catalog, report) = load(dir.path()).unwrap();
        assert_eq!(report.commands, 1);

        let cmd = catalog.command("player.setav").unwrap();
        assert_eq!(cmd.parameters, vec!["Strength", "50"]);
        assert_eq!(cmd.description, "Sets attribute");
        assert_eq!(cmd.syntax, "player.setav Strength 50");
        assert_eq!(cmd.category, CategoryId::UsefulCheats);
        assert!(cmd.example.is_none());
    }

    #[test]
    fn command_without_description_gets_placeholder() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "All Toggle Commands.json", r#"[{"Command": "tgm"}]"#);

        let (catalog, _) = load(dir.path()).unwrap();
        let cmd = catalog.command("tgm").unwrap();
        assert_eq!(cmd.description, NO_DESCRIPTION);
        assert!(cmd.parameters.is_empty());
    }

    #[test]
    fn command_record_without_command_field_is_dropped() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Quest Commands.json",
            r#"[{"Description": "orphaned"}, {"Command": "caqs"}]"#,
        );

        let (catalog, report) = load(dir.path()).unwrap();
        assert_eq!(report.commands, 1);
        assert_eq!(report.dropped_records, 1);
        assert!(catalog.command("caqs").is_some());
    }

    #[test]
    fn item_with_copy_paste_cheat_keeps_it() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Weapons IDs.json",
            r#"[{"Name": "Umbra", "Weapon ID": "00013A53", "Copy Paste Cheat": "player.additem 00013A53 1"}]"#,
        );

        let (catalog, _) = load(dir.path()).unwrap();
        let item = catalog.item("Weapons_Umbra").unwrap();
        assert_eq!(item.command, "player.additem 00013A53 1");
        assert_eq!(item.extra["Weapon ID"], "00013A53");
    }

    #[test]
    fn default_commands_are_synthesized_per_category() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Locations IDs.json",
            r#"[{"Location ID": "ICMarketDistrict"}]"#,
        );
        write_file(
            &dir,
            "All Weapons IDs.json",
            r#"[{"Name": "Fine Steel Longsword", "Weapon ID": "0001D4CA"}]"#,
        );
        write_file(
            &dir,
            "All NPC IDs.json",
            r#"[{"Name": "Adoring Fan", "NPC ID": "0002A1B3"}]"#,
        );
        write_file(
            &dir,
            "All Spells IDs.json",
            r#"[{"Name": "Flare", "Spell ID": "00084001"}]"#,
        );

        let (catalog, _) = load(dir.path()).unwrap();
        assert_eq!(
            catalog.item("Locations_ICMarketDistrict").unwrap().command,
            "coc ICMarketDistrict"
        );
        assert_eq!(
            catalog.item("Weapons_Fine Steel Longsword").unwrap().command,
            "player.additem 0001D4CA 1"
        );
        assert_eq!(
            catalog.item("NPCs_Adoring Fan").unwrap().command,
            "player.placeatme 0002A1B3"
        );
        assert_eq!(
            catalog.item("Spells_Flare").unwrap().command,
            "player.addspell 00084001"
        );
    }

    #[test]
    fn location_without_name_uses_id_as_name() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Locations IDs.json",
            r#"[{"Location ID": "WeyeMapMarker"}]"#,
        );

        let (catalog, _) = load(dir.path()).unwrap();
        let item = catalog.item("Locations_WeyeMapMarker").unwrap();
        assert_eq!(item.name, "WeyeMapMarker");
        assert_eq!(item.id, "WeyeMapMarker");
    }

    #[test]
    fn sigil_stone_uses_effect_as_name() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Sigil Stone IDs.json",
            r#"[{"Effect": "Fire Damage", "Ascendent ID": "00014B9C"}]"#,
        );

        let (catalog, _) = load(dir.path()).unwrap();
        let item = catalog.item("Sigil Stones_Fire Damage").unwrap();
        assert_eq!(item.id, "00014B9C");
    }

    #[test]
    fn potion_id_falls_back_through_candidate_fields() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Potions and Drinks IDs.json",
            r#"[
                {"Name": "Weak Potion of Healing", "Potion ID": "000147F9"},
                {"Name": "Mead", "ID": "00091EC2"}
            ]"#,
        );

        let (catalog, _) = load(dir.path()).unwrap();
        assert_eq!(
            catalog.item("Potions_Weak Potion of Healing").unwrap().id,
            "000147F9"
        );
        assert_eq!(catalog.item("Potions_Mead").unwrap().id, "00091EC2");
    }

    #[test]
    fn item_missing_name_and_id_is_dropped() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Armor IDs.json",
            r#"[{"Rating": "5"}, {"Name": "Elven Cuirass", "Armor ID": "0001C6D4"}]"#,
        );

        let (catalog, report) = load(dir.path()).unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(report.dropped_records, 1);
        assert!(catalog.item("Armor_Elven Cuirass").is_some());
    }

    #[test]
    fn item_missing_only_name_is_dropped() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "All Keys IDs.json", r#"[{"Key ID": "0000D3A2"}]"#);

        let (_, report) = load(dir.path()).unwrap();
        assert_eq!(report.items, 0);
        assert_eq!(report.dropped_records, 1);
    }

    #[test]
    fn malformed_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "All Horses IDs.json", "{not json");
        write_file(
            &dir,
            "All Arrow IDs.json",
            r#"[{"Name": "Iron Arrow", "Arrow ID": "00017829"}]"#,
        );

        let (catalog, report) = load(dir.path()).unwrap();
        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::MalformedJson { .. }
        ));
        assert_eq!(catalog.stats().items, 1);
    }

    #[test]
    fn non_array_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "All Soul Gems IDs.json", r#"{"Name": "Azura's Star"}"#);

        let (_, report) = load(dir.path()).unwrap();
        assert_eq!(report.files_loaded, 0);
        assert!(matches!(report.skipped[0].reason, SkipReason::NotAnArray));
    }

    #[test]
    fn unknown_category_file_is_reported() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "changelog.json", "[]");

        let (_, report) = load(dir.path()).unwrap();
        assert_eq!(report.files_loaded, 0);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::UnknownCategory
        ));
    }

    #[test]
    fn non_json_files_are_not_enumerated() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "notes.txt", "not data");
        write_file(&dir, "All Horses IDs.json", "[]");

        let (_, report) = load(dir.path()).unwrap();
        assert_eq!(report.files_seen, 1);
        assert_eq!(report.files_loaded, 1);
    }

    #[test]
    fn numeric_id_is_stringified() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "All Miscellaneous IDs.json",
            r#"[{"Name": "Lockpick", "ID": 192}]"#,
        );

        let (catalog, _) = load(dir.path()).unwrap();
        assert_eq!(catalog.item("Miscellaneous_Lockpick").unwrap().id, "192");
    }
}
