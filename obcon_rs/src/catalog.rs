//! The in-memory catalog index.
//!
//! Built once by [`crate::loader::load`], read-only afterwards. All query
//! operations are pure reads, so a populated catalog can be shared by
//! reference with any number of readers.

use std::collections::HashMap;

use serde::Serialize;

use crate::category::CategoryId;
use crate::types::{CommandRecord, ItemRecord};

/// Minimum similarity for a fuzzy suggestion to be offered.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Category index plus flat lookups for commands and items.
#[derive(Debug, Default)]
pub struct Catalog {
    commands: HashMap<String, CommandRecord>,
    items: HashMap<String, ItemRecord>,
    /// Category -> record keys (command names or item keys) in load order.
    by_category: HashMap<CategoryId, Vec<String>>,
}

/// A reference into the catalog, either side of the index.
#[derive(Clone, Copy, Debug)]
pub enum Entry<'a> {
    Command(&'a CommandRecord),
    Item(&'a ItemRecord),
}

impl Entry<'_> {
    /// The console text this entry would dispatch.
    pub fn console_command(&self) -> &str {
        match self {
            Entry::Command(cmd) => &cmd.syntax,
            Entry::Item(item) => &item.command,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Command(cmd) => &cmd.name,
            Entry::Item(item) => &item.name,
        }
    }
}

/// Totals over the whole catalog.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CatalogStats {
    pub commands: usize,
    pub items: usize,
}

/// Case-insensitive substring search hits, commands and items separately.
#[derive(Default, Serialize)]
pub struct SearchHits<'a> {
    pub commands: Vec<&'a CommandRecord>,
    pub items: Vec<&'a ItemRecord>,
}

impl SearchHits<'_> {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len() + self.items.len()
    }
}

impl Catalog {
    /// Insert a command. A repeated name replaces the earlier record without
    /// duplicating its key in the category sequence.
    pub(crate) fn insert_command(&mut self, record: CommandRecord) {
        let name = record.name.clone();
        let category = record.category;
        if self.commands.insert(name.clone(), record).is_none() {
            self.by_category.entry(category).or_default().push(name);
        }
    }

    /// Insert an item. Same replacement rule as [`Self::insert_command`].
    pub(crate) fn insert_item(&mut self, record: ItemRecord) {
        let key = record.key.clone();
        let category = record.category;
        if self.items.insert(key.clone(), record).is_none() {
            self.by_category.entry(category).or_default().push(key);
        }
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            commands: self.commands.len(),
            items: self.items.len(),
        }
    }

    /// Number of records filed under a category.
    pub fn category_len(&self, category: CategoryId) -> usize {
        self.by_category.get(&category).map_or(0, Vec::len)
    }

    /// Commands of a category, in load order.
    pub fn commands_in(&self, category: CategoryId) -> Vec<&CommandRecord> {
        self.keys_in(category)
            .filter_map(|key| self.commands.get(key))
            .collect()
    }

    /// Items of a category, in load order.
    pub fn items_in(&self, category: CategoryId) -> Vec<&ItemRecord> {
        self.keys_in(category)
            .filter_map(|key| self.items.get(key))
            .collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandRecord> {
        self.commands.get(name)
    }

    pub fn item(&self, key: &str) -> Option<&ItemRecord> {
        self.items.get(key)
    }

    /// Find an entry by command name, item key, or (case-insensitive) item
    /// name, in that order.
    pub fn find(&self, name: &str) -> Option<Entry<'_>> {
        if let Some(cmd) = self.commands.get(name) {
            return Some(Entry::Command(cmd));
        }
        if let Some(item) = self.items.get(name) {
            return Some(Entry::Item(item));
        }
        let needle = name.to_lowercase();
        self.items
            .values()
            .find(|item| item.name.to_lowercase() == needle)
            .map(Entry::Item)
    }

    /// Substring search over command names/syntax/descriptions and item
    /// names/ids, case-insensitive. An empty query matches nothing.
    pub fn search(&self, query: &str) -> SearchHits<'_> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchHits::default();
        }

        let mut hits = SearchHits {
            commands: self
                .commands
                .values()
                .filter(|cmd| {
                    cmd.name.to_lowercase().contains(&needle)
                        || cmd.syntax.to_lowercase().contains(&needle)
                        || cmd.description.to_lowercase().contains(&needle)
                })
                .collect(),
            items: self
                .items
                .values()
                .filter(|item| {
                    item.name.to_lowercase().contains(&needle)
                        || item.id.to_lowercase().contains(&needle)
                })
                .collect(),
        };
        hits.commands.sort_by(|a, b| a.name.cmp(&b.name));
        hits.items.sort_by(|a, b| a.key.cmp(&b.key));
        hits
    }

    /// Fuzzy-ranked name suggestions for a missed lookup.
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<String> {
        let mut scored: Vec<(f64, &str)> = self
            .commands
            .keys()
            .map(String::as_str)
            .chain(self.items.values().map(|item| item.name.as_str()))
            .map(|candidate| {
                (
                    strsim::jaro_winkler(&name.to_lowercase(), &candidate.to_lowercase()),
                    candidate,
                )
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }

    fn keys_in(&self, category: CategoryId) -> impl Iterator<Item = &String> {
        self.by_category.get(&category).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_DESCRIPTION;

    fn command(name: &str, category: CategoryId) -> CommandRecord {
        CommandRecord {
            name: name.to_string(),
            syntax: format!("{name} <value>"),
            description: NO_DESCRIPTION.to_string(),
            parameters: vec!["<value>".to_string()],
            category,
            example: None,
        }
    }

    fn item(name: &str, id: &str, category: CategoryId) -> ItemRecord {
        ItemRecord {
            key: ItemRecord::make_key(category, name),
            name: name.to_string(),
            id: id.to_string(),
            command: format!("player.additem {id} 1"),
            category,
            extra: serde_json::Map::new(),
        }
    }

    fn sample() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.insert_command(command("player.setav", CategoryId::UsefulCheats));
        catalog.insert_command(command("tgm", CategoryId::Toggle));
        catalog.insert_item(item("Umbra", "00013A53", CategoryId::Weapons));
        catalog.insert_item(item("Daedric Longsword", "000489B1", CategoryId::Weapons));
        catalog.insert_item(item("Elven Cuirass", "0001C6D4", CategoryId::Armor));
        catalog
    }

    #[test]
    fn category_queries_return_load_order() {
        let catalog = sample();
        let weapons = catalog.items_in(CategoryId::Weapons);
        assert_eq!(weapons.len(), 2);
        assert_eq!(weapons[0].name, "Umbra");
        assert_eq!(weapons[1].name, "Daedric Longsword");
        assert_eq!(catalog.commands_in(CategoryId::Toggle).len(), 1);
        assert!(catalog.items_in(CategoryId::Horses).is_empty());
    }

    #[test]
    fn duplicate_insert_replaces_without_duplicating_key() {
        let mut catalog = sample();
        let mut updated = command("tgm", CategoryId::Toggle);
        updated.description = "Toggles god mode".to_string();
        catalog.insert_command(updated);

        assert_eq!(catalog.category_len(CategoryId::Toggle), 1);
        assert_eq!(
            catalog.command("tgm").unwrap().description,
            "Toggles god mode"
        );
    }

    #[test]
    fn find_prefers_command_name_then_item_key_then_item_name() {
        let catalog = sample();
        assert!(matches!(
            catalog.find("player.setav"),
            Some(Entry::Command(_))
        ));
        assert!(matches!(
            catalog.find("Weapons_Umbra"),
            Some(Entry::Item(_))
        ));
        assert!(matches!(catalog.find("umbra"), Some(Entry::Item(_))));
        assert!(catalog.find("no such thing").is_none());
    }

    #[test]
    fn search_matches_names_and_ids_case_insensitively() {
        let catalog = sample();
        let hits = catalog.search("UMBRA");
        assert_eq!(hits.items.len(), 1);
        assert!(hits.commands.is_empty());

        let by_id = catalog.search("000489b1");
        assert_eq!(by_id.items.len(), 1);
        assert_eq!(by_id.items[0].name, "Daedric Longsword");

        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn suggest_ranks_near_misses() {
        let catalog = sample();
        let suggestions = catalog.suggest("player.setva", 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("player.setav"));
    }

    #[test]
    fn entry_console_command_uses_syntax_or_item_command() {
        let catalog = sample();
        match catalog.find("Weapons_Umbra").unwrap() {
            Entry::Item(item) => assert_eq!(item.command, "player.additem 00013A53 1"),
            _ => panic!("expected item"),
        }
        assert_eq!(
            catalog.find("tgm").unwrap().console_command(),
            "tgm <value>"
        );
    }
}
