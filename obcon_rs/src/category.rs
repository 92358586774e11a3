//! Category definitions and filename-to-category resolution.
//!
//! Every record in the catalog belongs to exactly one [`CategoryId`]. Source
//! files carry no category field of their own - the category is derived from
//! the filename, which has drifted over the years ("All Weapons IDs.json",
//! "all weapons ids v2.json", ...). Resolution is therefore deliberately
//! fuzzy: exact prefix-table match first, then prefix match, then a
//! bag-of-significant-words match, then two known historical special cases.
//!
//! A file base that matches more than one distinct category at the same
//! stage is flagged [`CategoryMatch::Ambiguous`] rather than silently
//! assigned the first hit in table order.

use std::fmt;

use serde::Serialize;

/// Closed set of catalog categories.
///
/// The first four hold console commands; the rest hold game objects.
/// `Favorites` exists only for display metadata - no source file maps to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryId {
    #[serde(rename = "Useful Cheats")]
    UsefulCheats,
    Toggle,
    Quest,
    Targeted,
    Weapons,
    Armor,
    Spells,
    Potions,
    Books,
    Clothing,
    Miscellaneous,
    #[serde(rename = "NPCs")]
    Npcs,
    Locations,
    Keys,
    Horses,
    #[serde(rename = "Soul Gems")]
    SoulGems,
    #[serde(rename = "Sigil Stones")]
    SigilStones,
    #[serde(rename = "Alchemy Equipment")]
    AlchemyEquipment,
    #[serde(rename = "Alchemy Ingredients")]
    AlchemyIngredients,
    Arrows,
    Favorites,
}

/// All categories in display order.
pub const ALL_CATEGORIES: &[CategoryId] = &[
    CategoryId::UsefulCheats,
    CategoryId::Toggle,
    CategoryId::Quest,
    CategoryId::Targeted,
    CategoryId::Weapons,
    CategoryId::Armor,
    CategoryId::Spells,
    CategoryId::Potions,
    CategoryId::Books,
    CategoryId::Clothing,
    CategoryId::Miscellaneous,
    CategoryId::Npcs,
    CategoryId::Locations,
    CategoryId::Keys,
    CategoryId::Horses,
    CategoryId::SoulGems,
    CategoryId::SigilStones,
    CategoryId::AlchemyEquipment,
    CategoryId::AlchemyIngredients,
    CategoryId::Arrows,
    CategoryId::Favorites,
];

impl CategoryId {
    /// Human-readable label, also used as the item-key prefix.
    pub fn label(self) -> &'static str {
        match self {
            CategoryId::UsefulCheats => "Useful Cheats",
            CategoryId::Toggle => "Toggle",
            CategoryId::Quest => "Quest",
            CategoryId::Targeted => "Targeted",
            CategoryId::Weapons => "Weapons",
            CategoryId::Armor => "Armor",
            CategoryId::Spells => "Spells",
            CategoryId::Potions => "Potions",
            CategoryId::Books => "Books",
            CategoryId::Clothing => "Clothing",
            CategoryId::Miscellaneous => "Miscellaneous",
            CategoryId::Npcs => "NPCs",
            CategoryId::Locations => "Locations",
            CategoryId::Keys => "Keys",
            CategoryId::Horses => "Horses",
            CategoryId::SoulGems => "Soul Gems",
            CategoryId::SigilStones => "Sigil Stones",
            CategoryId::AlchemyEquipment => "Alchemy Equipment",
            CategoryId::AlchemyIngredients => "Alchemy Ingredients",
            CategoryId::Arrows => "Arrows",
            CategoryId::Favorites => "Favorites",
        }
    }

    /// Display icon for the category.
    pub fn icon(self) -> &'static str {
        match self {
            CategoryId::UsefulCheats => "⭐",
            CategoryId::Toggle => "🔄",
            CategoryId::Quest => "📜",
            CategoryId::Targeted => "🎯",
            CategoryId::Weapons => "⚔️",
            CategoryId::Armor => "🛡️",
            CategoryId::Spells => "✨",
            CategoryId::Potions => "🧪",
            CategoryId::Books => "📚",
            CategoryId::Clothing => "👕",
            CategoryId::Miscellaneous => "🔮",
            CategoryId::Npcs => "👤",
            CategoryId::Locations => "🏙️",
            CategoryId::Keys => "🔑",
            CategoryId::Horses => "🐴",
            CategoryId::SoulGems => "💎",
            CategoryId::SigilStones => "🌟",
            CategoryId::AlchemyEquipment => "⚗️",
            CategoryId::AlchemyIngredients => "🌿",
            CategoryId::Arrows => "🏹",
            CategoryId::Favorites => "❤️",
        }
    }

    /// One-line description shown next to the category.
    pub fn description(self) -> &'static str {
        match self {
            CategoryId::UsefulCheats => "Commonly used cheats and commands",
            CategoryId::Toggle => "Commands that toggle game features on/off",
            CategoryId::Quest => "Commands related to quests",
            CategoryId::Targeted => "Commands that affect a specific target",
            CategoryId::Weapons => "All weapon IDs in the game",
            CategoryId::Armor => "All armor IDs in the game",
            CategoryId::Spells => "All spell IDs in the game",
            CategoryId::Potions => "All potion and drink IDs in the game",
            CategoryId::Books => "All book and scroll IDs in the game",
            CategoryId::Clothing => "All clothing, amulet, and ring IDs in the game",
            CategoryId::Miscellaneous => "All miscellaneous item IDs in the game",
            CategoryId::Npcs => "All NPC IDs in the game",
            CategoryId::Locations => "All location IDs in the game",
            CategoryId::Keys => "All key IDs in the game",
            CategoryId::Horses => "All horse IDs in the game",
            CategoryId::SoulGems => "All soul gem IDs in the game",
            CategoryId::SigilStones => "All sigil stone IDs in the game",
            CategoryId::AlchemyEquipment => "All alchemy equipment IDs in the game",
            CategoryId::AlchemyIngredients => "All alchemy ingredient IDs in the game",
            CategoryId::Arrows => "All arrow IDs in the game",
            CategoryId::Favorites => "Your favorite commands and items",
        }
    }

    /// True for categories whose files hold console commands rather than
    /// game-object IDs.
    pub fn holds_commands(self) -> bool {
        matches!(
            self,
            CategoryId::UsefulCheats | CategoryId::Toggle | CategoryId::Quest | CategoryId::Targeted
        )
    }

    /// Categories a caller can browse. Favorites is a UI-level overlay with
    /// no backing files, so it is not listed.
    pub fn browsable() -> impl Iterator<Item = CategoryId> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .filter(|c| *c != CategoryId::Favorites)
    }

    /// Parse a category from user input, case-insensitively.
    pub fn parse(input: &str) -> Option<CategoryId> {
        let needle = input.trim().to_lowercase();
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == needle)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Known filename prefixes, lowercased, in table order. Two Clothing entries
/// cover an alternative spacing format seen in shipped data files.
const FILE_PREFIXES: &[(&str, CategoryId)] = &[
    ("useful cheats", CategoryId::UsefulCheats),
    ("all toggle commands", CategoryId::Toggle),
    ("all quest commands", CategoryId::Quest),
    ("target commands", CategoryId::Targeted),
    ("all weapons ids", CategoryId::Weapons),
    ("all armor ids", CategoryId::Armor),
    ("all spells ids", CategoryId::Spells),
    ("all potions and drinks ids", CategoryId::Potions),
    ("all books and scrolls ids", CategoryId::Books),
    ("all clothing_amulets_and_rings ids", CategoryId::Clothing),
    ("all clothing_ amulets_ and rings ids", CategoryId::Clothing),
    ("all miscellaneous ids", CategoryId::Miscellaneous),
    ("all npc ids", CategoryId::Npcs),
    ("all locations ids", CategoryId::Locations),
    ("all keys ids", CategoryId::Keys),
    ("all horses ids", CategoryId::Horses),
    ("all soul gems ids", CategoryId::SoulGems),
    ("all sigil stone ids", CategoryId::SigilStones),
    ("all alchemy equipment ids", CategoryId::AlchemyEquipment),
    ("all alchemy ingredients ids", CategoryId::AlchemyIngredients),
    ("all arrow ids", CategoryId::Arrows),
];

/// Tokens carrying no category information in the word-subset stage.
const STOPWORDS: &[&str] = &["all", "ids"];

/// Outcome of resolving a file base against the prefix table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Exactly one category matched.
    Resolved(CategoryId),
    /// More than one distinct category matched at the same stage.
    Ambiguous(Vec<CategoryId>),
    /// No rule matched.
    Unknown,
}

/// Resolve a normalized file base (lowercased filename, extension stripped)
/// to a category.
///
/// Pure and deterministic: the same input always yields the same outcome.
pub fn resolve_file_base(file_base: &str) -> CategoryMatch {
    let base = file_base.trim();

    // Stage 1: exact match against the prefix table.
    if let Some(outcome) = collect(|prefix| base == prefix) {
        return outcome;
    }

    // Stage 2: prefix match, tolerating suffixes like version tags.
    if let Some(outcome) = collect(|prefix| base.starts_with(prefix)) {
        return outcome;
    }

    // Stage 3: all significant words of a prefix appear somewhere in the base.
    if let Some(outcome) = collect(|prefix| {
        prefix
            .split_whitespace()
            .filter(|word| !STOPWORDS.contains(word))
            .all(|word| base.contains(word))
    }) {
        return outcome;
    }

    // Stage 4: historical special cases that defeat the table.
    if base.contains("clothing") && base.contains("amulets") && base.contains("rings") {
        return CategoryMatch::Resolved(CategoryId::Clothing);
    }
    if base.contains("potions") {
        return CategoryMatch::Resolved(CategoryId::Potions);
    }

    CategoryMatch::Unknown
}

/// Run one resolution stage; `None` means the stage matched nothing.
fn collect(rule: impl Fn(&str) -> bool) -> Option<CategoryMatch> {
    let mut matched: Vec<CategoryId> = Vec::new();
    for (prefix, category) in FILE_PREFIXES {
        if rule(prefix) && !matched.contains(category) {
            matched.push(*category);
        }
    }
    match matched.len() {
        0 => None,
        1 => Some(CategoryMatch::Resolved(matched[0])),
        _ => Some(CategoryMatch::Ambiguous(matched)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_prefix_resolves() {
        assert_eq!(
            resolve_file_base("useful cheats"),
            CategoryMatch::Resolved(CategoryId::UsefulCheats)
        );
        assert_eq!(
            resolve_file_base("all weapons ids"),
            CategoryMatch::Resolved(CategoryId::Weapons)
        );
    }

    #[test]
    fn prefix_with_suffix_resolves() {
        assert_eq!(
            resolve_file_base("all npc ids v2"),
            CategoryMatch::Resolved(CategoryId::Npcs)
        );
        assert_eq!(
            resolve_file_base("useful cheats (updated)"),
            CategoryMatch::Resolved(CategoryId::UsefulCheats)
        );
    }

    #[test]
    fn word_subset_resolves_reordered_names() {
        // No prefix match, but every significant word is present.
        assert_eq!(
            resolve_file_base("oblivion all ids soul gems"),
            CategoryMatch::Resolved(CategoryId::SoulGems)
        );
    }

    #[test]
    fn alternative_clothing_spacing_resolves() {
        assert_eq!(
            resolve_file_base("all clothing_ amulets_ and rings ids"),
            CategoryMatch::Resolved(CategoryId::Clothing)
        );
    }

    #[test]
    fn clothing_special_case_resolves() {
        // Neither table stage matches this spelling; the special case does.
        assert_eq!(
            resolve_file_base("clothing, amulets and rings"),
            CategoryMatch::Resolved(CategoryId::Clothing)
        );
    }

    #[test]
    fn potions_special_case_resolves() {
        assert_eq!(
            resolve_file_base("misc potions dump"),
            CategoryMatch::Resolved(CategoryId::Potions)
        );
    }

    #[test]
    fn unknown_filename_is_unknown() {
        assert_eq!(resolve_file_base("readme"), CategoryMatch::Unknown);
        assert_eq!(resolve_file_base(""), CategoryMatch::Unknown);
    }

    #[test]
    fn multi_category_base_is_flagged_ambiguous() {
        // Contains the significant words of both Weapons and Armor.
        match resolve_file_base("combined weapons and armor dump") {
            CategoryMatch::Ambiguous(cats) => {
                assert!(cats.contains(&CategoryId::Weapons));
                assert!(cats.contains(&CategoryId::Armor));
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn resolution_is_deterministic_and_idempotent() {
        for base in ["all horses ids", "something else", "weapons armor"] {
            assert_eq!(resolve_file_base(base), resolve_file_base(base));
        }
    }

    #[test]
    fn category_parse_round_trips_labels() {
        for cat in ALL_CATEGORIES {
            assert_eq!(CategoryId::parse(cat.label()), Some(*cat));
            assert_eq!(CategoryId::parse(&cat.label().to_uppercase()), Some(*cat));
        }
        assert_eq!(CategoryId::parse("no such category"), None);
    }

    #[test]
    fn command_categories_are_the_first_four() {
        let commands: Vec<CategoryId> = ALL_CATEGORIES
            .iter()
            .copied()
            .filter(|c| c.holds_commands())
            .collect();
        assert_eq!(
            commands,
            vec![
                CategoryId::UsefulCheats,
                CategoryId::Toggle,
                CategoryId::Quest,
                CategoryId::Targeted
            ]
        );
    }

    #[test]
    fn browsable_excludes_favorites() {
        assert!(CategoryId::browsable().all(|c| c != CategoryId::Favorites));
        assert_eq!(CategoryId::browsable().count(), ALL_CATEGORIES.len() - 1);
    }
}
