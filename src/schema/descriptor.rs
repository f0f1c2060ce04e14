use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Footprint of an exhibit on the placement grid, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rarity tier of an exhibit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Exotic,
    Mythic,
}

/// Lowercase rarity vocabulary. `exhibit` is a legacy alias for `Common`.
pub const RARITY_VOCABULARY: &[(&str, Rarity)] = &[
    ("common", Rarity::Common),
    ("rare", Rarity::Rare),
    ("exotic", Rarity::Exotic),
    ("mythic", Rarity::Mythic),
    ("exhibit", Rarity::Common),
];

impl Rarity {
    /// Case-insensitive vocabulary lookup. `None` for unknown tokens.
    pub fn lookup(token: &str) -> Option<Rarity> {
        lookup(RARITY_VOCABULARY, token)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Exotic => "Exotic",
            Self::Mythic => "Mythic",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Theme tag attached to an exhibit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Fantasy,
    Model,
    Modern,
    Steampunk,
    Invention,
    Space,
    Beast,
    Light,
    Earth,
    Fire,
    Ice,
    Lightning,
    Botanical,
    Arcane,
    Scripts,
    Shadow,
    Warfare,
    Treasure,
    Pirate,
}

/// Lowercase theme vocabulary. `gothic` aliases `Shadow`.
pub const TAG_VOCABULARY: &[(&str, Tag)] = &[
    ("fantasy", Tag::Fantasy),
    ("model", Tag::Model),
    ("modern", Tag::Modern),
    ("steampunk", Tag::Steampunk),
    ("invention", Tag::Invention),
    ("space", Tag::Space),
    ("beast", Tag::Beast),
    ("light", Tag::Light),
    ("earth", Tag::Earth),
    ("fire", Tag::Fire),
    ("ice", Tag::Ice),
    ("lightning", Tag::Lightning),
    ("botanical", Tag::Botanical),
    ("arcane", Tag::Arcane),
    ("scripts", Tag::Scripts),
    ("shadow", Tag::Shadow),
    ("warfare", Tag::Warfare),
    ("treasure", Tag::Treasure),
    ("pirate", Tag::Pirate),
    ("gothic", Tag::Shadow),
];

impl Tag {
    /// Case-insensitive vocabulary lookup. `None` for unknown tokens.
    pub fn lookup(token: &str) -> Option<Tag> {
        lookup(TAG_VOCABULARY, token)
    }

    /// Human-readable label: "Steampunk".
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fantasy => "Fantasy",
            Self::Model => "Model",
            Self::Modern => "Modern",
            Self::Steampunk => "Steampunk",
            Self::Invention => "Invention",
            Self::Space => "Space",
            Self::Beast => "Beast",
            Self::Light => "Light",
            Self::Earth => "Earth",
            Self::Fire => "Fire",
            Self::Ice => "Ice",
            Self::Lightning => "Lightning",
            Self::Botanical => "Botanical",
            Self::Arcane => "Arcane",
            Self::Scripts => "Scripts",
            Self::Shadow => "Shadow",
            Self::Warfare => "Warfare",
            Self::Treasure => "Treasure",
            Self::Pirate => "Pirate",
        }
    }

    /// Stable identifier used by game data: "Theme_Steampunk".
    pub fn identifier(&self) -> String {
        format!("Theme_{}", self.label())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], token: &str) -> Option<T> {
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(token))
        .map(|(_, value)| *value)
}

/// A converted, presentation-ready catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub display_name: String,
    pub dimensions: Dimensions,
    pub rarity: Rarity,
    pub tags: FxHashSet<Tag>,
    pub enjoyment: i32,
    pub popularity: i32,
}

impl ContentDescriptor {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Tag labels sorted by tag order, joined with ", ".
    pub fn tag_labels(&self) -> String {
        let mut tags: Vec<Tag> = self.tags.iter().copied().collect();
        tags.sort();
        tags.iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
