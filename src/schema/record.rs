use serde::{Deserialize, Serialize};

/// Minimum number of fields a row needs: name, theme, size, rarity.
pub const REQUIRED_FIELDS: usize = 4;

/// One raw catalogue row, still string-typed.
///
/// Required columns are always present; optional numeric columns default
/// to `0` and optional text columns to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub name: String,
    /// Raw comma-separated theme text, e.g. `"Fantasy, Gothic"`.
    pub theme: String,
    /// Raw size text, e.g. `"2x3"`.
    pub size: String,
    pub rarity: String,
    pub enjoyment: i32,
    pub popularity: i32,
    pub artist_notes: String,
    pub artist_effort: i32,
    pub vfx_effort: i32,
}

impl ContentRecord {
    /// Build a record from positional fields.
    ///
    /// Returns `None` when fewer than [`REQUIRED_FIELDS`] are present.
    /// Optional numeric fields are only applied when they parse.
    pub fn from_fields(fields: &[String]) -> Option<ContentRecord> {
        if fields.len() < REQUIRED_FIELDS {
            return None;
        }

        let int_at = |i: usize| {
            fields
                .get(i)
                .and_then(|f| f.parse::<i32>().ok())
                .unwrap_or(0)
        };

        Some(ContentRecord {
            name: fields[0].clone(),
            theme: fields[1].clone(),
            size: fields[2].clone(),
            rarity: fields[3].clone(),
            enjoyment: int_at(4),
            popularity: int_at(5),
            artist_notes: fields.get(6).cloned().unwrap_or_default(),
            artist_effort: int_at(7),
            vfx_effort: int_at(8),
        })
    }
}
