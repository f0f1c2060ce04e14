//! Record → descriptor conversion.
//!
//! Every function here is total: unknown or malformed input falls back to
//! a default instead of failing. Vocabulary lives in the tables in
//! [`crate::schema::descriptor`].

use rustc_hash::FxHashSet;

use crate::schema::descriptor::{ContentDescriptor, Dimensions, Rarity, Tag};
use crate::schema::record::ContentRecord;

/// Convert a raw record into a descriptor.
pub fn convert(record: &ContentRecord) -> ContentDescriptor {
    ContentDescriptor {
        display_name: record.name.clone(),
        dimensions: parse_dimensions(&record.size),
        rarity: parse_rarity(&record.rarity),
        tags: parse_tags(&record.theme),
        enjoyment: record.enjoyment,
        popularity: record.popularity,
    }
}

/// Parse `"<w>x<h>"`. Anything else is `1x1`.
pub fn parse_dimensions(size: &str) -> Dimensions {
    let mut parts = size.split('x');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(w), Some(h), None) => match (w.trim().parse(), h.trim().parse()) {
            (Ok(width), Ok(height)) => Dimensions::new(width, height),
            _ => Dimensions::default(),
        },
        _ => Dimensions::default(),
    }
}

/// Case-insensitive rarity; unknown tokens are `Common`.
pub fn parse_rarity(rarity: &str) -> Rarity {
    Rarity::lookup(rarity).unwrap_or_default()
}

/// Split a theme list on commas and keep the recognised tags.
pub fn parse_tags(theme: &str) -> FxHashSet<Tag> {
    theme
        .split(',')
        .filter_map(|token| Tag::lookup(token.trim()))
        .collect()
}
