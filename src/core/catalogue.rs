//! The in-memory exhibit catalogue.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::convert::convert;
use crate::core::loader;
use crate::schema::descriptor::ContentDescriptor;
use crate::schema::record::ContentRecord;

/// Ordered, read-only list of converted exhibits. Replaced wholesale on
/// reload, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    entries: Vec<ContentDescriptor>,
}

impl Catalogue {
    pub fn from_records(records: &[ContentRecord]) -> Self {
        Self {
            entries: records.iter().map(convert).collect(),
        }
    }

    /// Parse catalogue text (header line first).
    pub fn parse(text: &str) -> Self {
        Self::from_records(&loader::load(text))
    }

    /// Load a catalogue file; missing or unreadable files give an empty
    /// catalogue.
    pub fn load_file(path: &Path) -> Self {
        Self::from_records(&loader::load_file(path))
    }

    pub fn entries(&self) -> &[ContentDescriptor] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ContentDescriptor> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentDescriptor> {
        self.entries.iter()
    }

    /// First entry with this display name.
    pub fn find(&self, display_name: &str) -> Option<&ContentDescriptor> {
        self.entries.iter().find(|e| e.display_name == display_name)
    }

    /// Pick up to `count` distinct entries uniformly at random.
    pub fn draw_offer<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&ContentDescriptor> {
        self.entries.choose_multiple(rng, count).collect()
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a ContentDescriptor;
    type IntoIter = std::slice::Iter<'a, ContentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
