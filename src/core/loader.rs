//! Catalogue loading and saving.
//!
//! Loading never fails: a missing or unreadable source is logged and
//! yields an empty catalogue, and malformed rows are dropped silently.
//! Saving is the only operation that reports errors.

use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::csv::{parse_line, write_line};
use crate::schema::record::ContentRecord;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Header line written by [`write`]. Ignored on read.
pub const HEADER: &str =
    "Name,Theme,Size,Rarity,Enjoyment,Popularity,Artist Notes,Artist Effort,VFX Effort";

/// Parse catalogue text into records, skipping the header line.
pub fn load(text: &str) -> Vec<ContentRecord> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    lines[1..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter_map(|line| ContentRecord::from_fields(&parse_line(line)))
        .collect()
}

/// Read and parse a catalogue file. Missing or unreadable files yield an
/// empty list.
pub fn load_file(path: &Path) -> Vec<ContentRecord> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let records = load(&text);
            debug!(path = %path.display(), records = records.len(), "Catalogue file parsed");
            records
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Catalogue file not found, using empty catalogue");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read catalogue file");
            Vec::new()
        }
    }
}

/// Serialize records back to catalogue text, header first.
pub fn write(records: &[ContentRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for record in records {
        let line = write_line(&[
            record.name.clone(),
            record.theme.clone(),
            record.size.clone(),
            record.rarity.clone(),
            record.enjoyment.to_string(),
            record.popularity.to_string(),
            record.artist_notes.clone(),
            record.artist_effort.to_string(),
            record.vfx_effort.to_string(),
        ]);
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Write records to a catalogue file.
pub fn save_file(path: &Path, records: &[ContentRecord]) -> Result<(), CatalogueError> {
    std::fs::write(path, write(records))?;
    debug!(path = %path.display(), records = records.len(), "Catalogue file saved");
    Ok(())
}
