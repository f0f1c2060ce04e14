//! Exhibit Catalogue: content ingestion for a museum-building game.
//!
//! Reads the hand-edited exhibit CSV, converts each row into a typed
//! descriptor, and resolves display assets through a memoizing cache with
//! generic and sentinel fallbacks. Every step degrades instead of failing,
//! so a broken data file never takes the game down.

pub mod core;
pub mod schema;
