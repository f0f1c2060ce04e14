//! Asset resolution with memoized fallback.
//!
//! A lookup tries the exhibit's own asset, then a generic placeholder for
//! its footprint, then the missing sentinel. The outcome is memoized under
//! the exhibit's key for the lifetime of the cache, negative results
//! included; only [`AssetResolutionCache::clear`] forgets them.

use rustc_hash::FxHashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

use crate::schema::descriptor::Dimensions;

/// Which family of asset to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Sprite,
    Prefab,
}

impl AssetKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sprite => "Sprite",
            Self::Prefab => "Prefab",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a resolution: a located asset or the missing sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetHandle {
    /// Store-specific location of the asset.
    Asset(String),
    Missing,
}

impl AssetHandle {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Asset(location) => Some(location),
            Self::Missing => None,
        }
    }
}

/// Backing store probed on a cache miss.
pub trait AssetStore: Send + Sync {
    /// Look up `key` (e.g. `Sprite/Brass_Orrery`) and return the asset's
    /// location if it exists.
    fn probe(&self, key: &str) -> Option<String>;
}

impl<S: AssetStore + ?Sized> AssetStore for Arc<S> {
    fn probe(&self, key: &str) -> Option<String> {
        (**self).probe(key)
    }
}

impl<S: AssetStore + ?Sized> AssetStore for Box<S> {
    fn probe(&self, key: &str) -> Option<String> {
        (**self).probe(key)
    }
}

/// Assets laid out on disk as `<root>/<Kind>/<Key>.<ext>`.
#[derive(Debug, Clone)]
pub struct DirectoryAssetStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryAssetStore {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }
}

impl AssetStore for DirectoryAssetStore {
    fn probe(&self, key: &str) -> Option<String> {
        self.extensions.iter().find_map(|ext| {
            let candidate = self.root.join(format!("{}.{}", key, ext));
            candidate
                .is_file()
                .then(|| candidate.display().to_string())
        })
    }
}

/// In-memory store keyed by resolution key. Counts probes.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: FxHashMap<String, String>,
    probes: AtomicUsize,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset whose location is its key.
    pub fn with_asset(mut self, key: &str) -> Self {
        self.insert(key, key);
        self
    }

    pub fn insert(&mut self, key: &str, location: &str) {
        self.assets.insert(key.to_string(), location.to_string());
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }
}

impl AssetStore for MemoryAssetStore {
    fn probe(&self, key: &str) -> Option<String> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        self.assets.get(key).cloned()
    }
}

/// Derive a filesystem-safe key from a display name.
///
/// Spaces and `/ \ . -` become underscores; quotes, brackets, braces, and
/// `, ! ? : ;` are removed.
pub fn resolution_key(identifier: &str) -> String {
    identifier
        .chars()
        .filter_map(|c| match c {
            ' ' | '/' | '\\' | '.' | '-' => Some('_'),
            '\'' | '"' | ',' | '(' | ')' | '[' | ']' | '{' | '}' | '!' | '?' | ':' | ';' => None,
            other => Some(other),
        })
        .collect()
}

fn generic_key(kind: AssetKind, dimensions: Dimensions) -> String {
    format!("{}/Generic_{}", kind, dimensions)
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Calls made into the backing store.
    pub probes: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: FxHashMap<String, AssetHandle>,
    stats: CacheStats,
}

/// Memoizing resolver over an [`AssetStore`].
///
/// The check-then-probe-then-insert sequence runs under a single lock, so
/// concurrent callers never probe the store twice for the same key.
#[derive(Debug)]
pub struct AssetResolutionCache<S> {
    store: S,
    state: Mutex<CacheState>,
}

impl<S: AssetStore> AssetResolutionCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve an asset for `identifier`, falling back to the generic
    /// placeholder for `fallback` and finally to [`AssetHandle::Missing`].
    pub fn resolve(
        &self,
        kind: AssetKind,
        identifier: &str,
        fallback: Dimensions,
    ) -> AssetHandle {
        let safe = resolution_key(identifier);
        let key = format!("{}/{}", kind, safe);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = state.entries.get(&key) {
            let handle = handle.clone();
            state.stats.hits += 1;
            return handle;
        }
        state.stats.misses += 1;

        let primary = if safe.is_empty() {
            None
        } else {
            state.stats.probes += 1;
            self.store.probe(&key).map(AssetHandle::Asset)
        };

        let handle = match primary {
            Some(handle) => handle,
            None => {
                let handle = self.resolve_generic(&mut state, kind, fallback);
                if handle.is_missing() {
                    warn!(%key, %identifier, "No asset or generic fallback, using missing sentinel");
                } else {
                    debug!(%key, fallback = %fallback, "Using generic fallback asset");
                }
                handle
            }
        };

        state.entries.insert(key, handle.clone());
        handle
    }

    // Generic keys share the map with exhibit keys. An exhibit whose name
    // sanitizes to `Generic_WxH` memoizes its own result under that key,
    // and later fallbacks for that footprint reuse it.
    fn resolve_generic(
        &self,
        state: &mut CacheState,
        kind: AssetKind,
        dimensions: Dimensions,
    ) -> AssetHandle {
        let key = generic_key(kind, dimensions);
        if let Some(handle) = state.entries.get(&key) {
            return handle.clone();
        }

        state.stats.probes += 1;
        let handle = self
            .store
            .probe(&key)
            .map(AssetHandle::Asset)
            .unwrap_or(AssetHandle::Missing);
        state.entries.insert(key, handle.clone());
        handle
    }

    /// Forget every memoized result and reset statistics.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = CacheState::default();
    }

    /// Number of memoized keys, generic fallbacks included.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stats
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(store: MemoryAssetStore) -> AssetResolutionCache<MemoryAssetStore> {
        AssetResolutionCache::new(store)
    }

    #[test]
    fn key_sanitizing() {
        assert_eq!(resolution_key("Brass Orrery"), "Brass_Orrery");
        assert_eq!(resolution_key("King's \"Crown\" (Replica)"), "Kings_Crown_Replica");
        assert_eq!(resolution_key("Mk.II/Left-Arm\\B"), "Mk_II_Left_Arm_B");
        assert_eq!(resolution_key("What?! [a]{b}: c; d,e"), "What_ab_c_de");
        assert_eq!(resolution_key(""), "");
    }

    #[test]
    fn exact_hit() {
        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Brass_Orrery"));
        let handle = c.resolve(AssetKind::Sprite, "Brass Orrery", Dimensions::new(2, 2));
        assert_eq!(handle, AssetHandle::Asset("Sprite/Brass_Orrery".to_string()));
    }

    #[test]
    fn second_resolve_is_pure_hit() {
        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Brass_Orrery"));
        c.resolve(AssetKind::Sprite, "Brass Orrery", Dimensions::default());
        c.resolve(AssetKind::Sprite, "Brass Orrery", Dimensions::default());
        assert_eq!(c.store().probe_count(), 1);
        assert_eq!(c.stats().hits, 1);
        assert_eq!(c.stats().misses, 1);
    }

    #[test]
    fn generic_fallback_wins_when_exact_missing() {
        let c = cache(MemoryAssetStore::new().with_asset("Prefab/Generic_2x3"));
        let handle = c.resolve(AssetKind::Prefab, "Totem Pole", Dimensions::new(2, 3));
        assert_eq!(handle, AssetHandle::Asset("Prefab/Generic_2x3".to_string()));
    }

    #[test]
    fn exact_beats_generic() {
        let c = cache(
            MemoryAssetStore::new()
                .with_asset("Prefab/Totem_Pole")
                .with_asset("Prefab/Generic_2x3"),
        );
        let handle = c.resolve(AssetKind::Prefab, "Totem Pole", Dimensions::new(2, 3));
        assert_eq!(handle.location(), Some("Prefab/Totem_Pole"));
    }

    #[test]
    fn sentinel_when_nothing_found() {
        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Generic_1x1"));
        let handle = c.resolve(AssetKind::Prefab, "Ghost", Dimensions::new(4, 4));
        assert!(handle.is_missing());
        assert_eq!(handle.location(), None);
    }

    #[test]
    fn negative_result_is_memoized() {
        let c = cache(MemoryAssetStore::new());
        assert!(c.resolve(AssetKind::Sprite, "Ghost", Dimensions::default()).is_missing());
        let probes = c.store().probe_count();
        assert!(c.resolve(AssetKind::Sprite, "Ghost", Dimensions::default()).is_missing());
        assert_eq!(c.store().probe_count(), probes);
    }

    #[test]
    fn generic_probe_shared_between_identifiers() {
        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Generic_1x1"));
        c.resolve(AssetKind::Sprite, "Lamp", Dimensions::default());
        assert_eq!(c.store().probe_count(), 2);
        c.resolve(AssetKind::Sprite, "Vase", Dimensions::default());
        // Only the primary probe; the generic result is already memoized.
        assert_eq!(c.store().probe_count(), 3);
    }

    #[test]
    fn kinds_are_cached_separately() {
        let c = cache(
            MemoryAssetStore::new()
                .with_asset("Sprite/Lamp")
                .with_asset("Prefab/Generic_1x1"),
        );
        let sprite = c.resolve(AssetKind::Sprite, "Lamp", Dimensions::default());
        let prefab = c.resolve(AssetKind::Prefab, "Lamp", Dimensions::default());
        assert_eq!(sprite.location(), Some("Sprite/Lamp"));
        assert_eq!(prefab.location(), Some("Prefab/Generic_1x1"));
    }

    #[test]
    fn empty_identifier_skips_primary_probe() {
        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Generic_1x1"));
        let handle = c.resolve(AssetKind::Sprite, "", Dimensions::default());
        assert_eq!(handle.location(), Some("Sprite/Generic_1x1"));
        assert_eq!(c.store().probe_count(), 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Lamp"));
        c.resolve(AssetKind::Sprite, "Lamp", Dimensions::default());
        assert_eq!(c.len(), 1);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.stats(), CacheStats::default());
        c.resolve(AssetKind::Sprite, "Lamp", Dimensions::default());
        assert_eq!(c.store().probe_count(), 2);
    }

    #[test]
    fn concurrent_callers_probe_once() {
        let c = Arc::new(cache(MemoryAssetStore::new().with_asset("Sprite/Lamp")));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || c.resolve(AssetKind::Sprite, "Lamp", Dimensions::default()))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().location(), Some("Sprite/Lamp"));
        }
        assert_eq!(c.store().probe_count(), 1);
    }

    #[test]
    fn sentinel_warning_logged_once_per_key() {
        let c = cache(MemoryAssetStore::new());
        let warnings = crate::core::log_capture::warnings_during(|| {
            for _ in 0..3 {
                c.resolve(AssetKind::Sprite, "Ghost", Dimensions::default());
            }
            c.resolve(AssetKind::Sprite, "Other", Dimensions::default());
        });
        let sentinel: Vec<_> = warnings
            .iter()
            .filter(|line| line.contains("missing sentinel"))
            .collect();
        assert_eq!(sentinel.len(), 2, "{:?}", warnings);
        assert!(sentinel[0].contains("Sprite/Ghost"));
        assert!(sentinel[1].contains("Sprite/Other"));
    }

    #[test]
    fn fallback_hit_is_not_a_warning() {
        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Generic_1x1"));
        let warnings = crate::core::log_capture::warnings_during(|| {
            c.resolve(AssetKind::Sprite, "Lamp", Dimensions::default());
        });
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn exhibit_named_like_generic_key_shares_its_entry() {
        let c = cache(
            MemoryAssetStore::new()
                .with_asset("Sprite/Generic_1x1")
                .with_asset("Sprite/Generic_2x3"),
        );
        // Memoized under Sprite/Generic_2x3 with the store's 2x3 asset.
        let named = c.resolve(AssetKind::Sprite, "Generic 2x3", Dimensions::default());
        assert_eq!(named.location(), Some("Sprite/Generic_2x3"));

        let c = cache(MemoryAssetStore::new().with_asset("Sprite/Generic_1x1"));
        // No 2x3 asset: the 1x1 fallback is memoized under Sprite/Generic_2x3...
        let named = c.resolve(AssetKind::Sprite, "Generic 2x3", Dimensions::default());
        assert_eq!(named.location(), Some("Sprite/Generic_1x1"));
        // ...and a later 2x3 exhibit reuses that first result.
        let totem = c.resolve(AssetKind::Sprite, "Totem", Dimensions::new(2, 3));
        assert_eq!(totem.location(), Some("Sprite/Generic_1x1"));
    }

    #[test]
    fn directory_store_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Sprite")).unwrap();
        std::fs::write(dir.path().join("Sprite/Lamp.png"), b"png").unwrap();

        let store = DirectoryAssetStore::new(dir.path(), vec!["ron".to_string(), "png".to_string()]);
        let found = store.probe("Sprite/Lamp").unwrap();
        assert!(found.ends_with("Lamp.png"));
        assert!(store.probe("Sprite/Vase").is_none());
    }
}
