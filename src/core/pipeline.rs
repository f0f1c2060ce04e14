//! The content pipeline: catalogue ownership, reload, and asset lookup.
//!
//! Presentation code talks to [`ContentPipeline`] only through
//! `catalogue()` and `resolve_asset()`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::assets::{
    AssetHandle, AssetKind, AssetResolutionCache, AssetStore, DirectoryAssetStore,
    MemoryAssetStore,
};
use crate::core::catalogue::Catalogue;
use crate::core::loader;
use crate::schema::descriptor::ContentDescriptor;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// File-based pipeline settings, read from RON.
///
/// ```ron
/// (
///     catalogue_path: Some("data/exhibits.csv"),
///     asset_root: Some("assets/exhibits"),
///     asset_extensions: ["png", "prefab"],
///     seed: 42,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub catalogue_path: Option<String>,
    pub asset_root: Option<String>,
    pub asset_extensions: Vec<String>,
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalogue_path: None,
            asset_root: None,
            asset_extensions: vec!["png".to_string(), "prefab".to_string(), "ron".to_string()],
            seed: 0,
        }
    }
}

impl PipelineConfig {
    pub fn load_from_ron(path: &Path) -> Result<PipelineConfig, PipelineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<PipelineConfig, PipelineError> {
        Ok(ron::from_str(input)?)
    }
}

/// Where the catalogue comes from on (re)load.
#[derive(Debug, Clone)]
enum CatalogueSource {
    File(PathBuf),
    Text(String),
    None,
}

/// Owns the catalogue and the asset cache. Built via
/// `ContentPipeline::builder()`.
pub struct ContentPipeline {
    source: CatalogueSource,
    catalogue: Catalogue,
    assets: AssetResolutionCache<Arc<dyn AssetStore>>,
    seed: u64,
    draw_count: u64,
}

/// Builder for constructing a `ContentPipeline`.
pub struct ContentPipelineBuilder {
    config_path: Option<PathBuf>,
    catalogue_path: Option<PathBuf>,
    asset_root: Option<PathBuf>,
    seed: Option<u64>,
    /// Directly provided catalogue text (for testing without files).
    catalogue_text: Option<String>,
    /// Directly provided asset store (for testing without files).
    asset_store: Option<Arc<dyn AssetStore>>,
}

impl ContentPipeline {
    pub fn builder() -> ContentPipelineBuilder {
        ContentPipelineBuilder {
            config_path: None,
            catalogue_path: None,
            asset_root: None,
            seed: None,
            catalogue_text: None,
            asset_store: None,
        }
    }

    /// The current catalogue. Stable until the next [`reload`](Self::reload).
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Resolve the asset for a catalogue entry.
    pub fn resolve_asset(&self, kind: AssetKind, descriptor: &ContentDescriptor) -> AssetHandle {
        self.assets
            .resolve(kind, &descriptor.display_name, descriptor.dimensions)
    }

    pub fn sprite(&self, descriptor: &ContentDescriptor) -> AssetHandle {
        self.resolve_asset(AssetKind::Sprite, descriptor)
    }

    pub fn prefab(&self, descriptor: &ContentDescriptor) -> AssetHandle {
        self.resolve_asset(AssetKind::Prefab, descriptor)
    }

    pub fn asset_cache(&self) -> &AssetResolutionCache<Arc<dyn AssetStore>> {
        &self.assets
    }

    /// Re-read the catalogue source and replace the catalogue. Clears the
    /// asset cache so changed assets are picked up.
    pub fn reload(&mut self) {
        self.catalogue = read_catalogue(&self.source);
        self.assets.clear();
        debug!(entries = self.catalogue.len(), "Catalogue reloaded, asset cache cleared");
    }

    /// Draw up to `count` distinct exhibits. Successive draws differ;
    /// the sequence is fixed by the configured seed.
    pub fn draw_offer(&mut self, count: usize) -> Vec<ContentDescriptor> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.draw_count));
        self.draw_count += 1;
        self.catalogue
            .draw_offer(count, &mut rng)
            .into_iter()
            .cloned()
            .collect()
    }
}

fn read_catalogue(source: &CatalogueSource) -> Catalogue {
    let records = match source {
        CatalogueSource::File(path) => loader::load_file(path),
        CatalogueSource::Text(text) => loader::load(text),
        CatalogueSource::None => {
            warn!("No catalogue source configured, using empty catalogue");
            Vec::new()
        }
    };
    let catalogue = Catalogue::from_records(&records);
    info!(records = records.len(), entries = catalogue.len(), "Catalogue loaded");
    catalogue
}

impl ContentPipelineBuilder {
    /// Read settings from a RON config file. Explicit builder settings
    /// take precedence.
    pub fn config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn catalogue_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalogue_path = Some(path.into());
        self
    }

    pub fn asset_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(path.into());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_catalogue_text(mut self, text: impl Into<String>) -> Self {
        self.catalogue_text = Some(text.into());
        self
    }

    pub fn with_asset_store(mut self, store: Arc<dyn AssetStore>) -> Self {
        self.asset_store = Some(store);
        self
    }

    /// Build the pipeline and load the catalogue. Fails only when a
    /// config file was given and cannot be read or parsed.
    pub fn build(self) -> Result<ContentPipeline, PipelineError> {
        let config = match &self.config_path {
            Some(path) => PipelineConfig::load_from_ron(path)?,
            None => PipelineConfig::default(),
        };

        let source = if let Some(text) = self.catalogue_text {
            CatalogueSource::Text(text)
        } else if let Some(path) = self
            .catalogue_path
            .or_else(|| config.catalogue_path.clone().map(PathBuf::from))
        {
            CatalogueSource::File(path)
        } else {
            CatalogueSource::None
        };

        let store: Arc<dyn AssetStore> = if let Some(store) = self.asset_store {
            store
        } else if let Some(root) = self
            .asset_root
            .or_else(|| config.asset_root.clone().map(PathBuf::from))
        {
            Arc::new(DirectoryAssetStore::new(root, config.asset_extensions.clone()))
        } else {
            debug!("No asset root configured, every lookup resolves to the missing sentinel");
            Arc::new(MemoryAssetStore::new())
        };

        let catalogue = read_catalogue(&source);

        Ok(ContentPipeline {
            source,
            catalogue,
            assets: AssetResolutionCache::new(store),
            seed: self.seed.unwrap_or(config.seed),
            draw_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Name,Theme,Size,Rarity\nLamp,Light,1x1,Common\nTotem,Beast,2x3,Rare\n";

    #[test]
    fn config_defaults() {
        let config = PipelineConfig::parse_ron("(seed: 0)").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.asset_extensions, vec!["png", "prefab", "ron"]);
    }

    #[test]
    fn config_fields() {
        let config = PipelineConfig::parse_ron(
            r#"(catalogue_path: Some("a.csv"), asset_root: Some("assets"), asset_extensions: ["webp"], seed: 9)"#,
        )
        .unwrap();
        assert_eq!(config.catalogue_path.as_deref(), Some("a.csv"));
        assert_eq!(config.asset_root.as_deref(), Some("assets"));
        assert_eq!(config.asset_extensions, vec!["webp"]);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn bad_config_is_an_error() {
        assert!(matches!(
            PipelineConfig::parse_ron("(seed: \"nine\")"),
            Err(PipelineError::Ron(_))
        ));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = ContentPipeline::builder()
            .config("does/not/exist.ron")
            .build();
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[test]
    fn no_source_gives_empty_catalogue() {
        let pipeline = ContentPipeline::builder().build().unwrap();
        assert!(pipeline.catalogue().is_empty());
    }

    #[test]
    fn no_source_logs_warning() {
        let warnings = crate::core::log_capture::warnings_during(|| {
            ContentPipeline::builder().build().unwrap();
        });
        assert_eq!(warnings.len(), 1, "{:?}", warnings);
        assert!(warnings[0].contains("No catalogue source configured"));
    }

    #[test]
    fn resolve_through_pipeline() {
        let store = Arc::new(
            MemoryAssetStore::new()
                .with_asset("Sprite/Lamp")
                .with_asset("Prefab/Generic_2x3"),
        );
        let pipeline = ContentPipeline::builder()
            .with_catalogue_text(TEXT)
            .with_asset_store(store.clone())
            .build()
            .unwrap();

        let lamp = pipeline.catalogue().get(0).unwrap();
        let totem = pipeline.catalogue().get(1).unwrap();
        assert_eq!(pipeline.sprite(lamp).location(), Some("Sprite/Lamp"));
        assert_eq!(pipeline.prefab(totem).location(), Some("Prefab/Generic_2x3"));
        assert!(pipeline.sprite(totem).is_missing());
    }

    #[test]
    fn reload_clears_cache() {
        let pipeline_store = Arc::new(MemoryAssetStore::new().with_asset("Sprite/Lamp"));
        let mut pipeline = ContentPipeline::builder()
            .with_catalogue_text(TEXT)
            .with_asset_store(pipeline_store.clone())
            .build()
            .unwrap();

        let lamp = pipeline.catalogue().get(0).unwrap().clone();
        pipeline.sprite(&lamp);
        pipeline.sprite(&lamp);
        assert_eq!(pipeline_store.probe_count(), 1);

        pipeline.reload();
        assert_eq!(pipeline.catalogue().len(), 2);
        assert!(pipeline.asset_cache().is_empty());
        pipeline.sprite(&lamp);
        assert_eq!(pipeline_store.probe_count(), 2);
    }

    #[test]
    fn draw_offer_sequence_fixed_by_seed() {
        let build = || {
            ContentPipeline::builder()
                .with_catalogue_text(TEXT)
                .seed(3)
                .build()
                .unwrap()
        };
        let mut a = build();
        let mut b = build();
        for _ in 0..4 {
            assert_eq!(a.draw_offer(1), b.draw_offer(1));
        }
        assert_eq!(a.draw_offer(5).len(), 2);
    }
}
