//! Catalogue Linter: checks an exhibit CSV for rows and values the game
//! would silently drop or default.
//!
//! Usage: catalogue_linter <catalogue.csv> [--assets <dir>]

use exhibit_catalogue::core::assets::{
    resolution_key, AssetKind, AssetResolutionCache, AssetStore, DirectoryAssetStore,
};
use exhibit_catalogue::core::convert::convert;
use exhibit_catalogue::core::csv::parse_line;
use exhibit_catalogue::core::pipeline::PipelineConfig;
use exhibit_catalogue::schema::descriptor::{Rarity, Tag};
use exhibit_catalogue::schema::record::{ContentRecord, REQUIRED_FIELDS};
use std::path::Path;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalogue_linter <catalogue.csv> [--assets <dir>]");
        process::exit(0);
    }

    let csv_path = Path::new(&args[1]);
    let mut assets_dir = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--assets" && i + 1 < args.len() {
            i += 1;
            assets_dir = Some(args[i].clone());
        }
        i += 1;
    }

    let text = match std::fs::read_to_string(csv_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("ERROR: Failed to read '{}': {}", csv_path.display(), e);
            process::exit(1);
        }
    };

    let (records, errors, mut warnings) = lint_rows(&text);
    println!("Parsed {} exhibits", records.len());

    if let Some(dir) = assets_dir {
        warnings.extend(lint_assets(&records, &dir));
    }

    println!("\n=== Catalogue Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_rows(text: &str) -> (Vec<ContentRecord>, Vec<String>, Vec<String>) {
    let mut records = Vec::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Line numbers are 1-based; line 1 is the header.
    for (index, raw) in text.split('\n').enumerate().skip(1) {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields = parse_line(line);
        let Some(record) = ContentRecord::from_fields(&fields) else {
            errors.push(format!(
                "line {}: {} fields, need at least {}; row is dropped",
                line_no,
                fields.len(),
                REQUIRED_FIELDS
            ));
            continue;
        };

        if Rarity::lookup(&record.rarity).is_none() {
            warnings.push(format!(
                "line {}: '{}' has unknown rarity '{}', treated as Common",
                line_no, record.name, record.rarity
            ));
        }

        for token in record.theme.split(',').map(str::trim) {
            if !token.is_empty() && Tag::lookup(token).is_none() {
                warnings.push(format!(
                    "line {}: '{}' has unknown theme '{}', ignored",
                    line_no, record.name, token
                ));
            }
        }

        let dimensions = convert(&record).dimensions;
        if dimensions.to_string() != record.size {
            warnings.push(format!(
                "line {}: '{}' has size '{}', treated as {}",
                line_no, record.name, record.size, dimensions
            ));
        }

        let numeric = [
            ("Enjoyment", 4),
            ("Popularity", 5),
            ("Artist Effort", 7),
            ("VFX Effort", 8),
        ];
        for (column, idx) in numeric {
            if let Some(value) = fields.get(idx) {
                if !value.is_empty() && value.parse::<i32>().is_err() {
                    warnings.push(format!(
                        "line {}: '{}' has non-numeric {} '{}', treated as 0",
                        line_no, record.name, column, value
                    ));
                }
            }
        }

        records.push(record);
    }

    (records, errors, warnings)
}

fn lint_assets(records: &[ContentRecord], dir: &str) -> Vec<String> {
    let store = DirectoryAssetStore::new(dir, PipelineConfig::default().asset_extensions);
    let cache = AssetResolutionCache::new(store);
    let mut warnings = Vec::new();

    for record in records {
        let descriptor = convert(record);
        for kind in [AssetKind::Sprite, AssetKind::Prefab] {
            let key = format!("{}/{}", kind, resolution_key(&descriptor.display_name));
            if cache.store().probe(&key).is_some() {
                continue;
            }

            let handle = cache.resolve(kind, &descriptor.display_name, descriptor.dimensions);
            match handle.location() {
                Some(location) => warnings.push(format!(
                    "'{}': no {} at {}, using fallback {}",
                    descriptor.display_name, kind, key, location
                )),
                None => warnings.push(format!(
                    "'{}': no {} at {} and no {} fallback, using missing sentinel",
                    descriptor.display_name, kind, key, descriptor.dimensions
                )),
            }
        }
    }

    warnings
}
