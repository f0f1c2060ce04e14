//! Catalogue Normalizer: reads an exhibit CSV and writes it back in
//! canonical form (standard header, minimal quoting, dropped rows removed).
//!
//! Usage: catalogue_normalize --input <in.csv> --output <out.csv>

use exhibit_catalogue::core::loader;
use std::env;
use std::path::Path;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "Usage: catalogue_normalize --input <in.csv> --output <out.csv>";

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut input = None;
    let mut output = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" if i + 1 < args.len() => {
                i += 1;
                input = Some(args[i].clone());
            }
            "--output" if i + 1 < args.len() => {
                i += 1;
                output = Some(args[i].clone());
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (Some(input_path), Some(output_path)) = (input, output) else {
        eprintln!("Error: --input and --output are required");
        eprintln!("{}", USAGE);
        process::exit(1);
    };

    if !Path::new(&input_path).is_file() {
        eprintln!("Error: input file '{}' does not exist", input_path);
        process::exit(1);
    }

    let records = loader::load_file(Path::new(&input_path));
    println!("Read {} exhibits from '{}'", records.len(), input_path);

    if let Err(e) = loader::save_file(Path::new(&output_path), &records) {
        eprintln!("Error writing '{}': {}", output_path, e);
        process::exit(1);
    }

    println!("Catalogue written to '{}'", output_path);
}
