//! Command line front end: loads a configuration and the database feature
//! files, then prints the most similar database images for each query.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use cbir::core::vector::FeatureFile;
use cbir::{Config, ImageDatabase};

/// Find the database images most similar to one or more query images.
#[derive(Parser, Debug)]
#[command(name = "cbir")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "KD-Tree based content-based image retrieval")]
struct CbirArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "cbir.toml")]
    config: PathBuf,

    /// Feature files (JSON) of the query images
    #[arg(short, long = "query", required = true)]
    queries: Vec<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace); overrides logger_level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(config: &Config, verbose: u8) -> Level {
    match verbose {
        0 => config.logger_level.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> Result<()> {
    let args = CbirArgs::parse();

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("loading configuration from '{}'", args.config.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(log_level(&config, args.verbose))
        .with_writer(std::io::stderr)
        .init();

    let db = ImageDatabase::open(config).context("building the image database")?;
    info!(features = db.feature_count(), "Database ready");

    for query_path in &args.queries {
        let query = FeatureFile::load(query_path)
            .and_then(FeatureFile::into_query_points)
            .with_context(|| format!("reading query features from '{}'", query_path.display()))?;

        let paths = db
            .find_similar_image_paths(&query)
            .with_context(|| format!("ranking images for '{}'", query_path.display()))?;

        println!("Best candidates for - {} are:", query_path.display());
        for path in paths {
            println!("{}", path.display());
        }
    }

    Ok(())
}
