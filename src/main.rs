use clap::{Parser, Subcommand};
use tracing::error;

use rbc_scraper::config::Config;
use rbc_scraper::constants;
use rbc_scraper::logging;
use rbc_scraper::pipeline::tasks;

#[derive(Parser)]
#[command(name = "rbc_scraper")]
#[command(about = "Russia border checkpoints data pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a raw snapshot from an upstream source
    Fetch {
        /// Source to fetch. Available: rosgranstroy, kaspiko
        #[arg(long)]
        source: Option<String>,
    },
    /// Normalize a raw snapshot into the canonical checkpoint CSV
    Parse {
        /// Source whose snapshot to normalize
        #[arg(long)]
        source: Option<String>,
    },
    /// Project the canonical CSV into the GeoJSON feature collection
    Geojson,
    /// Run the full pipeline: cleanup, fetch, parse, geojson
    Run {
        /// Source to run the pipeline for
        #[arg(long)]
        source: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Fetch { source } => {
            let source_id = source.unwrap_or_else(|| constants::ROSGRANSTROY_SOURCE.to_string());
            println!("📡 Fetching raw snapshot for {}...", source_id);

            match tasks::fetch_once(&config, &source_id).await {
                Ok(result) => {
                    println!("✅ Snapshot saved to {}", result.snapshot_path.display());
                    if let Some(count) = result.record_count {
                        println!("📦 Records count: {}", count);
                    }
                }
                Err(e) => {
                    error!("Fetch failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Parse { source } => {
            let source_id = source.unwrap_or_else(|| constants::ROSGRANSTROY_SOURCE.to_string());
            println!("🔄 Normalizing {} snapshot...", source_id);

            match tasks::normalize_once(&config, &source_id) {
                Ok(result) => {
                    println!("✅ Parsed {} checkpoints", result.record_count);
                    if result.skipped_branches > 0 {
                        println!("⚠️  Skipped {} malformed branches", result.skipped_branches);
                    }
                    println!("📄 Saved to {}", result.csv_path.display());
                }
                Err(e) => {
                    error!("Normalize failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Geojson => {
            println!("🗺  Building GeoJSON...");

            match tasks::build_geojson_once(&config) {
                Ok(result) => {
                    println!("✅ GeoJSON created: {}", result.geojson_path.display());
                    println!("📍 Features count: {}", result.feature_count);
                    if result.skipped_records > 0 {
                        println!(
                            "⚠️  Excluded {} records without valid coordinates",
                            result.skipped_records
                        );
                    }
                }
                Err(e) => {
                    error!("GeoJSON build failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Run { source } => {
            let source_id = source.unwrap_or_else(|| constants::ROSGRANSTROY_SOURCE.to_string());
            println!("🚀 Running full pipeline for {}...", source_id);

            match tasks::run_full(&config, &source_id).await {
                Ok(result) => {
                    println!("\n📊 Pipeline results for {}:", source_id);
                    println!("   Checkpoints parsed: {}", result.normalize.record_count);
                    println!("   Features emitted:   {}", result.geojson.feature_count);
                    println!("   Without coords:     {}", result.geojson.skipped_records);
                    println!("   Tabular artifact:   {}", result.normalize.csv_path.display());
                    println!("   GeoJSON artifact:   {}", result.geojson.geojson_path.display());
                    println!("\n🏁 Pipeline finished successfully");
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
