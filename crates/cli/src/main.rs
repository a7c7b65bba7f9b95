//! CropFreq CLI - zonal crop frequency statistics

use anyhow::{Context, Result};
use clap::Parser;
use cropfreq_analysis::{AnalysisConfig, Analyzer, DirectorySource};
use cropfreq_core::Crs;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cropfreq")]
#[command(author, version, about = "Crop frequency zonal statistics", long_about = None)]
struct Cli {
    /// Directory containing the category raster datasets
    #[arg(short, long, default_value = "db")]
    db: PathBuf,

    /// AOI GeoJSON file ("-" reads stdin)
    #[arg(short, long)]
    aoi: PathBuf,

    /// CRS of the AOI coordinates
    #[arg(long, default_value = "EPSG:4326")]
    crs: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_payload(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("Failed to read AOI from stdin")?;
        return Ok(payload);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read AOI file {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let payload = read_payload(&cli.aoi)?;
    let request_crs = Crs::from_user_input(&cli.crs).context("Invalid --crs value")?;

    let analyzer = Analyzer::new(
        DirectorySource::new(&cli.db),
        AnalysisConfig { request_crs },
    );

    let started = Instant::now();
    let pb = spinner("Analyzing crop frequencies...");
    let response = analyzer
        .analyze(&payload)
        .context("Crop frequency analysis failed")?;
    pb.finish_and_clear();

    info!(
        "Analyzed {} datasets in {:.2?}",
        response.len(),
        started.elapsed()
    );

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
