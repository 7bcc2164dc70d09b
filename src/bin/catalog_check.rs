use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use video_guides::catalog::{CatalogLoader, EntryStatus};
use video_guides::Config;

#[derive(Parser)]
#[command(name = "catalog-check")]
#[command(about = "Load the video data file and report what happened to every entry")]
struct Cli {
    /// Data file to check (defaults to the configured one)
    data_file: Option<PathBuf>,

    /// Skip YouTube enrichment even when an API key is configured
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("video_guides=info")
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let data_file = cli.data_file.unwrap_or_else(|| config.catalog.data_file.clone());

    let loader = if cli.offline {
        CatalogLoader::new().with_supported_version(&config.catalog.supported_version)
    } else {
        CatalogLoader::from_config(&config)?
    };

    info!("🔍 Checking {}", data_file.display());
    info!("   - YouTube enrichment: {}", if loader.enrichment_enabled() { "on" } else { "off" });

    let report = loader.load_file(&data_file).await;

    for warning in &report.warnings {
        println!("WARN  {}", warning);
    }

    for outcome in &report.outcomes {
        let id = outcome.id.as_deref().unwrap_or("-");
        let status = match &outcome.status {
            EntryStatus::Loaded => "loaded".to_string(),
            EntryStatus::Enriched => "enriched".to_string(),
            EntryStatus::Provisional(reason) => format!("provisional ({:?})", reason),
            EntryStatus::Skipped(reason) => format!("skipped ({:?})", reason),
        };
        println!("{}[{}] {} {}", outcome.category, outcome.index, id, status);
    }

    let catalog = &report.catalog;
    println!(
        "{} videos, {} categories, {} skipped, {} provisional",
        catalog.len(),
        catalog.categories().len(),
        report.skipped().count(),
        report.provisional().count()
    );

    Ok(())
}
