use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use video_guides::admin::{AppendOutcome, CatalogAdmin, ManualEntry};
use video_guides::catalog::{CatalogCache, CatalogLoader};
use video_guides::display::render_card;
use video_guides::{Config, YouTubeClient};

#[derive(Parser)]
#[command(name = "video-guides")]
#[command(version, about = "Browse and maintain the instructional video library")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data file (overrides config and VIDEO_GUIDES_DATA_FILE)
    #[arg(short = 'f', long, global = true)]
    data_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List videos, optionally filtered
    List {
        /// Category to show (defaults to the configured "all" label)
        #[arg(short, long)]
        category: Option<String>,
        /// Case-insensitive search over title, description and tags
        #[arg(short, long, default_value = "")]
        query: String,
        /// Show full descriptions
        #[arg(long)]
        full: bool,
    },
    /// List category names
    Categories,
    /// Add a YouTube video, fetching its details
    Add {
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        url: String,
    },
    /// Add a video with hand-entered details
    AddManual {
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        url: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// e.g. 05:30
        #[arg(long, default_value = "")]
        duration: String,
        /// Comma separated
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Show every entry of the data file by category
    AdminList,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "video_guides=debug,info"
    } else {
        "video_guides=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::load().context("loading configuration")?;
    if let Some(data_file) = cli.data_file {
        config.catalog.data_file = data_file;
    }
    config.validate().context("validating configuration")?;
    info!("{}", config.summary());

    match cli.command {
        Commands::List { category, query, full } => {
            let loader = CatalogLoader::from_config(&config)?;
            let cache = CatalogCache::install(CatalogCache::new(loader, config.catalog.data_file.clone()))?;
            let catalog = cache.init().await;

            if let Some(warning) = catalog.version_warning(&config.catalog.supported_version) {
                warn!("⚠️ {}", warning);
            }

            let all_label = &config.catalog.all_label;
            let category = category.unwrap_or_else(|| all_label.clone());
            let videos = catalog.filter_with_all(all_label, &category, &query);
            if videos.is_empty() {
                println!("No videos found matching your criteria.");
            }
            for video in videos {
                println!("{}", render_card(video, full));
            }
        }

        Commands::Categories => {
            let catalog = CatalogLoader::from_config(&config)?
                .load_file(&config.catalog.data_file)
                .await
                .catalog;
            println!("{}", config.catalog.all_label);
            for category in catalog.categories() {
                println!("{}", category);
            }
        }

        Commands::Add { category, url } => {
            let admin = admin_for(&config)?;
            match admin.add_from_url(&category, &url).await? {
                AppendOutcome::Added(entry) => {
                    println!(
                        "Added '{}' to {}",
                        entry.title.unwrap_or_default(),
                        category
                    );
                }
                AppendOutcome::NeedsManualEntry(reason) => {
                    warn!("Could not fetch details automatically: {:?}", reason);
                    println!("Manual Entry Mode: re-run with `add-manual` and fill in the details.");
                }
            }
        }

        Commands::AddManual {
            category,
            url,
            title,
            description,
            duration,
            tags,
        } => {
            let admin = admin_for(&config)?;
            let entry = admin
                .add_manual(
                    &category,
                    ManualEntry {
                        title,
                        url,
                        description,
                        duration,
                        tags,
                    },
                )
                .await?;
            println!("Added '{}' to {}", entry.title.unwrap_or_default(), category);
        }

        Commands::AdminList => {
            let admin = admin_for(&config)?;
            for (category, rows) in admin.listing().await? {
                println!("### {}", category);
                for row in rows {
                    println!("- **{}** | {} | {}", row.title, row.url, row.duration);
                }
            }
        }
    }

    Ok(())
}

fn admin_for(config: &Config) -> Result<CatalogAdmin> {
    let admin = CatalogAdmin::new(config.catalog.data_file.clone());
    Ok(match config.youtube.credential() {
        Some(key) => admin.with_fetcher(
            Arc::new(YouTubeClient::new(&config.youtube)?),
            Some(key.to_string()),
        ),
        None => admin,
    })
}
