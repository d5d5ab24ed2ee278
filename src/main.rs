mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use eventfeed_core::Converter;
use eventfeed_core::config::EventfeedConfig;
use eventfeed_core::description::DescriptionFormatter;
use eventfeed_core::image::{ImageSearch, NoImages, UnsplashClient};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "eventfeed")]
#[command(about = "Convert an .ics calendar into a tagged JSON event feed")]
struct Cli {
    /// Calendar file to read (.ics)
    source: PathBuf,

    /// JSON file to write ("-" for stdout)
    destination: PathBuf,

    /// Skip the Unsplash image lookup
    #[arg(long)]
    no_images: bool,

    /// Config file (defaults to ~/.config/eventfeed/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log request details
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;

    let cfg = EventfeedConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let tagger = cfg.tagger().context("Invalid tagging configuration")?;

    let access_key = cfg.unsplash.access_key().filter(|_| !cli.no_images);
    match access_key {
        Some(key) => {
            let client = UnsplashClient::new(key, &cfg.unsplash)?;
            run(Converter::new(tagger, DescriptionFormatter, client), &cli.source, &cli.destination).await
        }
        None => {
            if !cli.no_images {
                warn!("No Unsplash access key configured; events will have no images");
            }
            run(Converter::new(tagger, DescriptionFormatter, NoImages), &cli.source, &cli.destination).await
        }
    }
}

async fn run<S: ImageSearch>(converter: Converter<S>, source: &Path, destination: &Path) -> Result<()> {
    let count = converter
        .convert_file(source, destination)
        .await
        .with_context(|| {
            format!(
                "Failed to convert {} to {}",
                source.display(),
                destination.display()
            )
        })?;

    info!("Converted {} events", count);
    Ok(())
}
