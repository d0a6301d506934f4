// Command-line entry point: imports source files into one dataset.
use anyhow::{Context, Result};
use clap::Parser;
use engine::config::settings::EngineSettings;
use engine::data::dataset::SalesDataset;
use engine::services::SalesService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "sales-engine",
    version,
    about = "Import sales records from spreadsheet, CSV and JSON files"
)]
struct Cli {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the resulting dataset as JSON on stdout
    #[arg(long)]
    print: bool,

    /// Files to import, in order (.xlsx, .xls, .csv, .json)
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => EngineSettings::default(),
    };

    // Logs go to stderr so --print output stays clean.
    tracing_subscriber::fmt()
        .with_max_level(settings.max_log_level()?)
        .with_writer(std::io::stderr)
        .init();

    info!(files = cli.files.len(), "Starting sales import");

    let dataset = Arc::new(RwLock::new(SalesDataset::new()));
    let service = SalesService::new(dataset, &settings);

    let mut failures = 0;
    for path in &cli.files {
        match service.ingest_file(path).await {
            Ok(report) => info!(path = %path.display(), "{}", report.summary()),
            Err(e) if e.is_structural() => {
                failures += 1;
                error!(path = %path.display(), "0 records imported: {}", e);
            }
            Err(e) => {
                failures += 1;
                error!(path = %path.display(), "Import rejected: {}", e);
            }
        }
    }

    if cli.print {
        let records = service.snapshot().await;
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    if failures == cli.files.len() {
        anyhow::bail!("None of the {} file(s) could be imported", failures);
    }
    Ok(())
}
