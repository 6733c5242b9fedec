//! League Mirror entry point
//!
//! Runs the mirror once: authenticate, reset, fetch, export.

use anyhow::{Context, Result};
use tracing::info;

use league_mirror::{initialize_logging, run, MirrorConfig};
use sheets_client::GoogleConnector;
use stats_scraper::HttpPageSource;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = MirrorConfig::from_env();
    println!(
        "SHEET_ID: {}, CREDENTIALS_FILE: {}",
        config.spreadsheet_id,
        config.credentials_file.display()
    );

    let _log_guard = initialize_logging(&config.history_log)?;

    println!("Starting Premier League stats export process...");
    info!("Starting League Mirror v{}", env!("CARGO_PKG_VERSION"));

    let connector = GoogleConnector::new().context("Failed to create Sheets client")?;
    let source = HttpPageSource::new()?;

    let summary = run(&config, &connector, &source).await?;

    info!(
        "Run finished: {} tables exported, {} failed",
        summary.exported.len(),
        summary.failed.len()
    );
    println!("\nSummary:");
    println!("- Tables exported: {}", summary.exported.len());
    for failure in &summary.failed {
        println!("- Skipped '{}': {}", failure.table, failure.error);
    }

    println!("Premier League data successfully exported to Google Sheets!");
    Ok(())
}
