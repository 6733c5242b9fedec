//! Error types for the mirror pipeline

use sheets_client::SheetsError;
use stats_scraper::ExtractError;
use thiserror::Error;

/// Failures that abort a run
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Failed to authenticate with Google Sheets")]
    Authentication(#[source] SheetsError),

    #[error("Failed to reset the spreadsheet")]
    Reset(#[source] SheetsError),

    #[error("Failed to fetch {url}. Check if the URL is accessible or if your internet is working.")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Export failed")]
    Export(#[source] ExtractError),
}

/// Failure of a single table; logged and skipped
#[derive(Error, Debug)]
pub enum TableExportError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Sheets(#[from] SheetsError),
}
