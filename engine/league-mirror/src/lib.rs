//! League Mirror
//!
//! Copies every table of a league statistics page into a Google Sheets
//! spreadsheet. A run authenticates, resets the spreadsheet to a single empty
//! worksheet, fetches the page and exports each table to its own worksheet.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::MirrorConfig;
pub use error::{MirrorError, TableExportError};
pub use logging::initialize_logging;
pub use pipeline::{
    authenticate, export_tables, fetch_page, reset_sheets, run, ExportSummary, TableFailure,
};
