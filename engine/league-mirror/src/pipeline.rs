//! The four stages of a mirror run: authenticate, reset, fetch, export

use chrono::Local;
use scraper::{ElementRef, Html};
use sheets_client::{SheetsError, SpreadsheetApi, SpreadsheetConnector, Worksheet};
use stats_scraper::{extract_table, table_elements, ExtractError, ExtractedTable, PageSource};
use tracing::{error, info, warn};

use crate::config::MirrorConfig;
use crate::error::{MirrorError, TableExportError};

/// Minimum row count of a newly added worksheet
pub const MIN_ROWS: u32 = 100;

/// Minimum column count of a newly added worksheet
pub const MIN_COLS: u32 = 20;

/// Rows shown in the console preview of each table
const PREVIEW_ROWS: usize = 5;

/// A table that could not be exported
#[derive(Debug)]
pub struct TableFailure {
    /// Worksheet title, or the best name available for the table
    pub table: String,
    pub error: TableExportError,
}

/// Outcome of the export stage
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Titles of the worksheets written, in document order
    pub exported: Vec<String>,
    pub failed: Vec<TableFailure>,
}

/// Open the target spreadsheet and give it the configured title
pub async fn authenticate(
    config: &MirrorConfig,
    connector: &dyn SpreadsheetConnector,
) -> Result<Box<dyn SpreadsheetApi>, MirrorError> {
    let opened = async {
        let sheet = connector.open(&config.credentials_file, &config.spreadsheet_id).await?;
        sheet.update_title(&config.spreadsheet_title).await?;
        Ok::<_, SheetsError>(sheet)
    }
    .await;

    match opened {
        Ok(sheet) => {
            info!("Authenticated with Google Sheets.");
            Ok(sheet)
        }
        Err(e) => {
            error!("Authentication failed: {}", e);
            Err(MirrorError::Authentication(e))
        }
    }
}

/// Delete every worksheet but the first and clear the first.
///
/// Returns the remaining, empty worksheet.
pub async fn reset_sheets(sheet: &dyn SpreadsheetApi) -> Result<Worksheet, MirrorError> {
    let reset = async {
        let worksheets = sheet.worksheets().await?;
        for worksheet in worksheets.iter().skip(1) {
            sheet.delete_worksheet(worksheet).await?;
        }

        let first = sheet.get_worksheet(0).await?;
        sheet.clear_worksheet(&first).await?;
        Ok::<_, SheetsError>(first)
    }
    .await;

    match reset {
        Ok(first) => {
            info!("Google Sheet reset complete.");
            Ok(first)
        }
        Err(e) => {
            error!("Reset sheet error: {}", e);
            Err(MirrorError::Reset(e))
        }
    }
}

/// Retrieve the page and parse it into a document
pub async fn fetch_page(url: &str, source: &dyn PageSource) -> Result<Html, MirrorError> {
    match source.fetch_html(url).await {
        Ok(html) => {
            let document = Html::parse_document(&html);
            info!("Page scraped successfully.");
            Ok(document)
        }
        Err(e) => {
            error!("Scrape failed: {:#}", e);
            Err(MirrorError::Fetch { url: url.to_string(), source: e.into() })
        }
    }
}

/// Write every table of the document to its own worksheet.
///
/// A table that fails is logged and skipped; only failing to enumerate the
/// tables at all is an error.
pub async fn export_tables(
    document: &Html,
    sheet: &dyn SpreadsheetApi,
) -> Result<ExportSummary, MirrorError> {
    let tables = table_elements(document).map_err(|e| {
        error!("Export failed: {}", e);
        MirrorError::Export(e)
    })?;

    let mut summary = ExportSummary::default();
    for (position, element) in tables.into_iter().enumerate() {
        match export_table(element, position, sheet).await {
            Ok(title) => {
                info!("Exported: {}", title);
                summary.exported.push(title);
            }
            Err(failure) => {
                error!("Error in table '{}': {}", failure.table, failure.error);
                summary.failed.push(failure);
            }
        }
    }

    Ok(summary)
}

/// Run the whole pipeline once
pub async fn run(
    config: &MirrorConfig,
    connector: &dyn SpreadsheetConnector,
    source: &dyn PageSource,
) -> Result<ExportSummary, MirrorError> {
    let sheet = authenticate(config, connector).await?;
    reset_sheets(sheet.as_ref()).await?;
    let document = fetch_page(&config.source_url, source).await?;
    export_tables(&document, sheet.as_ref()).await
}

async fn export_table(
    element: ElementRef<'_>,
    position: usize,
    sheet: &dyn SpreadsheetApi,
) -> Result<String, TableFailure> {
    let mut table = extract_table(element).map_err(|e| TableFailure {
        table: failure_label(&e, position),
        error: e.into(),
    })?;

    let title = table.worksheet_title();
    table.stamp(Local::now());

    println!("\nPreview of '{}':", title);
    println!("{}", table.preview(PREVIEW_ROWS));

    write_table(sheet, &title, &table)
        .await
        .map_err(|e| TableFailure { table: title.clone(), error: e.into() })?;

    Ok(title)
}

/// Name to log for a table that could not be extracted
fn failure_label(error: &ExtractError, position: usize) -> String {
    match error {
        ExtractError::MissingCaption { table_id: Some(id) } => id.clone(),
        ExtractError::MissingId { caption } => caption.clone(),
        ExtractError::Empty(id) => id.clone(),
        _ => format!("table #{}", position + 1),
    }
}

/// Clear-and-reuse or create the worksheet, then write header and rows from A1
async fn write_table(
    sheet: &dyn SpreadsheetApi,
    title: &str,
    table: &ExtractedTable,
) -> Result<(), SheetsError> {
    let (rows, cols) = table.dimensions();

    let (worksheet, created) = match sheet.worksheet(title).await? {
        Some(existing) => {
            sheet.clear_worksheet(&existing).await?;
            let worksheet = if existing.fits(rows, cols) {
                existing
            } else {
                let grown_rows = rows.max(existing.row_count);
                let grown_cols = cols.max(existing.column_count);
                sheet.resize_worksheet(&existing, grown_rows, grown_cols).await?
            };
            (worksheet, false)
        }
        None => (sheet.add_worksheet(title, rows.max(MIN_ROWS), cols.max(MIN_COLS)).await?, true),
    };

    if let Err(e) = sheet.write_rows(&worksheet, &table.to_grid()).await {
        // A failed table must not leave a new worksheet behind.
        if created {
            if let Err(cleanup) = sheet.delete_worksheet(&worksheet).await {
                warn!("Could not remove worksheet '{}': {}", title, cleanup);
            }
        }
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_label() {
        let missing_caption = ExtractError::MissingCaption { table_id: Some("stats_keeper".into()) };
        assert_eq!(failure_label(&missing_caption, 0), "stats_keeper");

        let anonymous = ExtractError::MissingCaption { table_id: None };
        assert_eq!(failure_label(&anonymous, 2), "table #3");

        let missing_id = ExtractError::MissingId { caption: "Squad Goalkeeping".into() };
        assert_eq!(failure_label(&missing_id, 0), "Squad Goalkeeping");
    }
}
