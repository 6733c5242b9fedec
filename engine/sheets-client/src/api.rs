//! Spreadsheet operations used by the mirror

use async_trait::async_trait;
use std::path::Path;

use crate::error::{Result, SheetsError};

/// One tab of a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    /// Numeric sheet id assigned by the service
    pub sheet_id: i64,
    /// Title, unique within the spreadsheet
    pub title: String,
    /// Position of the tab (0 = first)
    pub index: u32,
    /// Grid rows
    pub row_count: u32,
    /// Grid columns
    pub column_count: u32,
}

impl Worksheet {
    /// Whether the grid can hold `rows` x `cols` values starting at A1
    pub fn fits(&self, rows: u32, cols: u32) -> bool {
        self.row_count >= rows && self.column_count >= cols
    }
}

/// An opened spreadsheet
#[async_trait]
pub trait SpreadsheetApi: Send + Sync {
    /// Rename the spreadsheet
    async fn update_title(&self, title: &str) -> Result<()>;

    /// List worksheets in tab order
    async fn worksheets(&self) -> Result<Vec<Worksheet>>;

    /// Add a worksheet with the given grid size
    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<Worksheet>;

    /// Delete a worksheet
    async fn delete_worksheet(&self, worksheet: &Worksheet) -> Result<()>;

    /// Clear every value of a worksheet, keeping the tab
    async fn clear_worksheet(&self, worksheet: &Worksheet) -> Result<()>;

    /// Change the grid size of a worksheet
    async fn resize_worksheet(&self, worksheet: &Worksheet, rows: u32, cols: u32)
        -> Result<Worksheet>;

    /// Write rows starting at the top-left cell
    async fn write_rows(&self, worksheet: &Worksheet, rows: &[Vec<String>]) -> Result<()>;

    /// Worksheet at the given tab position
    async fn get_worksheet(&self, index: u32) -> Result<Worksheet> {
        self.worksheets()
            .await?
            .into_iter()
            .find(|ws| ws.index == index)
            .ok_or_else(|| SheetsError::WorksheetNotFound(format!("index {index}")))
    }

    /// Worksheet with the given title, if any
    async fn worksheet(&self, title: &str) -> Result<Option<Worksheet>> {
        Ok(self.worksheets().await?.into_iter().find(|ws| ws.title == title))
    }
}

/// Opens spreadsheets on behalf of a set of credentials
#[async_trait]
pub trait SpreadsheetConnector: Send + Sync {
    async fn open(
        &self,
        credentials_file: &Path,
        spreadsheet_id: &str,
    ) -> Result<Box<dyn SpreadsheetApi>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worksheet_fits() {
        let ws = Worksheet {
            sheet_id: 1,
            title: "League Table_results".to_string(),
            index: 0,
            row_count: 100,
            column_count: 20,
        };

        assert!(ws.fits(21, 20));
        assert!(ws.fits(100, 1));
        assert!(!ws.fits(101, 20));
        assert!(!ws.fits(10, 21));
    }
}
