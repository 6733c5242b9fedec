use chrono::{DateTime, Local};

/// Name of the column stamped onto every exported table
pub const LAST_UPDATED_COLUMN: &str = "Last Updated";

/// Format of the `Last Updated` values
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A rectangular dataset extracted from one HTML table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    /// Trimmed `<caption>` text
    pub caption: String,
    /// The table's `id` attribute
    pub table_id: String,
    /// Column labels, flattened if the header had several rows
    pub columns: Vec<String>,
    /// Data rows, each exactly `columns.len()` cells wide
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    /// Title of the worksheet this table is written to
    pub fn worksheet_title(&self) -> String {
        format!("{}_{}", self.caption, self.table_id)
    }

    /// Set the `Last Updated` column to the same value on every row.
    ///
    /// An existing `Last Updated` column is overwritten in place, otherwise
    /// the column is appended.
    pub fn stamp(&mut self, updated_at: DateTime<Local>) {
        let value = updated_at.format(TIMESTAMP_FORMAT).to_string();

        match self.columns.iter().position(|c| c == LAST_UPDATED_COLUMN) {
            Some(col) => {
                for row in &mut self.rows {
                    row[col] = value.clone();
                }
            }
            None => {
                self.columns.push(LAST_UPDATED_COLUMN.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// Header row followed by the data rows
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.columns.clone());
        grid.extend(self.rows.iter().cloned());
        grid
    }

    /// Rows and columns needed to hold the header plus data
    pub fn dimensions(&self) -> (u32, u32) {
        ((self.rows.len() + 1) as u32, self.columns.len() as u32)
    }

    /// Aligned text rendering of the header and the first `limit` rows
    pub fn preview(&self, limit: usize) -> String {
        let shown: Vec<&Vec<String>> = self.rows.iter().take(limit).collect();

        let widths: Vec<usize> = (0..self.columns.len())
            .map(|col| {
                shown
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(self.columns[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![render(self.columns.as_slice())];
        lines.extend(shown.iter().map(|row| render(row.as_slice())));
        if self.rows.len() > limit {
            lines.push(format!("... {} more rows", self.rows.len() - limit));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ExtractedTable {
        ExtractedTable {
            caption: "Regular season Table".to_string(),
            table_id: "results2024-202591_overall".to_string(),
            columns: vec!["Rk".to_string(), "Squad".to_string()],
            rows: vec![
                vec!["1".to_string(), "Liverpool".to_string()],
                vec!["2".to_string(), "Arsenal".to_string()],
            ],
        }
    }

    #[test]
    fn test_worksheet_title() {
        assert_eq!(sample().worksheet_title(), "Regular season Table_results2024-202591_overall");
    }

    #[test]
    fn test_stamp_appends_column() {
        let mut table = sample();
        let at = Local.with_ymd_and_hms(2025, 5, 25, 18, 30, 5).unwrap();
        table.stamp(at);

        assert_eq!(table.columns.last().unwrap(), LAST_UPDATED_COLUMN);
        for row in &table.rows {
            assert_eq!(row.len(), table.columns.len());
            assert_eq!(row.last().unwrap(), "2025-05-25 18:30:05");
        }
    }

    #[test]
    fn test_stamp_overwrites_existing_column() {
        let mut table = ExtractedTable {
            caption: "C".to_string(),
            table_id: "t".to_string(),
            columns: vec!["Squad".to_string(), LAST_UPDATED_COLUMN.to_string()],
            rows: vec![vec!["Arsenal".to_string(), "old".to_string()]],
        };
        let at = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        table.stamp(at);

        assert_eq!(table.columns, vec!["Squad", LAST_UPDATED_COLUMN]);
        assert_eq!(table.rows, vec![vec!["Arsenal", "2025-01-01 00:00:00"]]);
    }

    #[test]
    fn test_grid_and_dimensions() {
        let table = sample();
        let grid = table.to_grid();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["Rk", "Squad"]);
        assert_eq!(table.dimensions(), (3, 2));
    }

    #[test]
    fn test_preview_truncates() {
        let preview = sample().preview(1);
        let lines: Vec<&str> = preview.lines().collect();

        assert_eq!(lines, vec!["Rk  Squad", "1   Liverpool", "... 1 more rows"]);
    }
}
