//! Stats Scraper - league statistics page fetching and table extraction
//!
//! Fetches a statistics page over HTTP and turns every `<table>` element into
//! a rectangular [`ExtractedTable`] with flattened column labels.

pub mod error;
pub mod fetch;
pub mod table;
pub mod types;

pub use error::ExtractError;
pub use fetch::{HttpPageSource, PageSource, StaticPageSource};
pub use table::{extract_table, flatten_columns, table_elements};
pub use types::{ExtractedTable, LAST_UPDATED_COLUMN, TIMESTAMP_FORMAT};
