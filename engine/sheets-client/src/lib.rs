//! Sheets Client - Google Sheets access for the league mirror
//!
//! This crate authorises against Google with a service-account key and exposes
//! the handful of spreadsheet operations the mirror needs behind the
//! [`SpreadsheetApi`] trait, so the pipeline can run against an in-memory
//! spreadsheet in tests.

pub mod api;
pub mod credentials;
pub mod error;
pub mod google;

pub use api::{SpreadsheetApi, SpreadsheetConnector, Worksheet};
pub use credentials::{AccessToken, ServiceAccountKey, SHEETS_SCOPE};
pub use error::{Result, SheetsError};
pub use google::{GoogleConnector, GoogleSheetsClient};
