//! Error types for the Sheets client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Failed to read credentials file {path}: {source}")]
    CredentialsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for Sheets client operations
pub type Result<T> = std::result::Result<T, SheetsError>;
