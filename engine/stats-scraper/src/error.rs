//! Table extraction errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("table {} has no caption", .table_id.as_deref().unwrap_or("<no id>"))]
    MissingCaption { table_id: Option<String> },

    #[error("table '{caption}' has no id attribute")]
    MissingId { caption: String },

    #[error("table '{0}' has no data")]
    Empty(String),

    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}
