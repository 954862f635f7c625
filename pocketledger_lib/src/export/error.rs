use thiserror::Error;

use crate::action::ErrorEntry;

/// Errors from collecting or rendering an export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A page fetch failed; nothing is rendered from the partial rows.
    #[error("Export stopped at page {page} after {fetched_rows} rows")]
    PageFailed {
        page: u32,
        fetched_rows: usize,
        errors: Vec<ErrorEntry>,
    },
    #[error("Export cancelled")]
    Cancelled,
    /// The dialog was closed (or reopened) while this export was running.
    #[error("Export result belongs to a closed dialog session")]
    Stale,
    #[error("Invalid export state: {0}")]
    InvalidState(String),
    #[error("Failed to render export: {0}")]
    Render(String),
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Render(e.to_string())
    }
}

impl From<quick_xml::Error> for ExportError {
    fn from(e: quick_xml::Error) -> Self {
        ExportError::Render(e.to_string())
    }
}
