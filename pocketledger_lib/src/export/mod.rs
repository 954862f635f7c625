//! List export: page collection, report projection, and the two renderers.
//!
//! The flow is `ExportDialog::begin` → [`collect_dataset`] →
//! `ExportDialog::complete` → [`Report`] → [`xlsx`] or [`print`].

pub mod config;
pub mod dialog;
pub mod error;
pub mod pipeline;
pub mod print;
pub mod report;
pub mod xlsx;

pub use config::{ExportConfig, ExportDefaults, FULL_DATA_PAGE_SIZE};
pub use dialog::{CommittedDataset, ExportDialog, ExportFormat, ExportState, ExportTicket};
pub use error::ExportError;
pub use pipeline::{collect_dataset, page_stream, PageRequest};
pub use report::{Report, ReportColumn, ReportRow, Reportable, SortValue};
