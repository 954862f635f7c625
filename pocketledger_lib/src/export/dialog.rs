//! Export dialog lifecycle: `Closed -> Idle -> Exporting -> Idle`.
//!
//! Every dialog session carries an epoch. Closing the dialog bumps the epoch
//! and cancels the session token, so a fetch that finishes afterwards is
//! rejected as stale instead of leaking into the next session.

use tokio_util::sync::CancellationToken;

use super::config::{ExportConfig, ExportDefaults};
use super::error::ExportError;
use super::report::{Report, Reportable};
use crate::format::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Closed,
    Idle,
    Exporting(ExportFormat),
}

/// Handed out by [`ExportDialog::begin`]; must be presented back to
/// [`ExportDialog::complete`].
#[derive(Debug, Clone)]
pub struct ExportTicket {
    epoch: u64,
    format: ExportFormat,
    cancel: CancellationToken,
}

impl ExportTicket {
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Token to pass to the page collector.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Rows accepted by the dialog. Only [`ExportDialog::complete`] creates one,
/// so rendering always sees the dataset of the current session.
#[derive(Debug)]
pub struct CommittedDataset<T> {
    rows: Vec<T>,
    format: ExportFormat,
}

impl<T> CommittedDataset<T> {
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Reportable> CommittedDataset<T> {
    pub fn into_report(self, name: &str, locale: Locale) -> Report {
        Report::from_items(name, &self.rows, locale)
    }
}

pub struct ExportDialog<K> {
    defaults: ExportDefaults<K>,
    config: ExportConfig<K>,
    state: ExportState,
    epoch: u64,
    cancel: CancellationToken,
}

impl<K: Copy> ExportDialog<K> {
    pub fn new(defaults: ExportDefaults<K>) -> Self {
        Self {
            config: ExportConfig::from_defaults(&defaults),
            defaults,
            state: ExportState::Closed,
            epoch: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn config(&self) -> &ExportConfig<K> {
        &self.config
    }

    /// Editable only while the dialog is open and idle.
    pub fn config_mut(&mut self) -> Option<&mut ExportConfig<K>> {
        match self.state {
            ExportState::Idle => Some(&mut self.config),
            _ => None,
        }
    }

    pub fn open(&mut self) {
        if self.state == ExportState::Closed {
            self.config = ExportConfig::from_defaults(&self.defaults);
            self.cancel = CancellationToken::new();
            self.state = ExportState::Idle;
        }
    }

    /// Closes the dialog from any state. Resets the configuration, cancels
    /// any running export and invalidates outstanding tickets.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.epoch += 1;
        self.config = ExportConfig::from_defaults(&self.defaults);
        self.state = ExportState::Closed;
    }

    pub fn begin(&mut self, format: ExportFormat) -> Result<ExportTicket, ExportError> {
        if self.state != ExportState::Idle {
            return Err(ExportError::InvalidState(format!(
                "cannot start an export while {:?}",
                self.state
            )));
        }
        self.state = ExportState::Exporting(format);
        Ok(ExportTicket {
            epoch: self.epoch,
            format,
            cancel: self.cancel.clone(),
        })
    }

    /// Accepts the outcome of the export started with `ticket` and returns the
    /// dialog to idle. Outcomes of an earlier dialog session are rejected as
    /// [`ExportError::Stale`] and leave the current state untouched.
    pub fn complete<T>(
        &mut self,
        ticket: ExportTicket,
        outcome: Result<Vec<T>, ExportError>,
    ) -> Result<CommittedDataset<T>, ExportError> {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                "Dropping export result from epoch {} (current {})",
                ticket.epoch,
                self.epoch
            );
            return Err(ExportError::Stale);
        }
        if self.state == ExportState::Exporting(ticket.format) {
            self.state = ExportState::Idle;
        }
        outcome.map(|rows| CommittedDataset {
            rows,
            format: ticket.format,
        })
    }
}
