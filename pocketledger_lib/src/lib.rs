//! Library layer for pocketledger: call-boundary results, auth-failure
//! handling, session storage, and list export.
//!
//! Wraps the `pocketledger_api` crate with retry, session invalidation on
//! rejected credentials, input validation, locale formatting, and the
//! XLSX/print export pipeline.

pub mod action;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod listing;
pub mod session;
pub mod validation;

pub use pocketledger_api;
pub use pocketledger_api::types;
pub use pocketledger_api::{
    AccountQuery, AccountSortBy, BudgetQuery, BudgetSortBy, CategoryQuery, CategorySortBy, Query,
    SortDirection, TransferQuery, TransferSortBy,
};

pub use action::{ActionResult, ErrorEntry};
pub use auth::{
    handle_failure, resolve, Classify, ErrorClass, HumanizedError, Navigator, Notifier, Resolved,
};
pub use client::FinanceClient;
pub use config::{RetryConfig, Settings};
pub use error::FinanceError;
pub use format::Locale;
pub use session::{SessionPreferences, SessionStore};
