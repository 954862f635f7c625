//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer outside the call boundary: session
/// storage and input validation.
#[derive(Debug)]
pub enum FinanceError {
    /// Reading or writing the persisted session failed.
    Session(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for FinanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(msg) => write!(f, "Session error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for FinanceError {}

impl From<std::io::Error> for FinanceError {
    fn from(e: std::io::Error) -> Self {
        Self::Session(e.to_string())
    }
}
