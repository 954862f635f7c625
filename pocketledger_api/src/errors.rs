//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The request could not be built (invalid URL or client configuration).
    #[error("Request failed")]
    RequestFailed,
    /// The request never produced a response (connection refused, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl Error {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
