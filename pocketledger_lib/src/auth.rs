//! Auth-failure propagation.
//!
//! Remote failures are classified as [`ErrorClass::Auth`] (HTTP 401/403) or
//! [`ErrorClass::Domain`]. Auth failures tear the session down and navigate to
//! the login route without any error notification; domain failures are turned
//! into a [`HumanizedError`] and shown once through the [`Notifier`].

use serde::Deserialize;

use crate::action::{ActionResult, ErrorEntry};
use crate::session::SessionStore;

/// Route the navigator is sent to when the session is rejected.
pub const LOGIN_ROUTE: &str = "/login";

/// A `{title, message}` pair fit for end-user display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanizedError {
    pub title: String,
    pub message: String,
}

impl HumanizedError {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&ErrorEntry> for HumanizedError {
    fn from(entry: &ErrorEntry) -> Self {
        Self::new(entry.title.clone(), entry.message.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    Auth,
    Domain(HumanizedError),
}

pub fn is_auth_status(status: u16) -> bool {
    status == 401 || status == 403
}

/// Anything that can be sorted into the auth/domain taxonomy.
///
/// Classification is a pure function of the value: calling it twice yields
/// the same class and the same humanized message.
pub trait Classify {
    /// HTTP status attached to the failure, if any.
    fn status_code(&self) -> Option<u16>;

    /// Human-readable description of the failure.
    fn humanize(&self) -> HumanizedError;

    fn classify(&self) -> ErrorClass {
        match self.status_code() {
            Some(status) if is_auth_status(status) => ErrorClass::Auth,
            _ => ErrorClass::Domain(self.humanize()),
        }
    }
}

impl Classify for pocketledger_api::Error {
    fn status_code(&self) -> Option<u16> {
        self.status()
    }

    fn humanize(&self) -> HumanizedError {
        use pocketledger_api::Error;
        match self {
            Error::HttpStatus { status, body } => humanize_http(*status, body),
            Error::Network(_) => HumanizedError::new(
                "Connection error",
                "Could not reach the server. Check your connection and try again.",
            ),
            Error::Decode(_) => HumanizedError::new(
                "Unexpected response",
                "The server sent a response that could not be read.",
            ),
            Error::RequestFailed => HumanizedError::new(
                "Unexpected error",
                "Something went wrong while preparing the request.",
            ),
        }
    }
}

impl Classify for ErrorEntry {
    fn status_code(&self) -> Option<u16> {
        self.status
    }

    fn humanize(&self) -> HumanizedError {
        HumanizedError::from(self)
    }
}

/// Validation body shapes the backend produces: `message` is either a single
/// string or one string per failed field.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<MessageField>,
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

fn status_title(status: u16) -> &'static str {
    match status {
        400 | 422 => "Invalid data",
        401 | 403 => "Session expired",
        404 => "Not found",
        409 => "Conflict",
        429 => "Too many requests",
        500..=599 => "Server error",
        _ => "Request failed",
    }
}

fn status_message(status: u16) -> &'static str {
    match status {
        400 | 422 => "Some of the submitted values are not valid.",
        401 | 403 => "Your session has expired. Please sign in again.",
        404 => "The requested record does not exist.",
        409 => "The record conflicts with existing data.",
        429 => "Too many requests were sent. Wait a moment and try again.",
        500..=599 => "The server could not complete the request. Try again later.",
        _ => "The request could not be completed.",
    }
}

fn humanize_http(status: u16, body: &str) -> HumanizedError {
    let title = status_title(status);
    // Server-side failure bodies are never shown to the user.
    if status >= 500 {
        return HumanizedError::new(title, status_message(status));
    }
    let message = body_message(body).unwrap_or_else(|| status_message(status).to_string());
    HumanizedError::new(title, message)
}

fn body_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| match parsed.message {
            Some(MessageField::One(msg)) => Some(msg),
            Some(MessageField::Many(msgs)) => Some(msgs.join("; ")),
            None => parsed.error,
        })
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
}

/// Humanizes a failed sign-in. A 401/403 from the login endpoint rejects the
/// submitted credentials, not a session.
pub fn humanize_login_failure(err: &pocketledger_api::Error) -> HumanizedError {
    match err {
        pocketledger_api::Error::HttpStatus { status, body } if is_auth_status(*status) => {
            let message = body_message(body)
                .unwrap_or_else(|| "The email or password is incorrect.".to_string());
            HumanizedError::new("Sign-in failed", message)
        }
        _ => err.humanize(),
    }
}

/// Navigation seam. The CLI prints the sign-in hint; tests record calls.
pub trait Navigator {
    fn navigate(&self, route: &str);
}

/// Transient notification seam.
pub trait Notifier {
    fn toast(&self, error: &HumanizedError);
}

/// What the caller should do after [`resolve`] handled a result.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Success(T),
    /// The session was rejected; the user was sent to the login route and no
    /// further error output is wanted.
    Redirected,
    /// Domain failure, already shown through the notifier as one toast.
    Failed(HumanizedError),
}

/// Client-side handling of a single failure.
///
/// Auth failures invalidate the session and navigate to [`LOGIN_ROUTE`]
/// exactly once. Domain failures toast exactly once and never navigate.
pub fn handle_failure<E, N, T>(
    err: &E,
    session: &SessionStore,
    navigator: &N,
    notifier: &T,
) -> ErrorClass
where
    E: Classify + ?Sized,
    N: Navigator + ?Sized,
    T: Notifier + ?Sized,
{
    let class = err.classify();
    match &class {
        ErrorClass::Auth => {
            if let Err(e) = session.logout() {
                tracing::warn!("Failed to clear session after auth failure: {}", e);
            }
            navigator.navigate(LOGIN_ROUTE);
        }
        ErrorClass::Domain(humanized) => notifier.toast(humanized),
    }
    class
}

/// Client-side handling of an [`ActionResult`].
///
/// If any entry is an auth failure the whole result is treated as one: one
/// redirect, zero toasts. Otherwise the entries are merged into a single
/// toast.
pub fn resolve<T, N, S>(
    result: ActionResult<T>,
    session: &SessionStore,
    navigator: &N,
    notifier: &S,
) -> Resolved<T>
where
    N: Navigator + ?Sized,
    S: Notifier + ?Sized,
{
    match result {
        ActionResult::Success { data } => Resolved::Success(data),
        ActionResult::Error { errors } => {
            if let Some(auth) = errors.iter().find(|e| e.is_auth()) {
                handle_failure(auth, session, navigator, notifier);
                return Resolved::Redirected;
            }
            let humanized = merge_entries(&errors);
            notifier.toast(&humanized);
            Resolved::Failed(humanized)
        }
    }
}

/// Folds several entries into one `{title, message}`. The first title wins;
/// distinct messages are joined in order.
fn merge_entries(errors: &[ErrorEntry]) -> HumanizedError {
    let mut merged = errors
        .first()
        .map(|entry| entry.humanize())
        .unwrap_or_else(|| {
            HumanizedError::new("Unexpected error", "Something went wrong. Please try again.")
        });
    for entry in errors.iter().skip(1) {
        let message = entry.humanize().message;
        if !merged.message.split("; ").any(|m| m == message) {
            merged.message.push_str("; ");
            merged.message.push_str(&message);
        }
    }
    merged
}
