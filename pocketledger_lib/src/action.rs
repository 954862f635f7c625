//! The success/error result every remote-call wrapper resolves to.

use serde::{Deserialize, Serialize};

use crate::auth::{is_auth_status, Classify};

/// One error shown to the user.
///
/// `status` carries the HTTP status when the failure came from the API; it is
/// the structured marker the auth classifier reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorEntry {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Entry attached to a result whose session was rejected by the API.
    pub fn session_expired(status: u16) -> Self {
        Self::new(
            "Session expired",
            "Your session has expired. Please sign in again.",
        )
        .with_status(status)
    }

    pub fn is_auth(&self) -> bool {
        self.status.map(is_auth_status).unwrap_or(false)
    }
}

/// Tagged union returned by every remote call wrapper. Exactly one branch is
/// ever set and `errors` is never empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionResult<T> {
    Success { data: T },
    Error { errors: Vec<ErrorEntry> },
}

impl<T> ActionResult<T> {
    pub fn success(data: T) -> Self {
        ActionResult::Success { data }
    }

    /// Builds the error branch. An empty list is replaced with a generic entry.
    pub fn error(mut errors: Vec<ErrorEntry>) -> Self {
        if errors.is_empty() {
            errors.push(ErrorEntry::new(
                "Unexpected error",
                "Something went wrong. Please try again.",
            ));
        }
        ActionResult::Error { errors }
    }

    /// Converts a failed API call into the error branch, keeping its status.
    pub fn from_api_error(err: &pocketledger_api::Error) -> Self {
        let humanized = err.humanize();
        let mut entry = ErrorEntry::new(humanized.title, humanized.message);
        entry.status = err.status();
        Self::error(vec![entry])
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success { .. })
    }

    /// True when any error entry carries a 401/403 status.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ActionResult::Success { .. } => false,
            ActionResult::Error { errors } => errors.iter().any(ErrorEntry::is_auth),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            ActionResult::Success { data } => ActionResult::Success { data: f(data) },
            ActionResult::Error { errors } => ActionResult::Error { errors },
        }
    }

    pub fn into_result(self) -> Result<T, Vec<ErrorEntry>> {
        match self {
            ActionResult::Success { data } => Ok(data),
            ActionResult::Error { errors } => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_with_status_tag() {
        let result = ActionResult::success(vec![1, 2]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success", "data": [1, 2] }));
    }

    #[test]
    fn error_serializes_entries_without_empty_status() {
        let result: ActionResult<()> =
            ActionResult::error(vec![ErrorEntry::new("Invalid data", "Name is required")]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "error",
                "errors": [{ "title": "Invalid data", "message": "Name is required" }]
            })
        );
    }

    #[test]
    fn error_branch_is_never_empty() {
        let result: ActionResult<()> = ActionResult::error(Vec::new());
        match result {
            ActionResult::Error { errors } => {
                assert_eq!(errors.len(), 1);
                assert!(!errors[0].title.is_empty());
                assert!(!errors[0].message.is_empty());
            }
            ActionResult::Success { .. } => panic!("expected error branch"),
        }
    }

    #[test]
    fn deserializes_from_tagged_json() {
        let json = r#"{"status":"error","errors":[{"title":"Session expired","message":"x","status":401}]}"#;
        let result: ActionResult<u32> = serde_json::from_str(json).unwrap();
        assert!(result.is_auth_failure());
    }

    #[test]
    fn from_api_error_keeps_status() {
        let err = pocketledger_api::Error::HttpStatus {
            status: 403,
            body: String::new(),
        };
        let result: ActionResult<()> = ActionResult::from_api_error(&err);
        assert!(result.is_auth_failure());
    }

    #[test]
    fn map_and_into_result() {
        let result = ActionResult::success(2).map(|n| n * 10);
        assert_eq!(result.into_result().unwrap(), 20);
    }
}
