//! Terminal implementations of the notification and navigation seams.

use pocketledger_lib::auth::LOGIN_ROUTE;
use pocketledger_lib::{HumanizedError, Navigator, Notifier};

/// Prints errors to stderr, one per toast.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn toast(&self, error: &HumanizedError) {
        eprintln!("{}", toast_line(error));
    }
}

fn toast_line(error: &HumanizedError) -> String {
    format!("{}: {}", error.title, error.message)
}

/// A terminal has no routes; navigating prints the command that leads there.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &str) {
        eprintln!("{}", navigation_hint(route));
    }
}

fn navigation_hint(route: &str) -> String {
    if route == LOGIN_ROUTE {
        "Your session has expired. Run `pocketledger login` to sign in again.".to_string()
    } else {
        format!("Continue at {}", route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_route_points_at_login_command() {
        assert!(navigation_hint(LOGIN_ROUTE).contains("pocketledger login"));
        assert_eq!(navigation_hint("/accounts"), "Continue at /accounts");
    }

    #[test]
    fn toast_shows_title_and_message() {
        let error = HumanizedError::new("Invalid data", "amount must be positive");
        assert_eq!(toast_line(&error), "Invalid data: amount must be positive");
    }
}
