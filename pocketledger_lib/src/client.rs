//! Call-boundary wrapper around the API client.
//!
//! Every method resolves to an [`ActionResult`]; nothing is returned as an
//! `Err` or panics past this boundary. When the API rejects the session the
//! store is cleared before the result is handed back, so the next call sees
//! no session.

use std::future::Future;
use std::sync::Arc;

use pocketledger_api::types::{
    Account, Budget, Category, CreateAccount, CreateBudget, CreateCategory, CreateTransfer,
    LoginRequest, Paginated, Transfer, UpdateAccount, UpdateBudget, UpdateCategory,
    UpdateTransfer,
};
use pocketledger_api::{AccountQuery, BudgetQuery, CategoryQuery, Client, TransferQuery};

use crate::action::{ActionResult, ErrorEntry};
use crate::auth::{humanize_login_failure, is_auth_status, Classify, ErrorClass};
use crate::config::RetryConfig;
use crate::session::{SessionPreferences, SessionStore};

pub struct FinanceClient {
    base_url: String,
    session: Arc<SessionStore>,
    retry: RetryConfig,
}

impl FinanceClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>, retry: RetryConfig) -> Self {
        Self {
            base_url: base_url.to_string(),
            session,
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn api(&self) -> Client {
        Client::with_base_url(&self.base_url).with_session_token(self.session.token())
    }

    /// Runs one remote call, retrying transient failures when `retry` is set,
    /// and folds the outcome into an [`ActionResult`].
    async fn call<T, F, Fut>(&self, label: &str, retry: bool, f: F) -> ActionResult<T>
    where
        F: FnMut(Client) -> Fut,
        Fut: Future<Output = Result<T, pocketledger_api::Error>>,
    {
        match self.attempt(label, retry, f).await {
            Ok(value) => ActionResult::success(value),
            Err(err) => self.fail(label, &err),
        }
    }

    async fn attempt<T, F, Fut>(
        &self,
        label: &str,
        retry: bool,
        mut f: F,
    ) -> Result<T, pocketledger_api::Error>
    where
        F: FnMut(Client) -> Fut,
        Fut: Future<Output = Result<T, pocketledger_api::Error>>,
    {
        let max_retries = if retry { self.retry.max_retries } else { 0 };
        let mut attempt = 0usize;
        loop {
            match f(self.api()).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn fail<T>(&self, label: &str, err: &pocketledger_api::Error) -> ActionResult<T> {
        match err.classify() {
            ErrorClass::Auth => {
                tracing::warn!("{} rejected the session; signing out", label);
                if let Err(e) = self.session.logout() {
                    tracing::error!("Failed to clear session: {}", e);
                }
                let status = err.status().unwrap_or(401);
                ActionResult::error(vec![ErrorEntry::session_expired(status)])
            }
            ErrorClass::Domain(_) => ActionResult::from_api_error(err),
        }
    }

    /// Signs in and stores the issued token.
    ///
    /// A rejected sign-in leaves any existing session untouched and is
    /// reported without an auth status, so callers never treat it as an
    /// expired session.
    pub async fn login(&self, email: &str, password: &str) -> ActionResult<SessionPreferences> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let api = Client::with_base_url(&self.base_url);
        let response = match api.login(&request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("Sign-in rejected: {}", err);
                let humanized = humanize_login_failure(&err);
                let mut entry = ErrorEntry::new(humanized.title, humanized.message);
                entry.status = err.status().filter(|status| !is_auth_status(*status));
                return ActionResult::error(vec![entry]);
            }
        };
        match self.session.login(&response.access_token) {
            Ok(()) => ActionResult::success(self.session.preferences().unwrap_or_default()),
            Err(e) => ActionResult::error(vec![ErrorEntry::new(
                "Could not save session",
                e.to_string(),
            )]),
        }
    }

    /// Drops the local session.
    pub fn logout(&self) -> ActionResult<()> {
        match self.session.logout() {
            Ok(()) => ActionResult::success(()),
            Err(e) => ActionResult::error(vec![ErrorEntry::new(
                "Could not sign out",
                e.to_string(),
            )]),
        }
    }

    pub async fn list_accounts(&self, query: &AccountQuery) -> ActionResult<Paginated<Account>> {
        self.call("accounts", true, |api| async move {
            api.list_accounts(query).await
        })
        .await
    }

    pub async fn create_account(&self, payload: &CreateAccount) -> ActionResult<Account> {
        self.call("create account", false, |api| async move {
            api.create_account(payload).await
        })
        .await
    }

    pub async fn update_account(
        &self,
        id: &str,
        payload: &UpdateAccount,
    ) -> ActionResult<Account> {
        self.call("update account", false, |api| async move {
            api.update_account(id, payload).await
        })
        .await
    }

    pub async fn remove_account(&self, id: &str) -> ActionResult<()> {
        self.call("remove account", false, |api| async move {
            api.remove_account(id).await
        })
        .await
    }

    pub async fn list_categories(
        &self,
        query: &CategoryQuery,
    ) -> ActionResult<Paginated<Category>> {
        self.call("categories", true, |api| async move {
            api.list_categories(query).await
        })
        .await
    }

    pub async fn create_category(&self, payload: &CreateCategory) -> ActionResult<Category> {
        self.call("create category", false, |api| async move {
            api.create_category(payload).await
        })
        .await
    }

    pub async fn update_category(
        &self,
        id: &str,
        payload: &UpdateCategory,
    ) -> ActionResult<Category> {
        self.call("update category", false, |api| async move {
            api.update_category(id, payload).await
        })
        .await
    }

    pub async fn remove_category(&self, id: &str) -> ActionResult<()> {
        self.call("remove category", false, |api| async move {
            api.remove_category(id).await
        })
        .await
    }

    pub async fn list_budgets(&self, query: &BudgetQuery) -> ActionResult<Paginated<Budget>> {
        self.call("budgets", true, |api| async move {
            api.list_budgets(query).await
        })
        .await
    }

    pub async fn create_budget(&self, payload: &CreateBudget) -> ActionResult<Budget> {
        self.call("create budget", false, |api| async move {
            api.create_budget(payload).await
        })
        .await
    }

    pub async fn update_budget(&self, id: &str, payload: &UpdateBudget) -> ActionResult<Budget> {
        self.call("update budget", false, |api| async move {
            api.update_budget(id, payload).await
        })
        .await
    }

    pub async fn remove_budget(&self, id: &str) -> ActionResult<()> {
        self.call("remove budget", false, |api| async move {
            api.remove_budget(id).await
        })
        .await
    }

    pub async fn list_transfers(
        &self,
        query: &TransferQuery,
    ) -> ActionResult<Paginated<Transfer>> {
        self.call("transfers", true, |api| async move {
            api.list_transfers(query).await
        })
        .await
    }

    pub async fn create_transfer(&self, payload: &CreateTransfer) -> ActionResult<Transfer> {
        self.call("create transfer", false, |api| async move {
            api.create_transfer(payload).await
        })
        .await
    }

    pub async fn update_transfer(
        &self,
        id: &str,
        payload: &UpdateTransfer,
    ) -> ActionResult<Transfer> {
        self.call("update transfer", false, |api| async move {
            api.update_transfer(id, payload).await
        })
        .await
    }

    pub async fn remove_transfer(&self, id: &str) -> ActionResult<()> {
        self.call("remove transfer", false, |api| async move {
            api.remove_transfer(id).await
        })
        .await
    }
}

fn is_retryable(err: &pocketledger_api::Error) -> bool {
    match err {
        pocketledger_api::Error::Network(_) => true,
        pocketledger_api::Error::HttpStatus { status, .. } => {
            !is_auth_status(*status) && (*status == 429 || *status >= 500)
        }
        pocketledger_api::Error::RequestFailed | pocketledger_api::Error::Decode(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_only_transient_failures() {
        use pocketledger_api::Error;
        let status = |status| Error::HttpStatus {
            status,
            body: String::new(),
        };
        assert!(is_retryable(&Error::Network("reset".to_string())));
        assert!(is_retryable(&status(429)));
        assert!(is_retryable(&status(503)));
        assert!(!is_retryable(&status(401)));
        assert!(!is_retryable(&status(403)));
        assert!(!is_retryable(&status(400)));
        assert!(!is_retryable(&Error::Decode("eof".to_string())));
    }
}
