//! HTTP client for the PocketLedger finance API.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::{
    query::{AccountQuery, BudgetQuery, CategoryQuery, Query, TransferQuery},
    types::{
        Account, Budget, Category, CreateAccount, CreateBudget, CreateCategory, CreateTransfer,
        LoginRequest, LoginResponse, Paginated, Transfer, UpdateAccount, UpdateBudget,
        UpdateCategory, UpdateTransfer,
    },
    Error,
};

/// Name of the cookie the backend reads the session token from.
pub const SESSION_COOKIE: &str = "session";

const USER_AGENT: &str = concat!("pocketledger/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the finance API.
///
/// Each request builds a fresh `reqwest::Client` with a 30-second timeout.
/// When a session token is set it is sent as the `session` cookie; the
/// backend is the only party that authorizes requests.
#[derive(Clone, Debug)]
pub struct Client {
    base_api_url: String,
    session_token: Option<String>,
}

impl Client {
    /// Creates a new client pointing at the given API root.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    /// Returns a copy of this client that authenticates with `token`.
    pub fn with_session_token(mut self, token: Option<String>) -> Self {
        self.session_token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })
    }

    /// Sends a request and returns the raw body of a successful response.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<String, Error> {
        let client = self.http()?;
        let mut request = client
            .request(method.clone(), url.clone())
            .header("accept", "application/json");
        if let Some(token) = &self.session_token {
            request = request.header("cookie", format!("{}={}", SESSION_COOKIE, token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, url.path(), e);
            Error::Network(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!(
                "{} {} failed with status {}: {}",
                method,
                url.path(),
                status,
                snippet
            );
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        serde_json::from_str::<T>(body).map_err(|e| {
            let snippet = truncate_body(body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Decode(e.to_string())
        })
    }

    async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        let body = self.send(Method::GET, url, None).await?;
        Self::parse(&body)
    }

    async fn write<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T, Error>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.get_url(path, None::<&AccountQuery>)?;
        let value = serde_json::to_value(payload).map_err(|e| {
            tracing::error!("Failed to serialize request body: {}", e);
            Error::RequestFailed
        })?;
        let body = self.send(method, url, Some(value)).await?;
        Self::parse(&body)
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.get_url(path, None::<&AccountQuery>)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// Exchanges credentials for a session token.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error> {
        self.write(Method::POST, "/auth/login", request).await
    }

    /// Fetches a page of accounts matching the given query.
    pub async fn list_accounts(&self, query: &AccountQuery) -> Result<Paginated<Account>, Error> {
        self.get::<Paginated<Account>, AccountQuery>("/accounts", Some(query))
            .await
    }

    pub async fn create_account(&self, payload: &CreateAccount) -> Result<Account, Error> {
        self.write(Method::POST, "/accounts", payload).await
    }

    pub async fn update_account(
        &self,
        id: &str,
        payload: &UpdateAccount,
    ) -> Result<Account, Error> {
        self.write(Method::PATCH, &format!("/accounts/{}", id), payload)
            .await
    }

    pub async fn remove_account(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("/accounts/{}", id)).await
    }

    /// Fetches a page of categories matching the given query.
    pub async fn list_categories(
        &self,
        query: &CategoryQuery,
    ) -> Result<Paginated<Category>, Error> {
        self.get::<Paginated<Category>, CategoryQuery>("/categories", Some(query))
            .await
    }

    pub async fn create_category(&self, payload: &CreateCategory) -> Result<Category, Error> {
        self.write(Method::POST, "/categories", payload).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        payload: &UpdateCategory,
    ) -> Result<Category, Error> {
        self.write(Method::PATCH, &format!("/categories/{}", id), payload)
            .await
    }

    pub async fn remove_category(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("/categories/{}", id)).await
    }

    /// Fetches a page of monthly budgets matching the given query.
    pub async fn list_budgets(&self, query: &BudgetQuery) -> Result<Paginated<Budget>, Error> {
        self.get::<Paginated<Budget>, BudgetQuery>("/budgets", Some(query))
            .await
    }

    pub async fn create_budget(&self, payload: &CreateBudget) -> Result<Budget, Error> {
        self.write(Method::POST, "/budgets", payload).await
    }

    pub async fn update_budget(&self, id: &str, payload: &UpdateBudget) -> Result<Budget, Error> {
        self.write(Method::PATCH, &format!("/budgets/{}", id), payload)
            .await
    }

    pub async fn remove_budget(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("/budgets/{}", id)).await
    }

    /// Fetches a page of inter-account transfers matching the given query.
    pub async fn list_transfers(
        &self,
        query: &TransferQuery,
    ) -> Result<Paginated<Transfer>, Error> {
        self.get::<Paginated<Transfer>, TransferQuery>("/transfers", Some(query))
            .await
    }

    pub async fn create_transfer(&self, payload: &CreateTransfer) -> Result<Transfer, Error> {
        self.write(Method::POST, "/transfers", payload).await
    }

    pub async fn update_transfer(
        &self,
        id: &str,
        payload: &UpdateTransfer,
    ) -> Result<Transfer, Error> {
        self.write(Method::PATCH, &format!("/transfers/{}", id), payload)
            .await
    }

    pub async fn remove_transfer(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("/transfers/{}", id)).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = Client::with_base_url("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(1500);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("...[truncated]"));
    }
}
