//! CLI subcommand implementations.

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod export;
pub mod transfers;

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use clap::Args;
use pocketledger_lib::export::Reportable;
use pocketledger_lib::listing::{filter_items, pagination_actions, sort_items};
use pocketledger_lib::types::Paginated;
use pocketledger_lib::{
    resolve, validation, ActionResult, FinanceClient, Locale, Query, Resolved, SortDirection,
};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{emit, OutputFormat};
use crate::ui::{TerminalNavigator, TerminalNotifier};

/// Marks a failure that was already shown to the user.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed")
    }
}

impl std::error::Error for Reported {}

/// Everything a subcommand needs.
pub struct Context {
    pub client: FinanceClient,
    pub locale: Locale,
    pub format: OutputFormat,
    navigator: TerminalNavigator,
    notifier: TerminalNotifier,
}

impl Context {
    pub fn new(client: FinanceClient, locale: Locale, format: OutputFormat) -> Self {
        Self {
            client,
            locale,
            format,
            navigator: TerminalNavigator,
            notifier: TerminalNotifier,
        }
    }

    /// Unwraps a successful result. Failures go through the notifier or the
    /// login redirect and come back as [`Reported`].
    pub fn resolve<T>(&self, result: ActionResult<T>) -> Result<T> {
        let session = self.client.session();
        match resolve(result, session, &self.navigator, &self.notifier) {
            Resolved::Success(data) => Ok(data),
            Resolved::Redirected | Resolved::Failed(_) => Err(Reported.into()),
        }
    }
}

/// Paging, search and ordering flags shared by every `list` subcommand.
#[derive(Args)]
pub struct ListArgs {
    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Results per page (1-100)
    #[arg(long, default_value = "20")]
    pub page_size: i64,

    /// Free-text search sent to the server
    #[arg(long)]
    pub search: Option<String>,

    /// Only records on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Only records on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Server-side sort field
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Keep only fetched rows containing this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Re-sort the fetched rows by a column id
    #[arg(long)]
    pub sort_column: Option<String>,
}

impl ListArgs {
    pub fn direction(&self) -> SortDirection {
        if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    /// Applies the shared flags to `query` after validating them.
    pub fn build_query<Q>(&self, query: Q, sort_fields: &str) -> Result<Q>
    where
        Q: Query,
        Q::SortBy: FromStr,
    {
        let mut query = query
            .with_page(validation::validate_page(self.page)?)
            .with_limit(validation::validate_page_size(self.page_size)?)
            .with_sort_direction(self.direction());

        if let Some(ref search) = self.search {
            let sanitized = validation::validate_search(search)?;
            query = query.with_search(&sanitized);
        }

        let since = self.since.as_deref().map(validation::validate_date).transpose()?;
        let until = self.until.as_deref().map(validation::validate_date).transpose()?;
        let (since, until) = validation::validate_date_range(since, until)?;
        if let Some(date) = since {
            query = query.with_start_date(date);
        }
        if let Some(date) = until {
            query = query.with_end_date(date);
        }

        if let Some(ref field) = self.sort_by {
            query = query.with_sort_by(parse_sort_field(field, sort_fields)?);
        }
        Ok(query)
    }
}

/// Trims a record ID given on the command line and rejects blanks.
pub fn require_id(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{} ID cannot be empty", what);
    }
    Ok(trimmed.to_string())
}

pub fn parse_sort_field<K: FromStr>(field: &str, valid: &str) -> Result<K> {
    match field.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => bail!("unknown sort field '{}'. Valid fields: {}", field, valid),
    }
}

/// Applies local filtering/sorting, prints the page, then the footer hints.
pub fn print_page<T, R>(
    args: &ListArgs,
    ctx: &Context,
    resource: &str,
    page: Paginated<T>,
    build_rows: fn(&[T], Locale) -> Vec<R>,
) -> Result<()>
where
    T: Reportable + Clone + Serialize,
    R: Tabled + Serialize,
{
    let meta = page.meta;
    let mut items = page.data;

    if let Some(ref needle) = args.filter {
        items = filter_items(&items, needle, ctx.locale);
    }
    if let Some(ref column) = args.sort_column {
        if !T::columns().iter().any(|c| &c.id == column) {
            let ids: Vec<String> = T::columns().into_iter().map(|c| c.id).collect();
            bail!(
                "unknown column '{}'. Valid columns: {}",
                column,
                ids.join(", ")
            );
        }
        sort_items(&mut items, column, args.direction());
    }

    eprintln!(
        "Page {}/{} ({} total {})",
        meta.page, meta.total_pages, meta.total, resource
    );
    emit(&ctx.format, &items, build_rows(&items, ctx.locale))?;

    for action in pagination_actions(resource, &meta, ctx.client.base_url()) {
        eprintln!("  {}", action.render());
    }
    Ok(())
}
