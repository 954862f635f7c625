//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SortDirection`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

/// Trait implemented by all list query builders. Provides URL serialization and
/// shared builder methods for pagination, search, date filtering, and ordering.
pub trait Query: Clone {
    /// Resource-specific field the list can be ordered by.
    type SortBy: Copy + fmt::Display;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Returns the common query fields.
    fn common(&self) -> &QueryCommon;

    /// Sets the field the results are ordered by.
    fn with_sort_by(self, sort_by: Self::SortBy) -> Self;

    /// Sets the page number (1-indexed).
    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page;
        self
    }

    /// Sets the number of results per page.
    fn with_limit(mut self, limit: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = Some(limit);
        self
    }

    /// Sets a free-text search filter.
    fn with_search(mut self, search: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().search = Some(search.to_string());
        self
    }

    /// Keeps only records on or after this date.
    fn with_start_date(mut self, start_date: NaiveDate) -> Self
    where
        Self: Sized,
    {
        self.get_common().start_date = Some(start_date);
        self
    }

    /// Keeps only records on or before this date.
    fn with_end_date(mut self, end_date: NaiveDate) -> Self
    where
        Self: Sized,
    {
        self.get_common().end_date = Some(end_date);
        self
    }

    /// Sets the sort direction (ascending or descending).
    fn with_sort_direction(mut self, sort_direction: SortDirection) -> Self
    where
        Self: Sized,
    {
        self.get_common().order = sort_direction;
        self
    }
}

/// Sort order for API results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order (oldest/smallest first).
    Asc,
    /// Descending order (newest/largest first). This is the default.
    #[default]
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        })
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

/// Fields shared by all list queries: pagination, search, date range and order.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryCommon {
    /// Page number (1-indexed). Defaults to 1.
    pub page: i64,
    /// Results per page. `None` uses the API default.
    pub limit: Option<i64>,
    /// Free-text search.
    pub search: Option<String>,
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    /// Sort direction. Defaults to descending.
    pub order: SortDirection,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            page: 1,
            limit: None,
            search: None,
            start_date: None,
            end_date: None,
            order: SortDirection::Desc,
        }
    }
}

impl QueryCommon {
    /// Appends the common pagination, search and date parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("page", &self.page.to_string());
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        };
        url.query_pairs_mut()
            .append_pair("order", &self.order.to_string());
        if let Some(search) = &self.search {
            url.query_pairs_mut().append_pair("search", search);
        };
        if let Some(start_date) = self.start_date {
            url.query_pairs_mut()
                .append_pair("startDate", &start_date.format("%Y-%m-%d").to_string());
        };
        if let Some(end_date) = self.end_date {
            url.query_pairs_mut()
                .append_pair("endDate", &end_date.format("%Y-%m-%d").to_string());
        };
        url
    }
}

/// Appends `orderBy` when a sort field was chosen.
pub(crate) fn add_order_by<S: fmt::Display>(url: &mut Url, sort_by: Option<S>) {
    if let Some(sort_by) = sort_by {
        url.query_pairs_mut()
            .append_pair("orderBy", &sort_by.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_parses_case_insensitively() {
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn common_defaults_to_first_page_descending() {
        let url = Url::parse("https://example.com/accounts").unwrap();
        let url = QueryCommon::default().add_to_url(&url);
        assert_eq!(url.query(), Some("page=1&order=DESC"));
    }
}
