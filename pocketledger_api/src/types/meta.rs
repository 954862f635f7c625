use serde::{Deserialize, Serialize};

/// Paging metadata returned alongside every list response.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub total_pages: i64,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

impl Meta {
    /// `ceil(total / limit)`, the page count the API is expected to report.
    pub fn expected_total_pages(total: i64, limit: i64) -> i64 {
        if limit <= 0 || total <= 0 {
            return 0;
        }
        (total + limit - 1) / limit
    }

    /// Whether `page` is the last page (or beyond it).
    pub fn is_last_page(&self, page: i64) -> bool {
        page >= self.total_pages
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: Meta,
}
