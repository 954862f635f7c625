use std::str::FromStr;

use url::Url;

use super::common::{add_order_by, Query, QueryCommon};

#[derive(Clone, Debug, Default)]
pub struct TransferQuery {
    pub common: QueryCommon,
    /// Matches transfers where the account is either side.
    pub account_id: Option<String>,
    pub sort_by: Option<TransferSortBy>,
}

impl Query for TransferQuery {
    type SortBy = TransferSortBy;

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
    fn with_sort_by(mut self, sort_by: TransferSortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(account_id) = &self.account_id {
            url.query_pairs_mut().append_pair("accountId", account_id);
        }
        add_order_by(&mut url, self.sort_by);
        url
    }
}

impl TransferQuery {
    pub fn with_account_id(mut self, account_id: &str) -> Self {
        self.account_id = Some(account_id.to_string());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferSortBy {
    Date,
    Amount,
}

impl std::fmt::Display for TransferSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransferSortBy::Date => "date",
                TransferSortBy::Amount => "amount",
            }
        )
    }
}

impl FromStr for TransferSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(TransferSortBy::Date),
            "amount" => Ok(TransferSortBy::Amount),
            _ => Err(()),
        }
    }
}
