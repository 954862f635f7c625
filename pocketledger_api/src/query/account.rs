use std::str::FromStr;

use url::Url;

use crate::types::AccountType;

use super::common::{add_order_by, Query, QueryCommon};

#[derive(Clone, Debug, Default)]
pub struct AccountQuery {
    pub common: QueryCommon,
    pub account_types: Vec<AccountType>,
    pub currency: Option<String>,
    pub sort_by: Option<AccountSortBy>,
}

impl Query for AccountQuery {
    type SortBy = AccountSortBy;

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
    fn with_sort_by(mut self, sort_by: AccountSortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        for account_type in self.account_types.iter() {
            url.query_pairs_mut()
                .append_pair("type", account_type.to_string().as_str());
        }
        if let Some(currency) = &self.currency {
            url.query_pairs_mut().append_pair("currency", currency);
        }
        add_order_by(&mut url, self.sort_by);
        url
    }
}

impl AccountQuery {
    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_types.push(account_type);
        self
    }
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = Some(currency.to_string());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountSortBy {
    Name,
    Balance,
    CreatedAt,
}

impl std::fmt::Display for AccountSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AccountSortBy::Name => "name",
                AccountSortBy::Balance => "balance",
                AccountSortBy::CreatedAt => "createdAt",
            }
        )
    }
}

impl FromStr for AccountSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(AccountSortBy::Name),
            "balance" => Ok(AccountSortBy::Balance),
            "created" | "createdAt" => Ok(AccountSortBy::CreatedAt),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{AccountQuery, AccountSortBy, Query, SortDirection};
    use crate::types::AccountType;

    #[test]
    fn test_account_query() {
        let url = Url::parse("https://example.com/accounts").unwrap();

        insta::assert_snapshot!(
            AccountQuery::default().add_to_url(&url).to_string(),
            @"https://example.com/accounts?page=1&order=DESC"
        );

        insta::assert_snapshot!(
            AccountQuery::default()
                .with_page(3)
                .with_limit(25)
                .with_account_type(AccountType::Savings)
                .with_account_type(AccountType::CreditCard)
                .with_sort_by(AccountSortBy::Balance)
                .with_sort_direction(SortDirection::Asc)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/accounts?page=3&limit=25&order=ASC&type=savings&type=credit_card&orderBy=balance"
        );
    }
}
