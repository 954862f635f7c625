use std::str::FromStr;

use url::Url;

use super::common::{add_order_by, Query, QueryCommon};

#[derive(Clone, Debug, Default)]
pub struct BudgetQuery {
    pub common: QueryCommon,
    /// `YYYY-MM`
    pub month: Option<String>,
    pub category_ids: Vec<String>,
    pub sort_by: Option<BudgetSortBy>,
}

impl Query for BudgetQuery {
    type SortBy = BudgetSortBy;

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
    fn with_sort_by(mut self, sort_by: BudgetSortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(month) = &self.month {
            url.query_pairs_mut().append_pair("month", month);
        }
        for category_id in self.category_ids.iter() {
            url.query_pairs_mut()
                .append_pair("categoryId", category_id);
        }
        add_order_by(&mut url, self.sort_by);
        url
    }
}

impl BudgetQuery {
    pub fn with_month(mut self, month: &str) -> Self {
        self.month = Some(month.to_string());
        self
    }
    pub fn with_category_id(mut self, category_id: &str) -> Self {
        self.category_ids.push(category_id.to_string());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetSortBy {
    Month,
    Amount,
    Spent,
}

impl std::fmt::Display for BudgetSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BudgetSortBy::Month => "month",
                BudgetSortBy::Amount => "amount",
                BudgetSortBy::Spent => "spent",
            }
        )
    }
}

impl FromStr for BudgetSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(BudgetSortBy::Month),
            "amount" => Ok(BudgetSortBy::Amount),
            "spent" => Ok(BudgetSortBy::Spent),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{BudgetQuery, BudgetSortBy, Query};

    #[test]
    fn test_budget_query() {
        let url = Url::parse("https://example.com/budgets").unwrap();

        insta::assert_snapshot!(
            BudgetQuery::default()
                .with_month("2024-03")
                .with_category_id("c1")
                .with_category_id("c2")
                .with_sort_by(BudgetSortBy::Spent)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/budgets?page=1&order=DESC&month=2024-03&categoryId=c1&categoryId=c2&orderBy=spent"
        );
    }
}
