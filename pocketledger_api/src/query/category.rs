use std::str::FromStr;

use url::Url;

use crate::types::CategoryKind;

use super::common::{add_order_by, Query, QueryCommon};

#[derive(Clone, Debug, Default)]
pub struct CategoryQuery {
    pub common: QueryCommon,
    pub kind: Option<CategoryKind>,
    pub sort_by: Option<CategorySortBy>,
}

impl Query for CategoryQuery {
    type SortBy = CategorySortBy;

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
    fn with_sort_by(mut self, sort_by: CategorySortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(kind) = self.kind {
            url.query_pairs_mut()
                .append_pair("kind", kind.to_string().as_str());
        }
        add_order_by(&mut url, self.sort_by);
        url
    }
}

impl CategoryQuery {
    pub fn with_kind(mut self, kind: CategoryKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategorySortBy {
    Name,
    Kind,
}

impl std::fmt::Display for CategorySortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CategorySortBy::Name => "name",
                CategorySortBy::Kind => "kind",
            }
        )
    }
}

impl FromStr for CategorySortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(CategorySortBy::Name),
            "kind" => Ok(CategorySortBy::Kind),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{CategoryQuery, CategorySortBy, Query};
    use crate::types::CategoryKind;

    #[test]
    fn test_category_query() {
        let url = Url::parse("https://example.com/categories").unwrap();

        insta::assert_snapshot!(
            CategoryQuery::default()
                .with_kind(CategoryKind::Expense)
                .with_search("food & drinks")
                .with_sort_by(CategorySortBy::Name)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/categories?page=1&order=DESC&search=food+%26+drinks&kind=expense&orderBy=name"
        );
    }
}
