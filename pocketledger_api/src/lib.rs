mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{
    AccountQuery, AccountSortBy, BudgetQuery, BudgetSortBy, CategoryQuery, CategorySortBy, Query,
    QueryCommon, SortDirection, TransferQuery, TransferSortBy,
};
