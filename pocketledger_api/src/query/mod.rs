mod common;
pub use self::common::{Query, QueryCommon, SortDirection};
mod account;
pub use self::account::{AccountQuery, AccountSortBy};

mod category;
pub use self::category::{CategoryQuery, CategorySortBy};

mod budget;
pub use self::budget::{BudgetQuery, BudgetSortBy};

mod transfer;
pub use self::transfer::{TransferQuery, TransferSortBy};
