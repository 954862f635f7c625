mod meta;
pub use self::meta::{Meta, Paginated};

mod account;
pub use self::account::{Account, AccountRef, AccountType, CreateAccount, UpdateAccount};

mod category;
pub use self::category::{Category, CategoryKind, CategoryRef, CreateCategory, UpdateCategory};

mod budget;
pub use self::budget::{Budget, CreateBudget, UpdateBudget};

mod transfer;
pub use self::transfer::{CreateTransfer, Transfer, UpdateTransfer};

mod auth;
pub use self::auth::{LoginRequest, LoginResponse};
