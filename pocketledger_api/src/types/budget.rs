use serde::{Deserialize, Serialize};

use super::CategoryRef;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: CategoryRef,
    /// Budget month as `YYYY-MM`.
    pub month: String,
    /// Planned amount in cents.
    pub amount: i64,
    /// Amount spent so far in cents, computed by the backend.
    pub spent: i64,
}

impl Budget {
    /// Planned minus spent, saturating at the `i64` bounds.
    pub fn remaining(&self) -> i64 {
        self.amount.saturating_sub(self.spent)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudget {
    pub category_id: String,
    pub month: String,
    pub amount: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}
