use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AccountRef;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub source_account: AccountRef,
    pub destination_account: AccountRef,
    /// Transferred amount in cents, always positive.
    pub amount: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransfer {
    pub source_account_id: String,
    pub destination_account_id: String,
    pub amount: i64,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransfer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
