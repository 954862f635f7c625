//! Flattened, display-formatted projections of domain entities.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use pocketledger_api::types::{Account, Budget, Category, Transfer};

use crate::format::{
    format_cents, format_date, format_datetime, format_money, format_month, Locale,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportColumn {
    pub id: String,
    pub label: String,
}

impl ReportColumn {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Column id → display string. Built once at export time and not mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRow(BTreeMap<String, String>);

impl ReportRow {
    pub fn get(&self, column_id: &str) -> &str {
        self.0.get(column_id).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReportRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ReportRow(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Raw value used for client-side sorting, so amounts and dates sort by
/// magnitude instead of by their formatted text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Missing,
    Number(i64),
    Date(NaiveDate),
    Text(String),
}

impl SortValue {
    fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }
}

/// Entities that can be exported as a report.
pub trait Reportable {
    fn columns() -> Vec<ReportColumn>;

    fn to_row(&self, locale: Locale) -> ReportRow;

    fn sort_value(&self, column_id: &str) -> SortValue;
}

/// A titled table ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub name: String,
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(name: &str, columns: Vec<ReportColumn>, rows: Vec<ReportRow>) -> Self {
        Self {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    pub fn from_items<T: Reportable>(name: &str, items: &[T], locale: Locale) -> Self {
        Self::new(
            name,
            T::columns(),
            items.iter().map(|item| item.to_row(locale)).collect(),
        )
    }

    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Cell values of each row in column order.
    pub fn body(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|c| row.get(&c.id)).collect())
            .collect()
    }
}

pub(crate) fn compare_sort_values(a: &SortValue, b: &SortValue) -> Ordering {
    a.cmp(b)
}

impl Reportable for Account {
    fn columns() -> Vec<ReportColumn> {
        vec![
            ReportColumn::new("name", "Name"),
            ReportColumn::new("type", "Type"),
            ReportColumn::new("balance", "Balance"),
            ReportColumn::new("currency", "Currency"),
            ReportColumn::new("description", "Description"),
            ReportColumn::new("createdAt", "Created"),
        ]
    }

    fn to_row(&self, locale: Locale) -> ReportRow {
        ReportRow::from_iter([
            ("name", self.name.clone()),
            ("type", account_type_label(self).to_string()),
            ("balance", format_money(self.balance, &self.currency, locale)),
            ("currency", self.currency.clone()),
            ("description", self.description.clone().unwrap_or_default()),
            ("createdAt", format_datetime(self.created_at, locale)),
        ])
    }

    fn sort_value(&self, column_id: &str) -> SortValue {
        match column_id {
            "name" => SortValue::text(&self.name),
            "type" => SortValue::text(account_type_label(self)),
            "balance" => SortValue::Number(self.balance),
            "currency" => SortValue::text(&self.currency),
            "description" => self
                .description
                .as_deref()
                .map(SortValue::text)
                .unwrap_or(SortValue::Missing),
            "createdAt" => SortValue::Date(self.created_at.date_naive()),
            _ => SortValue::Missing,
        }
    }
}

fn account_type_label(account: &Account) -> &'static str {
    use pocketledger_api::types::AccountType;
    match account.account_type {
        AccountType::Checking => "Checking",
        AccountType::Savings => "Savings",
        AccountType::Cash => "Cash",
        AccountType::CreditCard => "Credit card",
        AccountType::Investment => "Investment",
    }
}

impl Reportable for Category {
    fn columns() -> Vec<ReportColumn> {
        vec![
            ReportColumn::new("name", "Name"),
            ReportColumn::new("kind", "Kind"),
            ReportColumn::new("color", "Color"),
            ReportColumn::new("description", "Description"),
        ]
    }

    fn to_row(&self, _locale: Locale) -> ReportRow {
        use pocketledger_api::types::CategoryKind;
        ReportRow::from_iter([
            ("name", self.name.clone()),
            (
                "kind",
                match self.kind {
                    CategoryKind::Income => "Income".to_string(),
                    CategoryKind::Expense => "Expense".to_string(),
                },
            ),
            ("color", self.color.clone().unwrap_or_default()),
            ("description", self.description.clone().unwrap_or_default()),
        ])
    }

    fn sort_value(&self, column_id: &str) -> SortValue {
        match column_id {
            "name" => SortValue::text(&self.name),
            "kind" => SortValue::text(&self.kind.to_string()),
            "color" => self
                .color
                .as_deref()
                .map(SortValue::text)
                .unwrap_or(SortValue::Missing),
            "description" => self
                .description
                .as_deref()
                .map(SortValue::text)
                .unwrap_or(SortValue::Missing),
            _ => SortValue::Missing,
        }
    }
}

impl Reportable for Budget {
    fn columns() -> Vec<ReportColumn> {
        vec![
            ReportColumn::new("month", "Month"),
            ReportColumn::new("category", "Category"),
            ReportColumn::new("amount", "Budgeted"),
            ReportColumn::new("spent", "Spent"),
            ReportColumn::new("remaining", "Remaining"),
        ]
    }

    fn to_row(&self, locale: Locale) -> ReportRow {
        ReportRow::from_iter([
            ("month", format_month(&self.month)),
            ("category", self.category.name.clone()),
            ("amount", format_cents(self.amount, locale)),
            ("spent", format_cents(self.spent, locale)),
            ("remaining", format_cents(self.remaining(), locale)),
        ])
    }

    fn sort_value(&self, column_id: &str) -> SortValue {
        match column_id {
            "month" => SortValue::Text(self.month.clone()),
            "category" => SortValue::text(&self.category.name),
            "amount" => SortValue::Number(self.amount),
            "spent" => SortValue::Number(self.spent),
            "remaining" => SortValue::Number(self.remaining()),
            _ => SortValue::Missing,
        }
    }
}

impl Reportable for Transfer {
    fn columns() -> Vec<ReportColumn> {
        vec![
            ReportColumn::new("date", "Date"),
            ReportColumn::new("from", "From"),
            ReportColumn::new("to", "To"),
            ReportColumn::new("amount", "Amount"),
            ReportColumn::new("description", "Description"),
        ]
    }

    fn to_row(&self, locale: Locale) -> ReportRow {
        ReportRow::from_iter([
            ("date", format_date(self.date, locale)),
            ("from", self.source_account.name.clone()),
            ("to", self.destination_account.name.clone()),
            ("amount", format_cents(self.amount, locale)),
            ("description", self.description.clone().unwrap_or_default()),
        ])
    }

    fn sort_value(&self, column_id: &str) -> SortValue {
        match column_id {
            "date" => SortValue::Date(self.date),
            "from" => SortValue::text(&self.source_account.name),
            "to" => SortValue::text(&self.destination_account.name),
            "amount" => SortValue::Number(self.amount),
            "description" => self
                .description
                .as_deref()
                .map(SortValue::text)
                .unwrap_or(SortValue::Missing),
            _ => SortValue::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pocketledger_api::types::{AccountRef, AccountType, CategoryRef};

    use super::*;

    fn account() -> Account {
        Account {
            id: "acc-1".to_string(),
            name: "Everyday Checking".to_string(),
            account_type: AccountType::Checking,
            balance: 152075,
            currency: "USD".to_string(),
            description: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn header_and_body_follow_column_order() {
        let report = Report::new(
            "Clients",
            vec![ReportColumn::new("name", "Nombre")],
            vec![ReportRow::from_iter([("name", "Acme")])],
        );
        assert_eq!(report.header(), vec!["Nombre"]);
        assert_eq!(report.body(), vec![vec!["Acme"]]);
    }

    #[test]
    fn missing_cells_render_empty() {
        let report = Report::new(
            "x",
            vec![ReportColumn::new("a", "A"), ReportColumn::new("b", "B")],
            vec![ReportRow::from_iter([("b", "2")])],
        );
        assert_eq!(report.body(), vec![vec!["", "2"]]);
    }

    #[test]
    fn account_row_is_formatted() {
        let row = account().to_row(Locale::En);
        assert_eq!(row.get("name"), "Everyday Checking");
        assert_eq!(row.get("type"), "Checking");
        assert_eq!(row.get("balance"), "$1,520.75");
        assert_eq!(row.get("description"), "");
        assert_eq!(row.get("createdAt"), "01/15/2024");
    }

    #[test]
    fn budget_row_computes_remaining() {
        let budget = Budget {
            id: "b".to_string(),
            category: CategoryRef {
                id: "c".to_string(),
                name: "Groceries".to_string(),
            },
            month: "2024-03".to_string(),
            amount: 40000,
            spent: 41250,
        };
        let row = budget.to_row(Locale::Es);
        assert_eq!(row.get("month"), "03/2024");
        assert_eq!(row.get("amount"), "400,00");
        assert_eq!(row.get("remaining"), "-12,50");
        assert_eq!(budget.sort_value("remaining"), SortValue::Number(-1250));
    }

    #[test]
    fn remaining_saturates_instead_of_overflowing() {
        let budget = Budget {
            id: "b".to_string(),
            category: CategoryRef {
                id: "c".to_string(),
                name: "Debt".to_string(),
            },
            month: "2024-03".to_string(),
            amount: i64::MIN,
            spent: 1,
        };
        assert_eq!(budget.sort_value("remaining"), SortValue::Number(i64::MIN));
        assert_eq!(
            budget.to_row(Locale::En).get("remaining"),
            "-92,233,720,368,547,758.08"
        );
    }

    #[test]
    fn transfer_row_uses_account_names() {
        let transfer = Transfer {
            id: "t".to_string(),
            source_account: AccountRef {
                id: "a".to_string(),
                name: "Checking".to_string(),
            },
            destination_account: AccountRef {
                id: "b".to_string(),
                name: "Savings".to_string(),
            },
            amount: 25000,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            description: Some("Monthly saving".to_string()),
        };
        let report = Report::from_items("Transfers", &[transfer], Locale::En);
        assert_eq!(report.header(), vec!["Date", "From", "To", "Amount", "Description"]);
        assert_eq!(
            report.body(),
            vec![vec!["03/05/2024", "Checking", "Savings", "250.00", "Monthly saving"]]
        );
    }

    #[test]
    fn sort_values_order_by_kind() {
        assert!(SortValue::Missing < SortValue::Number(0));
        assert!(SortValue::Number(-5) < SortValue::Number(3));
        assert_eq!(
            compare_sort_values(&SortValue::text("b"), &SortValue::text("A")),
            Ordering::Greater
        );
    }
}
