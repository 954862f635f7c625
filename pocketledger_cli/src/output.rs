use anyhow::{bail, Result};
use pocketledger_lib::format::{
    format_cents, format_date, format_datetime, format_money, format_month,
};
use pocketledger_lib::types::{Account, Budget, Category, Transfer};
use pocketledger_lib::Locale;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!(
                "unknown output format '{}'. Valid formats: table, json, csv, markdown",
                other
            ),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct AccountRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Balance")]
    #[serde(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Created")]
    #[serde(rename = "Created")]
    created: String,
}

#[derive(Tabled, Serialize)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    #[serde(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Color")]
    #[serde(rename = "Color")]
    color: String,
}

#[derive(Tabled, Serialize)]
pub struct BudgetRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Month")]
    #[serde(rename = "Month")]
    month: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Budgeted")]
    #[serde(rename = "Budgeted")]
    amount: String,
    #[tabled(rename = "Spent")]
    #[serde(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    #[serde(rename = "Remaining")]
    remaining: String,
}

#[derive(Tabled, Serialize)]
pub struct TransferRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "From")]
    #[serde(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    #[serde(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    #[serde(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    #[serde(rename = "Description")]
    description: String,
}

// -- Row builders --

pub fn build_account_rows(accounts: &[Account], locale: Locale) -> Vec<AccountRow> {
    accounts
        .iter()
        .map(|a| AccountRow {
            id: a.id.clone(),
            name: a.name.clone(),
            account_type: a.account_type.to_string(),
            balance: format_money(a.balance, &a.currency, locale),
            created: format_datetime(a.created_at, locale),
        })
        .collect()
}

pub fn build_category_rows(categories: &[Category], _locale: Locale) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.clone(),
            name: c.name.clone(),
            kind: c.kind.to_string(),
            color: c.color.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn build_budget_rows(budgets: &[Budget], locale: Locale) -> Vec<BudgetRow> {
    budgets
        .iter()
        .map(|b| BudgetRow {
            id: b.id.clone(),
            month: format_month(&b.month),
            category: b.category.name.clone(),
            amount: format_cents(b.amount, locale),
            spent: format_cents(b.spent, locale),
            remaining: format_cents(b.remaining(), locale),
        })
        .collect()
}

pub fn build_transfer_rows(transfers: &[Transfer], locale: Locale) -> Vec<TransferRow> {
    transfers
        .iter()
        .map(|t| TransferRow {
            id: t.id.clone(),
            date: format_date(t.date, locale),
            from: t.source_account.name.clone(),
            to: t.destination_account.name.clone(),
            amount: format_cents(t.amount, locale),
            description: t.description.clone().unwrap_or_default(),
        })
        .collect()
}

// -- Rendering --

pub fn render_table<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).to_string()
}

pub fn render_markdown<R: Tabled>(rows: Vec<R>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    table.to_string()
}

pub fn render_csv<R: Serialize>(rows: Vec<R>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn print_json<T: Serialize + ?Sized>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Prints `rows` in `format`. JSON prints the raw `data` instead, keeping
/// amounts in cents and dates in ISO form.
pub fn emit<T, R>(format: &OutputFormat, data: &[T], rows: Vec<R>) -> Result<()>
where
    T: Serialize,
    R: Tabled + Serialize,
{
    match format {
        OutputFormat::Table => println!("{}", render_table(rows)),
        OutputFormat::Markdown => println!("{}", render_markdown(rows)),
        OutputFormat::Csv => print!("{}", render_csv(rows)?),
        OutputFormat::Json => print_json(data),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture<T: serde::de::DeserializeOwned>(json_str: &str) -> Vec<T> {
        let resp: serde_json::Value = serde_json::from_str(json_str).unwrap();
        serde_json::from_value(resp["data"].clone()).unwrap()
    }

    fn accounts() -> Vec<Account> {
        load_fixture(include_str!("../../pocketledger_api/tests/fixtures/accounts.json"))
    }

    fn transfers() -> Vec<Transfer> {
        load_fixture(include_str!("../../pocketledger_api/tests/fixtures/transfers.json"))
    }

    fn budgets() -> Vec<Budget> {
        load_fixture(include_str!("../../pocketledger_api/tests/fixtures/budgets.json"))
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::parse("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse("csv").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn account_rows_format_money_and_dates() {
        let rows = build_account_rows(&accounts(), Locale::En);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Everyday Checking");
        assert_eq!(rows[0].account_type, "checking");
        assert_eq!(rows[0].balance, "$1,520.75");
        assert_eq!(rows[0].created, "01/15/2024");
    }

    #[test]
    fn account_rows_follow_locale() {
        let rows = build_account_rows(&accounts(), Locale::Es);
        assert_eq!(rows[1].balance, "10.000,00 $");
        assert_eq!(rows[1].created, "01/02/2024");
    }

    #[test]
    fn transfer_rows_use_account_names() {
        let rows = build_transfer_rows(&transfers(), Locale::En);
        assert_eq!(rows[0].from, "Everyday Checking");
        assert_eq!(rows[0].to, "Rainy Day Fund");
        assert_eq!(rows[0].amount, "250.00");
        assert_eq!(rows[0].date, "03/05/2024");
    }

    #[test]
    fn budget_rows_compute_remaining() {
        let rows = build_budget_rows(&budgets(), Locale::En);
        assert!(!rows.is_empty());
        let budget = &budgets()[0];
        assert_eq!(
            rows[0].remaining,
            format_cents(budget.remaining(), Locale::En)
        );
    }

    #[test]
    fn csv_has_renamed_headers() {
        let csv = render_csv(build_transfer_rows(&transfers(), Locale::En)).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID,Date,From,To,Amount,Description"));
        assert_eq!(
            lines.next(),
            Some("tr-1,03/05/2024,Everyday Checking,Rainy Day Fund,250.00,Monthly saving")
        );
    }

    #[test]
    fn markdown_uses_pipes() {
        let md = render_markdown(build_transfer_rows(&transfers(), Locale::En));
        assert!(md.starts_with("| ID"));
        assert!(md.contains("Rainy Day Fund"));
    }

    #[test]
    fn empty_table_still_renders_header() {
        let table = render_table(build_account_rows(&[], Locale::En));
        assert!(table.contains("Balance"));
    }
}
