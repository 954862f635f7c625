use std::sync::OnceLock;

use chrono::NaiveDate;
use pocketledger_api::types::{AccountType, CategoryKind};
use regex::Regex;

use crate::error::FinanceError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_NAME_LENGTH: usize = 60;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
/// Largest accepted amount, in cents (one trillion units).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000_000;

pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "MXN", "COP", "ARS", "CLP", "CHF", "CAD",
];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, FinanceError> {
    if input.len() > max_len {
        return Err(FinanceError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(FinanceError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a search string: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, FinanceError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate an account, category or budget name.
pub fn validate_name(input: &str) -> Result<String, FinanceError> {
    sanitize_text(input, MAX_NAME_LENGTH)
        .map_err(|e| FinanceError::InvalidInput(format!("name: {}", inner_message(e))))
}

pub fn validate_description(input: &str) -> Result<String, FinanceError> {
    sanitize_text(input, MAX_DESCRIPTION_LENGTH)
        .map_err(|e| FinanceError::InvalidInput(format!("description: {}", inner_message(e))))
}

fn inner_message(err: FinanceError) -> String {
    match err {
        FinanceError::InvalidInput(msg) => msg,
        other => other.to_string(),
    }
}

pub fn validate_page(page: i64) -> Result<i64, FinanceError> {
    if page < 1 {
        return Err(FinanceError::InvalidInput(
            "page must be 1 or greater".to_string(),
        ));
    }
    Ok(page)
}

pub fn validate_page_size(page_size: i64) -> Result<i64, FinanceError> {
    if !(1..=100).contains(&page_size) {
        return Err(FinanceError::InvalidInput(
            "page_size must be between 1 and 100".to_string(),
        ));
    }
    Ok(page_size)
}

/// Validate a YYYY-MM-DD date string.
pub fn validate_date(input: &str) -> Result<NaiveDate, FinanceError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        FinanceError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        ))
    })
}

/// Both bounds are optional; when both are present the start must not be after the end.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), FinanceError> {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(FinanceError::InvalidInput(format!(
                "start date {} is after end date {}",
                s, e
            )));
        }
    }
    Ok((start, end))
}

/// Validate a budget month in `YYYY-MM` form.
pub fn validate_month(input: &str) -> Result<String, FinanceError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .ok()
        .filter(|_| trimmed.len() == 7)
        .map(|_| trimmed.to_string())
        .ok_or_else(|| {
            FinanceError::InvalidInput(format!(
                "invalid month '{}'. Expected format: YYYY-MM (e.g., 2024-06)",
                trimmed
            ))
        })
}

/// Parse a user-entered amount into cents.
///
/// Accepts an optional leading `-`, `,` thousands separators and at most two
/// decimals: `"1,234.5"` → `123450`.
pub fn parse_amount_to_cents(input: &str) -> Result<i64, FinanceError> {
    let invalid = || {
        FinanceError::InvalidInput(format!(
            "invalid amount '{}'. Expected a number with up to two decimals (e.g., 1,234.56)",
            input.trim()
        ))
    };
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
    let (whole, fraction) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
        || fraction.len() > 2
    {
        return Err(invalid());
    }
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .filter(|c| *c <= MAX_AMOUNT_CENTS)
        .ok_or_else(invalid)?;
    Ok(if negative { -cents } else { cents })
}

/// Amounts that must be strictly positive (budgets, transfers).
pub fn validate_positive_amount(input: &str) -> Result<i64, FinanceError> {
    let cents = parse_amount_to_cents(input)?;
    if cents <= 0 {
        return Err(FinanceError::InvalidInput(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(cents)
}

pub fn validate_currency(input: &str) -> Result<String, FinanceError> {
    let upper = input.trim().to_uppercase();
    if SUPPORTED_CURRENCIES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(FinanceError::InvalidInput(format!(
            "unsupported currency '{}'. Valid values: {}",
            input,
            SUPPORTED_CURRENCIES.join(", ")
        )))
    }
}

pub fn validate_account_type(input: &str) -> Result<AccountType, FinanceError> {
    match input.trim().to_lowercase().replace('-', "_").as_str() {
        "checking" => Ok(AccountType::Checking),
        "savings" => Ok(AccountType::Savings),
        "cash" => Ok(AccountType::Cash),
        "credit_card" | "credit" => Ok(AccountType::CreditCard),
        "investment" => Ok(AccountType::Investment),
        _ => Err(FinanceError::InvalidInput(format!(
            "unknown account type '{}'. Valid values: checking, savings, cash, credit-card, investment",
            input
        ))),
    }
}

pub fn validate_category_kind(input: &str) -> Result<CategoryKind, FinanceError> {
    match input.trim().to_lowercase().as_str() {
        "income" | "i" => Ok(CategoryKind::Income),
        "expense" | "e" => Ok(CategoryKind::Expense),
        _ => Err(FinanceError::InvalidInput(format!(
            "unknown category kind '{}'. Valid values: income (i), expense (e)",
            input
        ))),
    }
}

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"))
}

/// Validate a `#rgb` or `#rrggbb` color, returned lowercase.
pub fn validate_color(input: &str) -> Result<String, FinanceError> {
    let trimmed = input.trim();
    if hex_color_re().is_match(trimmed) {
        Ok(trimmed.to_lowercase())
    } else {
        Err(FinanceError::InvalidInput(format!(
            "invalid color '{}'. Expected a hex color such as #22aa55",
            trimmed
        )))
    }
}

/// A transfer needs two different accounts.
pub fn validate_transfer_accounts(source: &str, destination: &str) -> Result<(), FinanceError> {
    if source.trim().is_empty() || destination.trim().is_empty() {
        return Err(FinanceError::InvalidInput(
            "source and destination accounts are required".to_string(),
        ));
    }
    if source.trim() == destination.trim() {
        return Err(FinanceError::InvalidInput(
            "source and destination accounts must be different".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Text --

    #[test]
    fn search_strips_control_chars() {
        assert_eq!(validate_search("  rent\u{0007} ").unwrap(), "rent");
    }

    #[test]
    fn search_too_long() {
        assert!(validate_search(&"a".repeat(MAX_SEARCH_LENGTH + 1)).is_err());
    }

    #[test]
    fn name_empty_after_trim() {
        let err = validate_name("   ").unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    // -- Paging --

    #[test]
    fn page_bounds() {
        assert!(validate_page(0).is_err());
        assert_eq!(validate_page(3).unwrap(), 3);
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(101).is_err());
        assert_eq!(validate_page_size(100).unwrap(), 100);
    }

    // -- Dates --

    #[test]
    fn date_valid_and_invalid() {
        assert_eq!(
            validate_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(validate_date("06/01/2024").is_err());
    }

    #[test]
    fn date_range_order() {
        let early = NaiveDate::from_ymd_opt(2024, 1, 1);
        let late = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(validate_date_range(early, late).is_ok());
        assert!(validate_date_range(late, early).is_err());
        assert!(validate_date_range(late, None).is_ok());
    }

    #[test]
    fn month_format() {
        assert_eq!(validate_month("2024-03").unwrap(), "2024-03");
        assert!(validate_month("2024-13").is_err());
        assert!(validate_month("2024-3").is_err());
        assert!(validate_month("March").is_err());
    }

    // -- Money --

    #[test]
    fn amount_to_cents() {
        assert_eq!(parse_amount_to_cents("1,234.56").unwrap(), 123456);
        assert_eq!(parse_amount_to_cents("1234.5").unwrap(), 123450);
        assert_eq!(parse_amount_to_cents("12").unwrap(), 1200);
        assert_eq!(parse_amount_to_cents(".99").unwrap(), 99);
        assert_eq!(parse_amount_to_cents("-25.00").unwrap(), -2500);
    }

    #[test]
    fn amount_rejects_garbage() {
        assert!(parse_amount_to_cents("").is_err());
        assert!(parse_amount_to_cents("-").is_err());
        assert!(parse_amount_to_cents("12.345").is_err());
        assert!(parse_amount_to_cents("1e5").is_err());
        assert!(parse_amount_to_cents("12.3.4").is_err());
        assert!(parse_amount_to_cents("99999999999999999999").is_err());
    }

    #[test]
    fn positive_amount() {
        assert!(validate_positive_amount("0").is_err());
        assert!(validate_positive_amount("-5").is_err());
        assert_eq!(validate_positive_amount("0.01").unwrap(), 1);
    }

    #[test]
    fn currency_codes() {
        assert_eq!(validate_currency("usd").unwrap(), "USD");
        assert!(validate_currency("XYZ").is_err());
    }

    // -- Enums --

    #[test]
    fn account_types() {
        assert_eq!(
            validate_account_type("credit-card").unwrap(),
            AccountType::CreditCard
        );
        assert_eq!(validate_account_type("Savings").unwrap(), AccountType::Savings);
        assert!(validate_account_type("loan").is_err());
    }

    #[test]
    fn category_kinds() {
        assert_eq!(validate_category_kind("e").unwrap(), CategoryKind::Expense);
        assert_eq!(validate_category_kind("INCOME").unwrap(), CategoryKind::Income);
        assert!(validate_category_kind("transfer").is_err());
    }

    #[test]
    fn colors() {
        assert_eq!(validate_color("#22AA55").unwrap(), "#22aa55");
        assert_eq!(validate_color("#fff").unwrap(), "#fff");
        assert!(validate_color("22aa55").is_err());
        assert!(validate_color("#22aa5").is_err());
    }

    #[test]
    fn transfer_accounts_must_differ() {
        assert!(validate_transfer_accounts("a", "b").is_ok());
        assert!(validate_transfer_accounts("a", "a").is_err());
        assert!(validate_transfer_accounts("", "b").is_err());
    }
}
