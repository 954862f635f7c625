//! Display formatting for money and dates.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    /// `1,234.56`, `03/15/2024`
    #[default]
    En,
    /// `1.234,56`, `15/03/2024`
    Es,
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            "es" | "es-es" | "es_es" | "es-co" | "es-mx" => Ok(Locale::Es),
            _ => Err(()),
        }
    }
}

impl Locale {
    fn separators(self) -> (char, char) {
        match self {
            Locale::En => (',', '.'),
            Locale::Es => ('.', ','),
        }
    }
}

pub fn currency_symbol(code: &str) -> &str {
    match code {
        "USD" | "MXN" | "COP" | "ARS" | "CLP" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

fn group_thousands(mut value: u64, separator: char) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();
    groups.join(&separator.to_string())
}

/// Formats an amount in cents without a currency symbol: `-1,234.56`.
pub fn format_cents(cents: i64, locale: Locale) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}", sign, format_magnitude(cents.unsigned_abs(), locale))
}

fn format_magnitude(abs: u64, locale: Locale) -> String {
    let (thousands, decimal) = locale.separators();
    format!(
        "{}{}{:02}",
        group_thousands(abs / 100, thousands),
        decimal,
        abs % 100
    )
}

/// Formats an amount in cents with its currency: `$1,234.56` or `1.234,56 €`.
pub fn format_money(cents: i64, currency: &str, locale: Locale) -> String {
    let symbol = currency_symbol(currency);
    let amount = format_magnitude(cents.unsigned_abs(), locale);
    let sign = if cents < 0 { "-" } else { "" };
    match locale {
        Locale::En if symbol.chars().count() == 1 => format!("{}{}{}", sign, symbol, amount),
        Locale::En => format!("{}{} {}", sign, symbol, amount),
        Locale::Es => format!("{}{} {}", sign, amount, symbol),
    }
}

pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::En => date.format("%m/%d/%Y").to_string(),
        Locale::Es => date.format("%d/%m/%Y").to_string(),
    }
}

pub fn format_datetime(datetime: DateTime<Utc>, locale: Locale) -> String {
    format_date(datetime.date_naive(), locale)
}

/// `YYYY-MM` → `MM/YYYY`; anything else is returned unchanged.
pub fn format_month(month: &str) -> String {
    match month.split_once('-') {
        Some((year, mm)) if year.len() == 4 && mm.len() == 2 => format!("{}/{}", mm, year),
        _ => month.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_use_locale_separators() {
        assert_eq!(format_cents(123456, Locale::En), "1,234.56");
        assert_eq!(format_cents(123456, Locale::Es), "1.234,56");
        assert_eq!(format_cents(5, Locale::En), "0.05");
        assert_eq!(format_cents(-100000001, Locale::En), "-1,000,000.01");
    }

    #[test]
    fn money_places_symbol_by_locale() {
        assert_eq!(format_money(152075, "USD", Locale::En), "$1,520.75");
        assert_eq!(format_money(-2500, "EUR", Locale::En), "-€25.00");
        assert_eq!(format_money(152075, "EUR", Locale::Es), "1.520,75 €");
        assert_eq!(format_money(100, "CHF", Locale::En), "CHF 1.00");
    }

    #[test]
    fn extreme_amounts_do_not_overflow() {
        assert_eq!(format_cents(i64::MIN, Locale::En), "-92,233,720,368,547,758.08");
        assert_eq!(
            format_money(i64::MIN, "USD", Locale::En),
            "-$92,233,720,368,547,758.08"
        );
    }

    #[test]
    fn dates_follow_locale_order() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(format_date(date, Locale::En), "03/15/2024");
        assert_eq!(format_date(date, Locale::Es), "15/03/2024");
    }

    #[test]
    fn month_is_reordered() {
        assert_eq!(format_month("2024-03"), "03/2024");
        assert_eq!(format_month("March"), "March");
    }

    #[test]
    fn locale_parses_common_tags() {
        assert_eq!("es-CO".parse::<Locale>(), Ok(Locale::Es));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }
}
