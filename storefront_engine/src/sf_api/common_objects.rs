use std::fmt::Display;

use serde::{Deserialize, Serialize};
use square_tools::helpers::parse_price;

/// A price (or discount value) as supplied by storefront clients, in major units: either a JSON number (`12.5`) or a
/// decimal string (`"12.50"`). At most two decimal places are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    /// The value in hundredths: cents for prices, hundredths of a percent for percentages.
    pub fn hundredths(&self) -> Result<i64, String> {
        let text = self.to_string();
        parse_price(&text).map_err(|e| e.to_string())
    }
}

impl Display for PriceInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for PriceInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Formats a value in hundredths as a decimal string, e.g. `1250` => `"12.50"`.
pub fn format_hundredths(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let value = value.abs();
    format!("{sign}{}.{:02}", value / 100, value % 100)
}

/// Trims `value` and fails with a validation message naming `field` if nothing is left.
pub fn require_non_blank(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("'{field}' is required and cannot be blank"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Like [`require_non_blank`], but blank optional values are treated as absent.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// ISO 4217 currency codes are three ASCII letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// The currency named in a request, upper-cased, or `default` when none is given.
pub fn currency_or(value: Option<&str>, default: &str) -> Result<String, String> {
    match non_blank(value) {
        None => Ok(default.to_string()),
        Some(code) if is_currency_code(&code) => Ok(code.to_uppercase()),
        Some(code) => Err(format!("'{code}' is not a three-letter currency code")),
    }
}
