use uuid::Uuid;

use crate::SquareApiError;

/// Every mutating Square call must carry a unique idempotency key.
pub fn new_idempotency_key() -> String {
    Uuid::new_v4().to_string()
}

/// Converts a decimal price string in major units ("12", "12.5", "12.50") into minor units (1200, 1250, 1250).
///
/// At most two decimal places are accepted, and negative prices are rejected.
pub fn parse_price(price: &str) -> Result<i64, SquareApiError> {
    let price = price.trim();
    let invalid = |reason: &str| SquareApiError::InvalidCurrencyAmount(format!("Invalid price value: {price}. {reason}"));
    if price.starts_with('-') {
        return Err(invalid("Prices cannot be negative."));
    }
    let mut parts = price.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().map_err(|e| invalid(&e.to_string()))?
    };
    let cents = match parts.next() {
        None => 0,
        Some(frac) if frac.is_empty() || frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) => {
            return Err(invalid("Expected at most two decimal places."));
        },
        Some(frac) if frac.len() == 1 => frac.parse::<i64>().map_err(|e| invalid(&e.to_string()))? * 10,
        Some(frac) => frac.parse::<i64>().map_err(|e| invalid(&e.to_string()))?,
    };
    if whole.is_empty() && cents == 0 && !price.contains('.') {
        return Err(invalid("Empty price."));
    }
    whole_units
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(|| invalid("Price is too large."))
}

/// Square quantities are decimal strings. The gateway only deals in whole units.
pub fn format_quantity(quantity: u32) -> String {
    quantity.to_string()
}
