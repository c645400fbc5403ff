use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::sf_api::common_objects::PriceInput;

/// A line-item quantity: a whole number of at least one, given as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

impl QuantityInput {
    pub fn whole_units(&self) -> Result<u32, String> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<i64>().map_err(|_| format!("'{s}' is not a whole number"))?,
        };
        match u32::try_from(value) {
            Ok(q) if q >= 1 => Ok(q),
            _ => Err(format!("Quantity must be at least 1, not {value}")),
        }
    }
}

impl Display for QuantityInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for QuantityInput {
    fn from(q: u32) -> Self {
        Self::Number(i64::from(q))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCart {
    /// Defaults to the location of the request's seller scope.
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub line_items: Vec<NewLineItem>,
}

/// A line item is either catalog-backed (`catalog_object_id`, priced by the catalog) or ad hoc (`name` and `price`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewLineItem {
    #[serde(default)]
    pub catalog_object_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewLineItem {
    pub fn catalog<S: Into<String>>(catalog_object_id: S, quantity: u32) -> Self {
        Self { catalog_object_id: Some(catalog_object_id.into()), quantity: Some(quantity.into()), ..Default::default() }
    }

    pub fn ad_hoc<S: Into<String>>(name: S, price: &str, quantity: u32) -> Self {
        Self { name: Some(name.into()), price: Some(price.into()), quantity: Some(quantity.into()), ..Default::default() }
    }
}

/// Changes to an existing line item. An empty `note` removes the note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemUpdate {
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub note: Option<String>,
}

/// An order-level discount: either a promo code, or a named percentage or fixed amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscountRequest {
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub percentage: Option<PriceInput>,
    #[serde(default)]
    pub amount: Option<PriceInput>,
}

impl DiscountRequest {
    pub fn promo<S: Into<String>>(code: S) -> Self {
        Self { promo_code: Some(code.into()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// A discount to try out. It is applied to the calculation only and never stored on the order.
    #[serde(default)]
    pub discount: Option<DiscountRequest>,
}
