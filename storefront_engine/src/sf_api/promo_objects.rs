use std::fmt::Display;

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use square_tools::{
    data_objects::{DiscountScope, DiscountType},
    Money,
    OrderLineItemDiscount,
};

use crate::sf_api::common_objects::{format_hundredths, PriceInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    #[serde(alias = "fixed_amount", alias = "amount")]
    Fixed,
}

impl Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

/// A validated discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRule {
    /// In hundredths of a percent, so `1250` is 12.5%. Always in `1..=10_000`.
    Percentage(i64),
    /// In minor units of the store currency. Always positive.
    FixedAmount(i64),
}

impl DiscountRule {
    pub fn new(kind: DiscountKind, value: &PriceInput) -> Result<Self, String> {
        let hundredths = value.hundredths()?;
        match kind {
            DiscountKind::Percentage if hundredths <= 0 || hundredths > 10_000 => {
                Err(format!("A percentage discount must be greater than 0 and at most 100, not {value}"))
            },
            DiscountKind::Percentage => Ok(Self::Percentage(hundredths)),
            DiscountKind::Fixed if hundredths <= 0 => Err(format!("A fixed discount must be positive, not {value}")),
            DiscountKind::Fixed => Ok(Self::FixedAmount(hundredths)),
        }
    }

    pub fn kind(&self) -> DiscountKind {
        match self {
            Self::Percentage(_) => DiscountKind::Percentage,
            Self::FixedAmount(_) => DiscountKind::Fixed,
        }
    }

    /// The value as a decimal string in major units (or percent), e.g. `"12.50"`.
    pub fn display_value(&self) -> String {
        match self {
            Self::Percentage(v) | Self::FixedAmount(v) => format_hundredths(*v),
        }
    }

    /// Builds the order-level discount the platform expects for this rule.
    pub fn to_order_discount(&self, name: &str, currency: &str) -> OrderLineItemDiscount {
        let mut discount = OrderLineItemDiscount {
            name: Some(name.to_string()),
            scope: Some(DiscountScope::Order),
            ..Default::default()
        };
        match self {
            Self::Percentage(v) => {
                discount.discount_type = Some(DiscountType::FixedPercentage);
                discount.percentage = Some(format_hundredths(*v));
            },
            Self::FixedAmount(v) => {
                discount.discount_type = Some(DiscountType::FixedAmount);
                discount.amount_money = Some(Money::new(*v, currency));
            },
        }
        discount
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    /// Normalised: trimmed and upper-case.
    pub code: String,
    /// The name shown to shoppers on the order.
    pub name: String,
    pub rule: DiscountRule,
}

impl Serialize for PromoCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PromoCode", 4)?;
        s.serialize_field("code", &self.code)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("type", &self.rule.kind())?;
        s.serialize_field("value", &self.rule.display_value())?;
        s.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPromoCode {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: PriceInput,
    #[serde(default)]
    pub name: Option<String>,
}
