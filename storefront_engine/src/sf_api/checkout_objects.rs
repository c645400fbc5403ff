use serde::{Deserialize, Serialize};
use square_tools::{Money, PaymentLink};

use crate::sf_api::common_objects::PriceInput;

pub const BASIS_POINTS_PER_UNIT: u32 = 10_000;

/// A request for a hosted checkout page. Exactly one of `order_id` or `quick_pay` must be given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub quick_pay: Option<QuickPayRequest>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ask_for_shipping_address: Option<bool>,
}

/// A one-off payment for a named amount, without a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickPayRequest {
    pub name: String,
    pub price: PriceInput,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLink {
    pub payment_link_id: String,
    pub url: String,
    pub long_url: Option<String>,
    /// The order created by the platform for this link. It is a new order, even for links created from a cart.
    pub order_id: Option<String>,
    pub app_fee_money: Option<Money>,
}

impl From<PaymentLink> for CheckoutLink {
    fn from(link: PaymentLink) -> Self {
        let app_fee_money = link.checkout_options.and_then(|o| o.app_fee_money);
        Self { payment_link_id: link.id, url: link.url, long_url: link.long_url, order_id: link.order_id, app_fee_money }
    }
}

/// The platform's cut of payments taken on behalf of connected sellers, in basis points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFee {
    pub basis_points: u32,
}

impl PlatformFee {
    pub fn new(basis_points: u32) -> Self {
        Self { basis_points: basis_points.min(BASIS_POINTS_PER_UNIT) }
    }

    /// `floor(total * bps / 10_000)`, never more than the total and never negative.
    pub fn fee_for(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let fee = i128::from(total) * i128::from(self.basis_points) / i128::from(BASIS_POINTS_PER_UNIT);
        i64::try_from(fee).unwrap_or(total).min(total)
    }
}
