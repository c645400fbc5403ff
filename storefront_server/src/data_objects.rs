use serde::{Deserialize, Serialize};
use square_tools::Order;
use storefront_engine::sf_api::{promo_objects::PromoCode, seller_objects::SellerStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self { order }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromoCodeResponse {
    pub promo_code: PromoCode,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromoCodesResponse {
    pub promo_codes: Vec<PromoCode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerConnectionResponse {
    pub connected: bool,
    pub seller: Option<SellerStatus>,
}

impl From<Option<SellerStatus>> for SellerConnectionResponse {
    fn from(seller: Option<SellerStatus>) -> Self {
        Self { connected: seller.is_some(), seller }
    }
}
