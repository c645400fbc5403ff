use square_tools::data_objects::OrderState;
use thiserror::Error;

use crate::traits::PlatformError;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Invalid catalog request. {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("Invalid cart request. {0}")]
    InvalidRequest(String),
    #[error("Promo code {0} does not exist")]
    UnknownPromoCode(String),
    #[error("Line item {uid} does not exist on order {order_id}")]
    LineItemNotFound { order_id: String, uid: String },
    #[error("Order {order_id} is {state} and can no longer be changed")]
    OrderNotMutable { order_id: String, state: OrderState },
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Invalid checkout request. {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[derive(Debug, Clone, Error)]
pub enum PromoCodeError {
    #[error("Invalid promo code. {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone, Error)]
pub enum SellerError {
    #[error("Invalid seller connection request. {0}")]
    InvalidRequest(String),
    #[error("The seller has no active locations. Supply a location_id explicitly.")]
    NoActiveLocation,
    #[error(transparent)]
    Platform(#[from] PlatformError),
}
