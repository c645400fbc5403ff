//! A small, typed client for the Square REST API.
//!
//! Only the endpoints the storefront gateway needs are covered: catalog upserts and searches, orders (create, retrieve,
//! sparse update, calculate), online checkout payment links and locations.
mod api;
mod config;
mod error;

pub mod data_objects;
pub mod helpers;

pub use api::SquareApi;
pub use config::{SquareConfig, SquareEnvironment};
pub use data_objects::{
    CatalogObject,
    CatalogObjectType,
    CatalogUpsertResult,
    Location,
    Money,
    Order,
    OrderLineItem,
    OrderLineItemDiscount,
    OrderUpdate,
    PaymentLink,
};
pub use error::{SquareApiError, SquareErrorDetail};
