//! #  Platform backend contracts.
//!
//! The storefront never talks to the payment platform directly. Instead, each API in [`crate::sf_api`] is generic over
//! one of the traits below, which keeps the request-shaping logic testable without a network.
//!
//! * [`CatalogManagement`] creates and searches catalog items.
//! * [`OrderManagement`] creates, fetches, updates and prices orders.
//! * [`CheckoutManagement`] creates hosted payment links.
//! * [`LocationManagement`] lists a seller's business locations.
//!
//! Every method takes a [`SellerScope`]. A scope without an access token means "act with the platform's own
//! credentials".
mod catalog_management;
mod checkout_management;
mod data_objects;
mod location_management;
mod order_management;

pub use catalog_management::CatalogManagement;
pub use checkout_management::CheckoutManagement;
pub use data_objects::{PlatformError, SellerScope};
pub use location_management::LocationManagement;
pub use order_management::OrderManagement;
