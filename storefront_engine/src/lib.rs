//! Storefront Engine
//!
//! The storefront engine holds the logic of the storefront gateway: it validates storefront requests, turns them into
//! payment-platform payloads and hands them to a platform backend. It owns no data of its own apart from the promo-code
//! table and the connected-seller record, both of which live in memory for the lifetime of the process.
//!
//! The library is divided into two main sections:
//! 1. The backend contracts ([`mod@traits`]). A platform backend implements [`CatalogManagement`],
//!    [`OrderManagement`], [`CheckoutManagement`] and [`LocationManagement`]. Every call receives the [`SellerScope`]
//!    it runs under, so that one backend instance can serve many sellers. The Square client implements all of them
//!    (feature `square`, enabled by default).
//! 2. The storefront public API ([`mod@sf_api`]). [`CatalogApi`], [`CartApi`], [`CheckoutApi`], [`PromoCodeApi`] and
//!    [`SellerApi`] are what the HTTP server talks to.
//!
//! Order changes are always read-modify-write: the order is fetched, the change is stamped with the version that was
//! just read, and the platform refuses the write if somebody else got there first.
pub mod sf_api;
pub mod traits;

#[cfg(feature = "square")]
mod square;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use sf_api::{
    cart_api::CartApi,
    catalog_api::CatalogApi,
    checkout_api::CheckoutApi,
    errors::{CartError, CatalogError, CheckoutError, PromoCodeError, SellerError},
    promo_code_api::PromoCodeApi,
    seller_api::{ConnectedSeller, SellerApi},
};
pub use traits::{
    CatalogManagement,
    CheckoutManagement,
    LocationManagement,
    OrderManagement,
    PlatformError,
    SellerScope,
};
