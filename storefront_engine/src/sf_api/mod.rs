//! # Storefront public API
//!
//! The `sf_api` module exposes the programmatic API of the storefront engine. The HTTP server is a thin shell around
//! these types.
//!
//! * [`catalog_api`] creates catalog items (with their variations) and searches the catalog.
//! * [`cart_api`] manages draft orders: line items, order-level discounts, price calculation.
//! * [`checkout_api`] creates hosted payment links, adding the platform's application fee for connected sellers.
//! * [`promo_code_api`] is the in-memory promo-code table.
//! * [`seller_api`] holds the connected seller's credentials.
//!
//! # API usage
//!
//! An API instance is created by supplying a backend that implements the traits the API needs:
//!
//! ```rust,ignore
//! use square_tools::{SquareApi, SquareConfig};
//! use storefront_engine::{CartApi, PromoCodeApi, SellerScope};
//! let square = SquareApi::new(SquareConfig::new_from_env_or_default())?;
//! let carts = CartApi::new(square, PromoCodeApi::default(), "USD");
//! let order = carts.fetch_order(&SellerScope::platform("L1"), "order-id").await?;
//! ```
pub mod cart_api;
pub mod cart_objects;
pub mod catalog_api;
pub mod catalog_objects;
pub mod checkout_api;
pub mod checkout_objects;
pub mod common_objects;
pub mod errors;
pub mod promo_code_api;
pub mod promo_objects;
pub mod seller_api;
pub mod seller_objects;
