//! # Storefront gateway server
//! This crate hosts the HTTP server for the storefront gateway. It is responsible for:
//! * Accepting storefront requests (catalog, carts, discounts, checkout) as JSON.
//! * Working out which seller each request runs on behalf of (see [tenancy]).
//! * Handing the request to the storefront engine, which talks to the payment platform.
//! * Normalising every failure into `{"error": true, "details": ...}`.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! All storefront routes live under `/api`:
//! * `POST /api/catalog/items`, `GET /api/catalog/items`: create and search catalog items.
//! * `POST /api/promo-codes`, `GET /api/promo-codes`, `GET /api/promo-codes/{code}`: the promo-code table (single
//!   tenancy mode only).
//! * `POST /api/set`, `GET /api/get`: connect and inspect the connected seller (connected tenancy mode only).
//! * `POST /api/cart`: create a draft order.
//! * `POST /api/cart/{order_id}/line-items`, `PUT|DELETE /api/cart/{order_id}/line-items/{uid}`: edit line items.
//! * `POST|DELETE /api/cart/{order_id}/discounts`: apply or clear the order-level discount.
//! * `POST /api/orders/{order_id}/calculate`, `GET /api/orders/{order_id}`: price and fetch orders.
//! * `POST /api/checkout/links`: create a hosted payment link.
//!
//! `/health` returns a 200 OK response.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod tenancy;

#[cfg(test)]
mod endpoint_tests;
