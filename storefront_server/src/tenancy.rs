//! Working out which seller a request runs on behalf of.
//!
//! In order of precedence:
//! 1. A per-request seller token in the `X-Seller-Access-Token` header. The seller's location must accompany it in
//!    `X-Seller-Location-Id`: the platform's default location belongs to another seller, so it is never used here.
//! 2. In connected mode, the connected seller. Requests fail with a 400 if no seller has been connected yet.
//! 3. In single mode, the platform's own credentials and default location.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use log::*;
use sfg_common::Secret;
use storefront_engine::{ConnectedSeller, SellerScope};

use crate::{
    config::{ServerOptions, TenancyMode},
    errors::ServerError,
};

pub const SELLER_TOKEN_HEADER: &str = "X-Seller-Access-Token";
pub const SELLER_LOCATION_HEADER: &str = "X-Seller-Location-Id";

/// Extracts the [`SellerScope`] for the current request.
#[derive(Debug, Clone)]
pub struct RequestScope(pub SellerScope);

impl RequestScope {
    pub fn into_inner(self) -> SellerScope {
        self.0
    }
}

impl std::ops::Deref for RequestScope {
    type Target = SellerScope;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for RequestScope {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_scope(req).map(RequestScope))
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers().get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

fn resolve_scope(req: &HttpRequest) -> Result<SellerScope, ServerError> {
    let options = req
        .app_data::<web::Data<ServerOptions>>()
        .ok_or_else(|| ServerError::InitializeError("Server options have not been configured".to_string()))?;
    if let Some(token) = header_value(req, SELLER_TOKEN_HEADER) {
        let location_id = header_value(req, SELLER_LOCATION_HEADER).ok_or_else(|| {
            ServerError::ValidationError(format!("{SELLER_TOKEN_HEADER} requires a {SELLER_LOCATION_HEADER} header"))
        })?;
        trace!("💻️ Request carries its own seller token. Location: {location_id}");
        return Ok(SellerScope::seller(Secret::new(token), location_id));
    }
    match options.tenancy {
        TenancyMode::Single => Ok(SellerScope::platform(options.default_location_id.clone())),
        TenancyMode::Connected => {
            let scope = req.app_data::<web::Data<ConnectedSeller>>().and_then(|seller| seller.scope());
            scope.ok_or(ServerError::NoSellerConnected)
        },
    }
}
