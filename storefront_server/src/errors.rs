use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use serde_json::{json, Value};
use storefront_engine::{CartError, CatalogError, CheckoutError, PlatformError, PromoCodeError, SellerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("No seller is connected. Connect a seller with POST /api/set first.")]
    NoSellerConnected,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error(transparent)]
    PlatformError(#[from] PlatformError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
}

impl ServerError {
    /// The `details` field of the error body. Platform rejections carry the platform's own error records.
    pub fn details(&self) -> Value {
        match self {
            Self::PlatformError(PlatformError::Remote { details, .. }) if !details.is_empty() => {
                serde_json::to_value(details).unwrap_or_else(|_| Value::String(self.to_string()))
            },
            _ => Value::String(self.to_string()),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NoSellerConnected => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PlatformError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("💻️ Request failed. {self}");
        } else {
            debug!("💻️ Request rejected. {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(json!({ "error": true, "details": self.details() }).to_string())
    }
}

impl From<CatalogError> for ServerError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::InvalidRequest(s) => Self::ValidationError(s),
            CatalogError::Platform(e) => Self::PlatformError(e),
        }
    }
}

impl From<CartError> for ServerError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::InvalidRequest(s) => Self::ValidationError(s),
            CartError::UnknownPromoCode(_) | CartError::OrderNotMutable { .. } => Self::ValidationError(e.to_string()),
            CartError::LineItemNotFound { .. } => Self::NoRecordFound(e.to_string()),
            CartError::Platform(e) => Self::PlatformError(e),
        }
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::InvalidRequest(s) => Self::ValidationError(s),
            CheckoutError::Cart(e) => e.into(),
            CheckoutError::Platform(e) => Self::PlatformError(e),
        }
    }
}

impl From<PromoCodeError> for ServerError {
    fn from(e: PromoCodeError) -> Self {
        match e {
            PromoCodeError::InvalidRequest(s) => Self::ValidationError(s),
        }
    }
}

impl From<SellerError> for ServerError {
    fn from(e: SellerError) -> Self {
        match e {
            SellerError::InvalidRequest(s) => Self::ValidationError(s),
            SellerError::NoActiveLocation => Self::ValidationError(e.to_string()),
            SellerError::Platform(e) => Self::PlatformError(e),
        }
    }
}
