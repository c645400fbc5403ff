use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use log::debug;
use serde_json::Value;
use square_tools::{data_objects::OrderState, Money, Order, OrderLineItem, OrderLineItemDiscount};
use storefront_engine::sf_api::checkout_objects::PlatformFee;

use crate::{
    config::{ServerOptions, TenancyMode},
    server::configure_extractors,
};

pub const SELLER_TOKEN: &str = "EAAAl-seller-token-1234";

pub fn options(tenancy: TenancyMode) -> ServerOptions {
    ServerOptions { tenancy, platform_fee: PlatformFee::new(250), default_location_id: "L1".to_string() }
}

/// Sends a single request to an app configured by `configure`, and returns the status and the body as JSON
/// (or as a JSON string if the body is not JSON).
pub async fn send_request<F>(req: TestRequest, options: ServerOptions, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().configure(configure_extractors).app_data(web::Data::new(options)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let body = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    (status, body)
}

pub fn with_seller_token(req: TestRequest) -> TestRequest {
    req.insert_header(("X-Seller-Access-Token", SELLER_TOKEN)).insert_header(("X-Seller-Location-Id", "SELLER-LOC"))
}

/// A two-item open order at version 3, with one order-level discount.
pub fn open_order() -> Order {
    Order {
        id: Some("order-1".into()),
        location_id: "L1".into(),
        version: Some(3),
        state: Some(OrderState::Open),
        line_items: vec![
            OrderLineItem {
                uid: Some("li-1".into()),
                name: Some("Tote bag".into()),
                quantity: "2".into(),
                base_price_money: Some(Money::new(1000, "USD")),
                total_money: Some(Money::new(2000, "USD")),
                ..Default::default()
            },
            OrderLineItem {
                uid: Some("li-2".into()),
                catalog_object_id: Some("VAR-1".into()),
                quantity: "1".into(),
                base_price_money: Some(Money::new(1300, "USD")),
                total_money: Some(Money::new(1300, "USD")),
                ..Default::default()
            },
        ],
        discounts: vec![OrderLineItemDiscount {
            uid: Some("disc-1".into()),
            name: Some("Old discount".into()),
            percentage: Some("10.00".into()),
            ..Default::default()
        }],
        total_money: Some(Money::new(2970, "USD")),
        ..Default::default()
    }
}
