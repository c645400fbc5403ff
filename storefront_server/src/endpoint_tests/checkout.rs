use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use square_tools::{
    data_objects::{NewPaymentLink, PaymentLinkResult},
    Money,
    PaymentLink,
};
use storefront_engine::CheckoutApi;

use super::{
    helpers::{open_order, options, send_request, with_seller_token, SELLER_TOKEN},
    mocks::MockCheckoutManager,
};
use crate::{config::TenancyMode, routes::CreateCheckoutLinkRoute};

fn configure(checkout: MockCheckoutManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(CreateCheckoutLinkRoute::<MockCheckoutManager>::new())
            .app_data(web::Data::new(CheckoutApi::new(checkout, "USD")));
    }
}

/// Echoes the link back the way the platform does: a new order and the checkout options as sent.
fn echo_link(link: NewPaymentLink) -> PaymentLinkResult {
    PaymentLinkResult {
        payment_link: PaymentLink {
            id: "PL-1".into(),
            version: Some(1),
            url: "https://square.link/u/abc".into(),
            long_url: Some("https://checkout.square.site/merchant/M1/order/xyz".into()),
            order_id: Some("order-from-link".into()),
            description: link.description,
            checkout_options: link.checkout_options,
            created_at: None,
        },
        related_resources: None,
    }
}

#[actix_web::test]
async fn link_for_a_cart_on_behalf_of_a_seller() {
    let _ = env_logger::try_init().ok();
    let mut checkout = MockCheckoutManager::new();
    checkout
        .expect_fetch_order()
        .withf(|scope, id| id == "order-1" && scope.is_seller() && scope.location_id == "SELLER-LOC")
        .times(1)
        .returning(|_, _| Ok(open_order()));
    checkout
        .expect_create_payment_link()
        .withf(|scope, link| {
            let order = link.order.as_ref().unwrap();
            let options = link.checkout_options.as_ref().unwrap();
            scope.access_token.as_ref().map(|t| t.reveal().as_str()) == Some(SELLER_TOKEN)
                && link.quick_pay.is_none()
                && order.id.is_none()
                && order.version.is_none()
                && order.reference_id.as_deref() == Some("order-1")
                && order.line_items.len() == 2
                && order.discounts.len() == 1
                && options.app_fee_money == Some(Money::new(74, "USD"))
                && options.redirect_url.as_deref() == Some("https://shop.example.com/thanks")
        })
        .times(1)
        .returning(|_, link| Ok(echo_link(link)));
    let req = with_seller_token(TestRequest::post().uri("/checkout/links"))
        .set_json(json!({"order_id": "order-1", "redirect_url": "https://shop.example.com/thanks"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(checkout)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "payment_link_id": "PL-1",
            "url": "https://square.link/u/abc",
            "long_url": "https://checkout.square.site/merchant/M1/order/xyz",
            "order_id": "order-from-link",
            "app_fee_money": {"amount": 74, "currency": "USD"}
        })
    );
}

#[actix_web::test]
async fn quick_pay_on_platform_credentials_has_no_fee() {
    let _ = env_logger::try_init().ok();
    let mut checkout = MockCheckoutManager::new();
    checkout.expect_fetch_order().never();
    checkout
        .expect_create_payment_link()
        .withf(|scope, link| {
            let quick_pay = link.quick_pay.as_ref().unwrap();
            !scope.is_seller()
                && link.order.is_none()
                && link.checkout_options.is_none()
                && link.description.as_deref() == Some("Tip jar")
                && quick_pay.name == "Tip"
                && quick_pay.location_id == "L1"
                && quick_pay.price_money == Money::new(500, "USD")
        })
        .times(1)
        .returning(|_, link| Ok(echo_link(link)));
    let req = TestRequest::post()
        .uri("/checkout/links")
        .set_json(json!({"quick_pay": {"name": "Tip", "price": 5}, "description": "Tip jar"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(checkout)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["app_fee_money"], json!(null));
}

#[actix_web::test]
async fn link_needs_an_order_or_quick_pay() {
    let _ = env_logger::try_init().ok();
    let mut checkout = MockCheckoutManager::new();
    checkout.expect_fetch_order().never();
    checkout.expect_create_payment_link().never();
    let req = TestRequest::post().uri("/checkout/links").set_json(json!({"redirect_url": "https://shop.example.com"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(checkout)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": true, "details": "Supply either an order_id or quick_pay"}));
}

#[actix_web::test]
async fn link_with_a_bad_redirect() {
    let _ = env_logger::try_init().ok();
    let mut checkout = MockCheckoutManager::new();
    checkout.expect_create_payment_link().never();
    let req = TestRequest::post()
        .uri("/checkout/links")
        .set_json(json!({"order_id": "order-1", "redirect_url": "javascript:alert(1)"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(checkout)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "redirect_url must be an http(s) URL, not javascript:alert(1)");
}

#[actix_web::test]
async fn link_for_an_empty_cart() {
    let _ = env_logger::try_init().ok();
    let mut checkout = MockCheckoutManager::new();
    checkout
        .expect_fetch_order()
        .times(1)
        .returning(|_, _| Ok(square_tools::Order { line_items: vec![], ..open_order() }));
    checkout.expect_create_payment_link().never();
    let req = TestRequest::post().uri("/checkout/links").set_json(json!({"order_id": "order-1"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(checkout)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Order order-1 has no line items");
}
