use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use square_tools::{data_objects::OrderState, Money, Order, SquareErrorDetail};
use storefront_engine::{
    sf_api::promo_objects::{DiscountKind, NewPromoCode},
    CartApi,
    PlatformError,
    PromoCodeApi,
};

use super::{
    helpers::{open_order, options, send_request},
    mocks::MockOrderManager,
};
use crate::{
    config::TenancyMode,
    routes::{
        AddLineItemRoute,
        ApplyDiscountRoute,
        CalculateOrderRoute,
        ClearDiscountsRoute,
        CreateCartRoute,
        FetchOrderRoute,
        RemoveLineItemRoute,
        UpdateLineItemRoute,
    },
};

fn configure(orders: MockOrderManager) -> impl FnOnce(&mut ServiceConfig) {
    let promos = PromoCodeApi::new();
    promos
        .upsert(NewPromoCode { code: "WELCOME".into(), kind: DiscountKind::Fixed, value: "5".into(), name: None })
        .unwrap();
    move |cfg| {
        cfg.service(CreateCartRoute::<MockOrderManager>::new())
            .service(AddLineItemRoute::<MockOrderManager>::new())
            .service(UpdateLineItemRoute::<MockOrderManager>::new())
            .service(RemoveLineItemRoute::<MockOrderManager>::new())
            .service(ApplyDiscountRoute::<MockOrderManager>::new())
            .service(ClearDiscountsRoute::<MockOrderManager>::new())
            .service(CalculateOrderRoute::<MockOrderManager>::new())
            .service(FetchOrderRoute::<MockOrderManager>::new())
            .app_data(web::Data::new(CartApi::new(orders, promos, "USD")));
    }
}

fn fetches_open_order(orders: &mut MockOrderManager) {
    orders.expect_fetch_order().withf(|_, id| id == "order-1").times(1).returning(|_, _| Ok(open_order()));
}

fn updated(update_version: i64) -> Order {
    Order { version: Some(update_version), ..open_order() }
}

#[actix_web::test]
async fn create_cart() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_create_order()
        .withf(|scope, order| {
            scope.location_id == "L1"
                && order.location_id == "L1"
                && order.state == Some(OrderState::Draft)
                && order.reference_id.as_deref() == Some("web-7")
                && order.line_items.len() == 1
                && order.line_items[0].quantity == "2"
                && order.line_items[0].base_price_money == Some(Money::new(350, "USD"))
        })
        .times(1)
        .returning(|_, order| Ok(Order { id: Some("order-9".into()), version: Some(1), ..order }));
    let req = TestRequest::post().uri("/cart").set_json(json!({
        "reference_id": "web-7",
        "line_items": [{"name": "Coffee", "price": 3.5, "quantity": 2}]
    }));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["id"], "order-9");
    assert_eq!(body["order"]["state"], "DRAFT");
}

#[actix_web::test]
async fn create_cart_with_a_zero_quantity() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_create_order().never();
    let req = TestRequest::post()
        .uri("/cart")
        .set_json(json!({"line_items": [{"catalog_object_id": "VAR-1", "quantity": 0}]}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": true, "details": "Quantity must be at least 1, not 0"}));
}

#[actix_web::test]
async fn add_line_item_uses_the_fetched_version() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders
        .expect_update_order()
        .withf(|_, id, update| {
            id == "order-1"
                && update.order.version == Some(3)
                && update.order.location_id == "L1"
                && update.order.line_items.len() == 1
                && update.order.line_items[0].catalog_object_id.as_deref() == Some("VAR-2")
                && update.fields_to_clear.is_empty()
        })
        .times(1)
        .returning(|_, _, _| Ok(updated(4)));
    let req = TestRequest::post()
        .uri("/cart/order-1/line-items")
        .set_json(json!({"catalog_object_id": "VAR-2", "quantity": "1"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["version"], 4);
}

#[actix_web::test]
async fn update_line_item() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders
        .expect_update_order()
        .withf(|_, _, update| {
            let li = &update.order.line_items[0];
            update.order.version == Some(3)
                && li.uid.as_deref() == Some("li-1")
                && li.quantity == "4"
                && li.note.is_none()
                && update.fields_to_clear == vec!["line_items[li-1].note".to_string()]
        })
        .times(1)
        .returning(|_, _, _| Ok(updated(4)));
    let req = TestRequest::put().uri("/cart/order-1/line-items/li-1").set_json(json!({"quantity": 4, "note": ""}));
    let (status, _) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn update_unknown_line_item() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders.expect_update_order().never();
    let req = TestRequest::put().uri("/cart/order-1/line-items/nope").set_json(json!({"quantity": 4}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"], "The data was not found. Line item nope does not exist on order order-1");
}

#[actix_web::test]
async fn remove_line_item() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders
        .expect_update_order()
        .withf(|_, _, update| {
            update.order.version == Some(3)
                && update.order.line_items.is_empty()
                && update.fields_to_clear == vec!["line_items[li-2]".to_string()]
        })
        .times(1)
        .returning(|_, _, _| Ok(updated(4)));
    let req = TestRequest::delete().uri("/cart/order-1/line-items/li-2");
    let (status, _) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn apply_promo_code_replaces_the_existing_discount() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders
        .expect_update_order()
        .withf(|_, _, update| {
            let d = &update.order.discounts;
            update.order.version == Some(3)
                && update.fields_to_clear == vec!["discounts[disc-1]".to_string()]
                && d.len() == 1
                && d[0].name.as_deref() == Some("WELCOME")
                && d[0].amount_money == Some(Money::new(500, "USD"))
        })
        .times(1)
        .returning(|_, _, _| Ok(updated(4)));
    let req = TestRequest::post().uri("/cart/order-1/discounts").set_json(json!({"promo_code": "welcome"}));
    let (status, _) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn apply_unknown_promo_code() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order().never();
    orders.expect_update_order().never();
    let req = TestRequest::post().uri("/cart/order-1/discounts").set_json(json!({"promo_code": "NOPE"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": true, "details": "Promo code NOPE does not exist"}));
}

#[actix_web::test]
async fn version_conflicts_are_passed_through() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders.expect_update_order().times(1).returning(|_, _, _| {
        Err(PlatformError::Remote {
            status: 400,
            details: vec![SquareErrorDetail {
                category: "INVALID_REQUEST_ERROR".into(),
                code: "VERSION_MISMATCH".into(),
                detail: Some("Version mismatch".into()),
                field: None,
            }],
        })
    });
    let req = TestRequest::post()
        .uri("/cart/order-1/discounts")
        .set_json(json!({"name": "Staff", "percentage": "15"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": true, "details": [
            {"category": "INVALID_REQUEST_ERROR", "code": "VERSION_MISMATCH", "detail": "Version mismatch"}
        ]})
    );
}

#[actix_web::test]
async fn clear_discounts() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders
        .expect_update_order()
        .withf(|_, _, update| update.fields_to_clear == vec!["discounts[disc-1]".to_string()])
        .times(1)
        .returning(|_, _, _| Ok(Order { discounts: vec![], ..updated(4) }));
    let req = TestRequest::delete().uri("/cart/order-1/discounts");
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["order"].get("discounts").is_none());
}

#[actix_web::test]
async fn closed_orders_cannot_be_changed() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_order()
        .times(1)
        .returning(|_, _| Ok(Order { state: Some(OrderState::Canceled), ..open_order() }));
    orders.expect_update_order().never();
    let req = TestRequest::delete().uri("/cart/order-1/discounts");
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Order order-1 is CANCELED and can no longer be changed");
}

#[actix_web::test]
async fn calculate_without_a_body() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders
        .expect_calculate_order()
        .withf(|_, order| order.id.is_none() && order.version.is_none() && order.discounts.len() == 1)
        .times(1)
        .returning(|_, order| Ok(Order { total_money: Some(Money::new(2970, "USD")), ..order }));
    orders.expect_update_order().never();
    let req = TestRequest::post().uri("/orders/order-1/calculate");
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["id"], "order-1");
    assert_eq!(body["order"]["version"], 3);
    assert_eq!(body["order"]["total_money"], json!({"amount": 2970, "currency": "USD"}));
}

#[actix_web::test]
async fn calculate_with_a_discount_preview() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    orders
        .expect_calculate_order()
        .withf(|_, order| order.discounts.len() == 1 && order.discounts[0].percentage.as_deref() == Some("20.00"))
        .times(1)
        .returning(|_, order| Ok(order));
    let req = TestRequest::post()
        .uri("/orders/order-1/calculate")
        .set_json(json!({"discount": {"name": "Preview", "percentage": 20}}));
    let (status, _) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn calculate_with_a_malformed_body() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order().never();
    let req = TestRequest::post().uri("/orders/order-1/calculate").set_payload("{not json");
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[actix_web::test]
async fn fetch_order() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    fetches_open_order(&mut orders);
    let (status, body) =
        send_request(TestRequest::get().uri("/orders/order-1"), options(TenancyMode::Single), configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    let order: Order = serde_json::from_value(body["order"].clone()).unwrap();
    assert_eq!(order, open_order());
}
