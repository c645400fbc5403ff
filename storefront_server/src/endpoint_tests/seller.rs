use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use square_tools::Location;
use storefront_engine::{ConnectedSeller, SellerApi};

use super::{
    helpers::{options, send_request, SELLER_TOKEN},
    mocks::MockLocationManager,
};
use crate::{
    config::TenancyMode,
    routes::{ConnectSellerRoute, SellerStatusRoute},
};

fn configure(locations: MockLocationManager, seller: ConnectedSeller) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(ConnectSellerRoute::<MockLocationManager>::new())
            .service(SellerStatusRoute::<MockLocationManager>::new())
            .app_data(web::Data::new(SellerApi::new(locations, seller)));
    }
}

fn location(id: &str, status: &str) -> Location {
    Location { id: id.into(), status: Some(status.into()), ..Default::default() }
}

#[actix_web::test]
async fn connect_with_a_location() {
    let _ = env_logger::try_init().ok();
    let mut locations = MockLocationManager::new();
    locations.expect_fetch_locations().never();
    let seller = ConnectedSeller::default();
    let req = TestRequest::post()
        .uri("/set")
        .set_json(json!({"access_token": SELLER_TOKEN, "location_id": "LOC-9", "label": "Corner shop"}));
    let (status, body) =
        send_request(req, options(TenancyMode::Connected), configure(locations, seller.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["seller"]["access_token"], "****1234");
    assert_eq!(body["seller"]["location_id"], "LOC-9");
    assert_eq!(body["seller"]["label"], "Corner shop");
    assert!(body["seller"]["connected_at"].is_string());
    let scope = seller.scope().unwrap();
    assert_eq!(scope.access_token.unwrap().reveal(), SELLER_TOKEN);
    assert_eq!(scope.location_id, "LOC-9");
}

#[actix_web::test]
async fn connect_looks_up_the_first_active_location() {
    let _ = env_logger::try_init().ok();
    let mut locations = MockLocationManager::new();
    locations
        .expect_fetch_locations()
        .withf(|scope| scope.access_token.as_ref().map(|t| t.reveal().as_str()) == Some(SELLER_TOKEN))
        .times(1)
        .returning(|_| Ok(vec![location("OLD", "INACTIVE"), location("MAIN", "ACTIVE"), location("POPUP", "ACTIVE")]));
    let req = TestRequest::post().uri("/set").set_json(json!({"access_token": SELLER_TOKEN}));
    let (status, body) =
        send_request(req, options(TenancyMode::Connected), configure(locations, ConnectedSeller::default())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seller"]["location_id"], "MAIN");
}

#[actix_web::test]
async fn connect_without_active_locations() {
    let _ = env_logger::try_init().ok();
    let mut locations = MockLocationManager::new();
    locations.expect_fetch_locations().times(1).returning(|_| Ok(vec![location("OLD", "INACTIVE")]));
    let seller = ConnectedSeller::default();
    let req = TestRequest::post().uri("/set").set_json(json!({"access_token": SELLER_TOKEN}));
    let (status, body) =
        send_request(req, options(TenancyMode::Connected), configure(locations, seller.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "The seller has no active locations. Supply a location_id explicitly.");
    assert!(seller.get().is_none());
}

#[actix_web::test]
async fn connect_with_a_blank_token() {
    let _ = env_logger::try_init().ok();
    let mut locations = MockLocationManager::new();
    locations.expect_fetch_locations().never();
    let req = TestRequest::post().uri("/set").set_json(json!({"access_token": "  ", "location_id": "LOC-9"}));
    let (status, body) =
        send_request(req, options(TenancyMode::Connected), configure(locations, ConnectedSeller::default())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[actix_web::test]
async fn status_before_connecting() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(
        TestRequest::get().uri("/get"),
        options(TenancyMode::Connected),
        configure(MockLocationManager::new(), ConnectedSeller::default()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"connected": false, "seller": null}));
}
