use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use square_tools::{
    data_objects::{CatalogItem, CatalogItemVariation, CatalogPage, IdMapping},
    CatalogObject,
    CatalogObjectType,
    CatalogUpsertResult,
    Money,
};
use storefront_engine::CatalogApi;

use super::{
    helpers::{options, send_request, with_seller_token, SELLER_TOKEN},
    mocks::MockCatalogManager,
};
use crate::{
    config::TenancyMode,
    routes::{CreateCatalogItemRoute, SearchCatalogItemsRoute},
};

fn configure(catalog: MockCatalogManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(CreateCatalogItemRoute::<MockCatalogManager>::new())
            .service(SearchCatalogItemsRoute::<MockCatalogManager>::new())
            .app_data(web::Data::new(CatalogApi::new(catalog, "USD")));
    }
}

fn stored_item() -> CatalogObject {
    CatalogObject {
        object_type: CatalogObjectType::Item,
        id: "ITEM-1".into(),
        version: Some(1),
        is_deleted: None,
        present_at_all_locations: Some(true),
        item_data: Some(CatalogItem {
            name: Some("Tote bag".into()),
            variations: vec![CatalogObject {
                object_type: CatalogObjectType::ItemVariation,
                id: "VAR-1".into(),
                version: Some(1),
                is_deleted: None,
                present_at_all_locations: Some(true),
                item_data: None,
                item_variation_data: Some(CatalogItemVariation {
                    item_id: Some("ITEM-1".into()),
                    name: Some("Regular".into()),
                    pricing_type: Some("FIXED_PRICING".into()),
                    price_money: Some(Money::new(1250, "USD")),
                    ..Default::default()
                }),
                extra: Default::default(),
            }],
            ..Default::default()
        }),
        item_variation_data: None,
        extra: Default::default(),
    }
}

#[actix_web::test]
async fn create_item() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_upsert_catalog_objects()
        .withf(|scope, objects| {
            let variations = &objects[0].item_data.as_ref().unwrap().variations;
            scope.access_token.as_ref().map(|t| t.reveal().as_str()) == Some(SELLER_TOKEN)
                && objects.len() == 1
                && objects[0].id == "#item"
                && variations.len() == 1
                && variations[0].id == "#variation-1"
                && variations[0].item_variation_data.as_ref().unwrap().price_money == Some(Money::new(1250, "USD"))
        })
        .times(1)
        .returning(|_, _| {
            Ok(CatalogUpsertResult {
                objects: vec![stored_item()],
                id_mappings: vec![
                    IdMapping { client_object_id: "#item".into(), object_id: "ITEM-1".into() },
                    IdMapping { client_object_id: "#variation-1".into(), object_id: "VAR-1".into() },
                ],
            })
        });
    let req = with_seller_token(TestRequest::post().uri("/catalog/items"))
        .set_json(json!({"name": "Tote bag", "price": "12.50"}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(catalog)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item"]["id"], "ITEM-1");
    assert_eq!(body["item"]["item_data"]["variations"][0]["item_variation_data"]["price_money"]["amount"], 1250);
    assert_eq!(body["id_mappings"][0], json!({"client_object_id": "#item", "object_id": "ITEM-1"}));
}

#[actix_web::test]
async fn create_item_without_a_name() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_upsert_catalog_objects().never();
    let req = TestRequest::post().uri("/catalog/items").set_json(json!({"name": " ", "price": 3}));
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": true, "details": "'name' is required and cannot be blank"}));
}

#[actix_web::test]
async fn create_item_with_a_malformed_body() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_upsert_catalog_objects().never();
    let req = TestRequest::post()
        .uri("/catalog/items")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"name\": ");
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert!(body["details"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn search_items() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_search_catalog_items()
        .withf(|scope, query| {
            scope.location_id == "L1"
                && !scope.is_seller()
                && query.text_filter.as_deref() == Some("tote")
                && query.limit == Some(5)
                && query.cursor.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(CatalogPage { items: vec![stored_item()], cursor: Some("next-page".into()) }));
    let req = TestRequest::get().uri("/catalog/items?q=tote&limit=5");
    let (status, body) = send_request(req, options(TenancyMode::Single), configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["id"], "ITEM-1");
    assert_eq!(body["cursor"], "next-page");
}

#[actix_web::test]
async fn search_items_defaults_to_a_full_page() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_search_catalog_items()
        .withf(|_, query| query.limit == Some(100) && query.text_filter.is_none())
        .times(1)
        .returning(|_, _| Ok(CatalogPage::default()));
    let (status, body) =
        send_request(TestRequest::get().uri("/catalog/items"), options(TenancyMode::Single), configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": [], "cursor": null}));
}

#[actix_web::test]
async fn search_items_with_bad_limits() {
    let _ = env_logger::try_init().ok();
    for uri in ["/catalog/items?limit=0", "/catalog/items?limit=101", "/catalog/items?limit=lots"] {
        let mut catalog = MockCatalogManager::new();
        catalog.expect_search_catalog_items().never();
        let (status, body) =
            send_request(TestRequest::get().uri(uri), options(TenancyMode::Single), configure(catalog)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], true);
    }
}
