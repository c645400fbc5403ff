//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into the engine. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the payment platform, so they are all
//! async and never block.
use actix_web::{get, post, web, HttpResponse, Responder};
use log::*;
use storefront_engine::{
    sf_api::{
        cart_objects::{CalculateRequest, DiscountRequest, LineItemUpdate, NewCart, NewLineItem},
        catalog_objects::{CatalogQuery, NewCatalogItem},
        checkout_objects::CheckoutRequest,
        promo_objects::NewPromoCode,
        seller_objects::NewSellerConnection,
    },
    CartApi,
    CatalogApi,
    CatalogManagement,
    CheckoutApi,
    CheckoutManagement,
    LocationManagement,
    OrderManagement,
    PromoCodeApi,
    SellerApi,
};

use crate::{
    config::ServerOptions,
    data_objects::{OrderResponse, PromoCodeResponse, PromoCodesResponse, SellerConnectionResponse},
    errors::ServerError,
    tenancy::RequestScope,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(create_catalog_item => Post "/catalog/items" impl CatalogManagement);
pub async fn create_catalog_item<B: CatalogManagement>(
    scope: RequestScope,
    api: web::Data<CatalogApi<B>>,
    body: web::Json<NewCatalogItem>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received create catalog item request");
    let result = api.create_item(&scope, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(result))
}

route!(search_catalog_items => Get "/catalog/items" impl CatalogManagement);
pub async fn search_catalog_items<B: CatalogManagement>(
    scope: RequestScope,
    api: web::Data<CatalogApi<B>>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received catalog search request. {query:?}");
    let result = api.search_items(&scope, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Promo codes  ----------------------------------------------------
#[post("/promo-codes")]
pub async fn upsert_promo_code(
    api: web::Data<PromoCodeApi>,
    body: web::Json<NewPromoCode>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received promo code upsert request");
    let promo_code = api.upsert(body.into_inner())?;
    Ok(HttpResponse::Created().json(PromoCodeResponse { promo_code }))
}

#[get("/promo-codes")]
pub async fn list_promo_codes(api: web::Data<PromoCodeApi>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received promo code list request");
    Ok(HttpResponse::Ok().json(PromoCodesResponse { promo_codes: api.list() }))
}

#[get("/promo-codes/{code}")]
pub async fn fetch_promo_code(
    path: web::Path<String>,
    api: web::Data<PromoCodeApi>,
) -> Result<HttpResponse, ServerError> {
    let code = path.into_inner();
    trace!("💻️ Received promo code request for {code}");
    let promo_code = api.fetch(&code).ok_or_else(|| ServerError::NoRecordFound(format!("Promo code {code}")))?;
    Ok(HttpResponse::Ok().json(PromoCodeResponse { promo_code }))
}

//----------------------------------------------   Connected seller  ----------------------------------------------------
route!(connect_seller => Post "/set" impl LocationManagement);
pub async fn connect_seller<B: LocationManagement>(
    api: web::Data<SellerApi<B>>,
    body: web::Json<NewSellerConnection>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received seller connection request");
    let seller = api.connect(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SellerConnectionResponse::from(Some(seller))))
}

route!(seller_status => Get "/get" impl LocationManagement);
pub async fn seller_status<B: LocationManagement>(api: web::Data<SellerApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received seller status request");
    Ok(HttpResponse::Ok().json(SellerConnectionResponse::from(api.current())))
}

//----------------------------------------------   Carts  ----------------------------------------------------
route!(create_cart => Post "/cart" impl OrderManagement);
pub async fn create_cart<B: OrderManagement>(
    scope: RequestScope,
    api: web::Data<CartApi<B>>,
    body: web::Json<NewCart>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received new cart request");
    let order = api.create_cart(&scope, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

route!(add_line_item => Post "/cart/{order_id}/line-items" impl OrderManagement);
pub async fn add_line_item<B: OrderManagement>(
    scope: RequestScope,
    path: web::Path<String>,
    api: web::Data<CartApi<B>>,
    body: web::Json<NewLineItem>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ Received add line item request for {order_id}");
    let order = api.add_line_item(&scope, &order_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

route!(update_line_item => Put "/cart/{order_id}/line-items/{uid}" impl OrderManagement);
pub async fn update_line_item<B: OrderManagement>(
    scope: RequestScope,
    path: web::Path<(String, String)>,
    api: web::Data<CartApi<B>>,
    body: web::Json<LineItemUpdate>,
) -> Result<HttpResponse, ServerError> {
    let (order_id, uid) = path.into_inner();
    trace!("💻️ Received update line item request for {order_id}/{uid}");
    let order = api.update_line_item(&scope, &order_id, &uid, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

route!(remove_line_item => Delete "/cart/{order_id}/line-items/{uid}" impl OrderManagement);
pub async fn remove_line_item<B: OrderManagement>(
    scope: RequestScope,
    path: web::Path<(String, String)>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (order_id, uid) = path.into_inner();
    trace!("💻️ Received remove line item request for {order_id}/{uid}");
    let order = api.remove_line_item(&scope, &order_id, &uid).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

route!(apply_discount => Post "/cart/{order_id}/discounts" impl OrderManagement);
pub async fn apply_discount<B: OrderManagement>(
    scope: RequestScope,
    path: web::Path<String>,
    api: web::Data<CartApi<B>>,
    body: web::Json<DiscountRequest>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ Received apply discount request for {order_id}");
    let order = api.apply_discount(&scope, &order_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

route!(clear_discounts => Delete "/cart/{order_id}/discounts" impl OrderManagement);
pub async fn clear_discounts<B: OrderManagement>(
    scope: RequestScope,
    path: web::Path<String>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ Received clear discounts request for {order_id}");
    let order = api.clear_discounts(&scope, &order_id).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(calculate_order => Post "/orders/{order_id}/calculate" impl OrderManagement);
/// The body is optional. An empty body prices the order as it stands.
pub async fn calculate_order<B: OrderManagement>(
    scope: RequestScope,
    path: web::Path<String>,
    api: web::Data<CartApi<B>>,
    body: web::Bytes,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ Received calculate request for {order_id}");
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CalculateRequest::default()
    } else {
        serde_json::from_slice::<CalculateRequest>(&body).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?
    };
    let order = api.calculate(&scope, &order_id, request).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

route!(fetch_order => Get "/orders/{order_id}" impl OrderManagement);
pub async fn fetch_order<B: OrderManagement>(
    scope: RequestScope,
    path: web::Path<String>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ Received order request for {order_id}");
    let order = api.fetch_order(&scope, &order_id).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(create_checkout_link => Post "/checkout/links" impl OrderManagement, CheckoutManagement);
pub async fn create_checkout_link<B: OrderManagement + CheckoutManagement>(
    scope: RequestScope,
    options: web::Data<ServerOptions>,
    api: web::Data<CheckoutApi<B>>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received checkout link request");
    let link = api.create_link(&scope, body.into_inner(), options.platform_fee).await?;
    Ok(HttpResponse::Created().json(link))
}
