use std::time::Duration;

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
    Scope,
};
use log::*;
use square_tools::SquareApi;
use storefront_engine::{
    CartApi,
    CatalogApi,
    CatalogManagement,
    CheckoutApi,
    CheckoutManagement,
    ConnectedSeller,
    LocationManagement,
    OrderManagement,
    PromoCodeApi,
    SellerApi,
};

use crate::{
    config::{ServerConfig, ServerOptions, TenancyMode},
    errors::ServerError,
    routes::{
        fetch_promo_code,
        health,
        list_promo_codes,
        upsert_promo_code,
        AddLineItemRoute,
        ApplyDiscountRoute,
        CalculateOrderRoute,
        ClearDiscountsRoute,
        ConnectSellerRoute,
        CreateCartRoute,
        CreateCatalogItemRoute,
        CreateCheckoutLinkRoute,
        FetchOrderRoute,
        RemoveLineItemRoute,
        SearchCatalogItemsRoute,
        SellerStatusRoute,
        UpdateLineItemRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let square = SquareApi::new(config.square.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Square client ready ({} environment)", config.square.environment);
    let srv = create_server_instance(config, square)?;
    srv.await?;
    Ok(())
}

pub fn create_server_instance(config: ServerConfig, square: SquareApi) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let currency = config.currency.clone();
    // Shared by every worker, and so they live for the lifetime of the process
    let promos = PromoCodeApi::new();
    let seller = ConnectedSeller::default();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("sfg::access_log"))
            .configure(configure_extractors)
            .configure(|cfg| {
                configure_storefront(cfg, square.clone(), options.clone(), &currency, promos.clone(), seller.clone())
            })
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers the storefront APIs (backed by `backend`) and all routes.
///
/// `promos` and `seller` must be shared by every worker, so they are created once and passed in.
pub fn configure_storefront<B>(
    cfg: &mut web::ServiceConfig,
    backend: B,
    options: ServerOptions,
    currency: &str,
    promos: PromoCodeApi,
    seller: ConnectedSeller,
) where
    B: CatalogManagement + OrderManagement + CheckoutManagement + LocationManagement + Clone + 'static,
{
    let tenancy = options.tenancy;
    cfg.app_data(web::Data::new(options))
        .app_data(web::Data::new(seller.clone()))
        .app_data(web::Data::new(promos.clone()))
        .app_data(web::Data::new(CatalogApi::new(backend.clone(), currency)))
        .app_data(web::Data::new(CartApi::new(backend.clone(), promos, currency)))
        .app_data(web::Data::new(CheckoutApi::new(backend.clone(), currency)))
        .app_data(web::Data::new(SellerApi::new(backend, seller)))
        .service(health)
        .service(api_scope::<B>(tenancy));
}

/// The `/api` scope. Promo-code routes are only mounted in single mode, and the seller connection routes only in
/// connected mode.
pub fn api_scope<B>(tenancy: TenancyMode) -> Scope
where B: CatalogManagement + OrderManagement + CheckoutManagement + LocationManagement + 'static {
    let scope = web::scope("/api")
        .service(CreateCatalogItemRoute::<B>::new())
        .service(SearchCatalogItemsRoute::<B>::new())
        .service(CreateCartRoute::<B>::new())
        .service(AddLineItemRoute::<B>::new())
        .service(UpdateLineItemRoute::<B>::new())
        .service(RemoveLineItemRoute::<B>::new())
        .service(ApplyDiscountRoute::<B>::new())
        .service(ClearDiscountsRoute::<B>::new())
        .service(CalculateOrderRoute::<B>::new())
        .service(FetchOrderRoute::<B>::new())
        .service(CreateCheckoutLinkRoute::<B>::new());
    match tenancy {
        TenancyMode::Single => scope.service(upsert_promo_code).service(list_promo_codes).service(fetch_promo_code),
        TenancyMode::Connected => scope.service(ConnectSellerRoute::<B>::new()).service(SellerStatusRoute::<B>::new()),
    }
}

/// Malformed bodies, queries and paths are reported in the same JSON shape as every other error.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|e: JsonPayloadError, _req: &HttpRequest| {
        ServerError::InvalidRequestBody(e.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|e: QueryPayloadError, _req: &HttpRequest| {
        ServerError::InvalidQuery(e.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|e: PathError, _req: &HttpRequest| {
        ServerError::InvalidRequestPath(e.to_string()).into()
    }));
}
