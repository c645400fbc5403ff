use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sfg_common::Secret;

use crate::{
    config::SquareConfig,
    data_objects::{
        CatalogObject,
        CatalogPage,
        CatalogUpsertResult,
        Location,
        NewPaymentLink,
        Order,
        OrderUpdate,
        PaymentLinkResult,
        SearchCatalogItemsRequest,
    },
    helpers::new_idempotency_key,
    SquareApiError,
};

#[derive(Clone)]
pub struct SquareApi {
    config: SquareConfig,
    client: Arc<Client>,
}

impl SquareApi {
    pub fn new(config: SquareConfig) -> Result<Self, SquareApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let version = HeaderValue::from_str(config.api_version.as_str())
            .map_err(|e| SquareApiError::Initialization(e.to_string()))?;
        headers.insert("Square-Version", version);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SquareApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Returns a client that acts on behalf of another seller. The connection pool is shared with `self`.
    pub fn with_access_token(&self, access_token: Secret<String>) -> Self {
        let config = SquareConfig { access_token, ..self.config.clone() };
        Self { config, client: Arc::clone(&self.client) }
    }

    pub fn config(&self) -> &SquareConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, SquareApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url).bearer_auth(self.config.access_token.reveal());
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| SquareApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("REST query successful. {status}");
            response.json::<T>().await.map_err(|e| SquareApiError::JsonError(e.to_string()))
        } else {
            let message = response.text().await.map_err(|e| SquareApiError::RestResponseError(e.to_string()))?;
            debug!("REST query failed. {status}. {message}");
            Err(SquareApiError::from_error_body(status.as_u16(), &message))
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v2{path}", self.config.environment.base_url())
    }

    //------------------------------------------------   Catalog   ----------------------------------------------------

    /// Creates or updates the given catalog objects in a single batch. New objects must use `#`-prefixed temporary ids;
    /// the mapping to their permanent ids is returned alongside the stored objects.
    pub async fn upsert_catalog_objects(
        &self,
        objects: Vec<CatalogObject>,
    ) -> Result<CatalogUpsertResult, SquareApiError> {
        #[derive(Serialize)]
        struct Batch {
            objects: Vec<CatalogObject>,
        }
        #[derive(Serialize)]
        struct BatchUpsertRequest {
            idempotency_key: String,
            batches: Vec<Batch>,
        }
        let count = objects.len();
        let body = BatchUpsertRequest { idempotency_key: new_idempotency_key(), batches: vec![Batch { objects }] };
        debug!("Upserting {count} catalog objects");
        let result = self
            .rest_query::<CatalogUpsertResult, BatchUpsertRequest>(Method::POST, "/catalog/batch-upsert", &[], Some(body))
            .await?;
        info!("Upserted {} catalog objects", result.objects.len());
        Ok(result)
    }

    pub async fn search_catalog_items(&self, query: SearchCatalogItemsRequest) -> Result<CatalogPage, SquareApiError> {
        debug!("Searching catalog items. {query:?}");
        let result = self
            .rest_query::<CatalogPage, SearchCatalogItemsRequest>(
                Method::POST,
                "/catalog/search-catalog-items",
                &[],
                Some(query),
            )
            .await?;
        debug!("Found {} catalog items", result.items.len());
        Ok(result)
    }

    //------------------------------------------------   Orders   -----------------------------------------------------

    pub async fn create_order(&self, order: Order) -> Result<Order, SquareApiError> {
        #[derive(Serialize)]
        struct CreateOrderRequest {
            idempotency_key: String,
            order: Order,
        }
        let body = CreateOrderRequest { idempotency_key: new_idempotency_key(), order };
        debug!("Creating order at location {}", body.order.location_id);
        let result = self.rest_query::<OrderResponse, CreateOrderRequest>(Method::POST, "/orders", &[], Some(body)).await?;
        info!("Created order {}", result.order.id.as_deref().unwrap_or("??"));
        Ok(result.order)
    }

    pub async fn retrieve_order(&self, order_id: &str) -> Result<Order, SquareApiError> {
        let path = format!("/orders/{order_id}");
        debug!("Fetching order {order_id}");
        let result = self.rest_query::<OrderResponse, ()>(Method::GET, &path, &[], None).await?;
        trace!("Fetched order {order_id} at version {:?}", result.order.version);
        Ok(result.order)
    }

    /// Applies a sparse update to an order. Square rejects the update if `update.order.version` is not the order's
    /// current version.
    pub async fn update_order(&self, order_id: &str, update: OrderUpdate) -> Result<Order, SquareApiError> {
        #[derive(Serialize)]
        struct UpdateOrderRequest {
            idempotency_key: String,
            #[serde(flatten)]
            update: OrderUpdate,
        }
        let path = format!("/orders/{order_id}");
        debug!(
            "Updating order {order_id} at version {:?}. Clearing [{}]",
            update.order.version,
            update.fields_to_clear.join(", ")
        );
        let body = UpdateOrderRequest { idempotency_key: new_idempotency_key(), update };
        let result = self.rest_query::<OrderResponse, UpdateOrderRequest>(Method::PUT, &path, &[], Some(body)).await?;
        info!("Updated order {order_id}. New version: {:?}", result.order.version);
        Ok(result.order)
    }

    /// Asks Square to price the given order without storing anything.
    pub async fn calculate_order(&self, order: Order) -> Result<Order, SquareApiError> {
        #[derive(Serialize)]
        struct CalculateOrderRequest {
            order: Order,
        }
        let body = CalculateOrderRequest { order };
        let result =
            self.rest_query::<OrderResponse, CalculateOrderRequest>(Method::POST, "/orders/calculate", &[], Some(body)).await?;
        trace!("Calculated order total: {:?}", result.order.total_money);
        Ok(result.order)
    }

    //------------------------------------------------   Checkout   ---------------------------------------------------

    pub async fn create_payment_link(&self, link: NewPaymentLink) -> Result<PaymentLinkResult, SquareApiError> {
        #[derive(Serialize)]
        struct CreatePaymentLinkRequest {
            idempotency_key: String,
            #[serde(flatten)]
            link: NewPaymentLink,
        }
        let body = CreatePaymentLinkRequest { idempotency_key: new_idempotency_key(), link };
        debug!("Creating payment link");
        let result = self
            .rest_query::<PaymentLinkResult, CreatePaymentLinkRequest>(
                Method::POST,
                "/online-checkout/payment-links",
                &[],
                Some(body),
            )
            .await?;
        info!("Created payment link {} ({})", result.payment_link.id, result.payment_link.url);
        Ok(result)
    }

    //------------------------------------------------   Locations   --------------------------------------------------

    pub async fn list_locations(&self) -> Result<Vec<Location>, SquareApiError> {
        #[derive(Deserialize)]
        struct LocationsResponse {
            #[serde(default)]
            locations: Vec<Location>,
        }
        debug!("Fetching locations");
        let result = self.rest_query::<LocationsResponse, ()>(Method::GET, "/locations", &[], None).await?;
        info!("Fetched {} locations", result.locations.len());
        Ok(result.locations)
    }
}

#[derive(Deserialize)]
struct OrderResponse {
    order: Order,
}
