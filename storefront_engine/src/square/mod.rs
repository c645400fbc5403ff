//! The Square REST client as a platform backend.
//!
//! Scopes that carry a seller access token get a client bound to that token; everything else runs with the platform
//! credentials the client was built with.
use std::borrow::Cow;

use log::trace;
use square_tools::{
    data_objects::{CatalogPage, NewPaymentLink, PaymentLinkResult, SearchCatalogItemsRequest},
    CatalogObject,
    CatalogUpsertResult,
    Location,
    Order,
    OrderUpdate,
    SquareApi,
};

use crate::traits::{
    CatalogManagement,
    CheckoutManagement,
    LocationManagement,
    OrderManagement,
    PlatformError,
    SellerScope,
};

fn client_for<'a>(api: &'a SquareApi, scope: &SellerScope) -> Cow<'a, SquareApi> {
    match &scope.access_token {
        Some(token) => {
            trace!("Using seller credentials for this request");
            Cow::Owned(api.with_access_token(token.clone()))
        },
        None => Cow::Borrowed(api),
    }
}

impl OrderManagement for SquareApi {
    async fn create_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError> {
        Ok(client_for(self, scope).create_order(order).await?)
    }

    async fn fetch_order(&self, scope: &SellerScope, order_id: &str) -> Result<Order, PlatformError> {
        Ok(client_for(self, scope).retrieve_order(order_id).await?)
    }

    async fn update_order(
        &self,
        scope: &SellerScope,
        order_id: &str,
        update: OrderUpdate,
    ) -> Result<Order, PlatformError> {
        Ok(client_for(self, scope).update_order(order_id, update).await?)
    }

    async fn calculate_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError> {
        Ok(client_for(self, scope).calculate_order(order).await?)
    }
}

impl CatalogManagement for SquareApi {
    async fn upsert_catalog_objects(
        &self,
        scope: &SellerScope,
        objects: Vec<CatalogObject>,
    ) -> Result<CatalogUpsertResult, PlatformError> {
        Ok(client_for(self, scope).upsert_catalog_objects(objects).await?)
    }

    async fn search_catalog_items(
        &self,
        scope: &SellerScope,
        query: SearchCatalogItemsRequest,
    ) -> Result<CatalogPage, PlatformError> {
        Ok(client_for(self, scope).search_catalog_items(query).await?)
    }
}

impl CheckoutManagement for SquareApi {
    async fn create_payment_link(
        &self,
        scope: &SellerScope,
        link: NewPaymentLink,
    ) -> Result<PaymentLinkResult, PlatformError> {
        Ok(client_for(self, scope).create_payment_link(link).await?)
    }
}

impl LocationManagement for SquareApi {
    async fn fetch_locations(&self, scope: &SellerScope) -> Result<Vec<Location>, PlatformError> {
        Ok(client_for(self, scope).list_locations().await?)
    }
}
