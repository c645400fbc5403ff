use square_tools::{
    data_objects::{CatalogPage, SearchCatalogItemsRequest},
    CatalogObject,
    CatalogUpsertResult,
};

use crate::traits::{PlatformError, SellerScope};

#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Creates or updates catalog objects in one batch. New objects carry temporary `#` ids, which are mapped to
    /// permanent ids in the result.
    async fn upsert_catalog_objects(
        &self,
        scope: &SellerScope,
        objects: Vec<CatalogObject>,
    ) -> Result<CatalogUpsertResult, PlatformError>;

    async fn search_catalog_items(
        &self,
        scope: &SellerScope,
        query: SearchCatalogItemsRequest,
    ) -> Result<CatalogPage, PlatformError>;
}
