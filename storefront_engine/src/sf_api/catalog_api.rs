use std::fmt::Debug;

use log::*;
use square_tools::{
    data_objects::{CatalogItem, CatalogItemVariation, SearchCatalogItemsRequest},
    CatalogObject,
    CatalogObjectType,
    Money,
};

use crate::{
    sf_api::{
        catalog_objects::{CatalogItemResult, CatalogItems, CatalogQuery, NewCatalogItem},
        common_objects::{currency_or, non_blank, require_non_blank, PriceInput},
        errors::CatalogError,
    },
    traits::{CatalogManagement, PlatformError, SellerScope},
};

pub const MAX_PAGE_SIZE: u32 = 100;
const ITEM_TEMP_ID: &str = "#item";
const DEFAULT_VARIATION_NAME: &str = "Regular";

/// `CatalogApi` creates catalog items and searches the seller's catalog.
pub struct CatalogApi<B> {
    backend: B,
    currency: String,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({})", self.currency)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new<S: Into<String>>(backend: B, currency: S) -> Self {
        Self { backend, currency: currency.into() }
    }

    /// Creates an item and all of its variations in a single batch upsert.
    pub async fn create_item(&self, scope: &SellerScope, item: NewCatalogItem) -> Result<CatalogItemResult, CatalogError> {
        let object = self.build_item(item)?;
        let name = object.item_data.as_ref().and_then(|d| d.name.clone()).unwrap_or_default();
        let result = self.backend.upsert_catalog_objects(scope, vec![object]).await?;
        let item = result
            .objects
            .into_iter()
            .find(|o| o.object_type == CatalogObjectType::Item)
            .ok_or_else(|| PlatformError::Decode("The upsert result does not contain the new item".to_string()))?;
        info!("📦️ Catalog item '{name}' created as {}", item.id);
        Ok(CatalogItemResult { item, id_mappings: result.id_mappings })
    }

    pub async fn search_items(&self, scope: &SellerScope, query: CatalogQuery) -> Result<CatalogItems, CatalogError> {
        let limit = match query.limit {
            None => MAX_PAGE_SIZE,
            Some(l) if (1..=MAX_PAGE_SIZE).contains(&l) => l,
            Some(l) => {
                return Err(CatalogError::InvalidRequest(format!("limit must be between 1 and {MAX_PAGE_SIZE}, not {l}")))
            },
        };
        let request = SearchCatalogItemsRequest {
            text_filter: non_blank(query.q.as_deref()),
            cursor: non_blank(query.cursor.as_deref()),
            limit: Some(limit),
        };
        trace!("📦️ Searching catalog: {request:?}");
        let page = self.backend.search_catalog_items(scope, request).await?;
        debug!("📦️ Catalog search returned {} items", page.items.len());
        Ok(CatalogItems { items: page.items, cursor: page.cursor })
    }

    fn build_item(&self, item: NewCatalogItem) -> Result<CatalogObject, CatalogError> {
        let invalid = CatalogError::InvalidRequest;
        let name = require_non_blank("name", &item.name).map_err(invalid)?;
        let currency = currency_or(item.currency.as_deref(), &self.currency).map_err(invalid)?;
        let specs = match (item.price, item.variations.is_empty()) {
            (Some(price), true) => vec![(DEFAULT_VARIATION_NAME.to_string(), price, None)],
            (None, false) => item.variations.into_iter().map(|v| (v.name, v.price, v.sku)).collect::<Vec<_>>(),
            (Some(_), false) => return Err(invalid("Supply either a price or variations, not both".to_string())),
            (None, true) => return Err(invalid("An item needs either a price or at least one variation".to_string())),
        };
        let variations = specs
            .into_iter()
            .enumerate()
            .map(|(i, (name, price, sku))| build_variation(i + 1, &name, &price, sku.as_deref(), &currency))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CatalogObject {
            object_type: CatalogObjectType::Item,
            id: ITEM_TEMP_ID.to_string(),
            version: None,
            is_deleted: None,
            present_at_all_locations: Some(true),
            item_data: Some(CatalogItem {
                name: Some(name),
                description: non_blank(item.description.as_deref()),
                variations,
                ..Default::default()
            }),
            item_variation_data: None,
            extra: Default::default(),
        })
    }
}

fn build_variation(
    index: usize,
    name: &str,
    price: &PriceInput,
    sku: Option<&str>,
    currency: &str,
) -> Result<CatalogObject, CatalogError> {
    let name = require_non_blank("variations.name", name).map_err(CatalogError::InvalidRequest)?;
    let amount = price.hundredths().map_err(|e| CatalogError::InvalidRequest(format!("Variation '{name}': {e}")))?;
    Ok(CatalogObject {
        object_type: CatalogObjectType::ItemVariation,
        id: format!("#variation-{index}"),
        version: None,
        is_deleted: None,
        present_at_all_locations: Some(true),
        item_data: None,
        item_variation_data: Some(CatalogItemVariation {
            item_id: Some(ITEM_TEMP_ID.to_string()),
            name: Some(name),
            sku: non_blank(sku),
            pricing_type: Some("FIXED_PRICING".to_string()),
            price_money: Some(Money::new(amount, currency)),
            ..Default::default()
        }),
        extra: Default::default(),
    })
}
