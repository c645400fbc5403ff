use serde::{Deserialize, Serialize};
use square_tools::{data_objects::IdMapping, CatalogObject};

use crate::sf_api::common_objects::PriceInput;

/// A request to create a catalog item.
///
/// Exactly one of `variations` or a top-level `price` must be given. A top-level price creates a single variation
/// called "Regular".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCatalogItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    /// Defaults to the store currency.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub variations: Vec<NewItemVariation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItemVariation {
    pub name: String,
    pub price: PriceInput,
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free text matched against item names and descriptions.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItemResult {
    pub item: CatalogObject,
    pub id_mappings: Vec<IdMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItems {
    pub items: Vec<CatalogObject>,
    pub cursor: Option<String>,
}
