//! Wire types for the parts of the Square API the gateway talks to.
//!
//! Square objects carry many more fields than we care about. Fields we do not model are kept in the `extra` maps so
//! that objects fetched from the platform can be passed back to callers untouched.
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

//--------------------------------------------------   Money   --------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in the smallest denomination of the currency (e.g. cents).
    pub amount: i64,
    pub currency: String,
}

impl Money {
    pub fn new<S: Into<String>>(amount: i64, currency: S) -> Self {
        Self { amount, currency: currency.into() }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02} {}", self.amount / 100, (self.amount % 100).abs(), self.currency)
    }
}

//--------------------------------------------------   Orders   -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Draft,
    Open,
    Completed,
    Canceled,
}

impl OrderState {
    /// Completed and canceled orders can no longer be modified.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Draft | Self::Open)
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Open => "OPEN",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

/// A Square order. The same type is used for full orders returned by the platform and for the sparse orders sent in
/// update requests, which is why almost every field is optional and skipped when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<OrderState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<OrderLineItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<OrderLineItemDiscount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_discount_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tax_money: Option<Money>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    pub fn line_item(&self, uid: &str) -> Option<&OrderLineItem> {
        self.line_items.iter().find(|li| li.uid.as_deref() == Some(uid))
    }

    /// Discounts that apply to the whole order, as opposed to a single line item.
    pub fn order_level_discounts(&self) -> impl Iterator<Item = &OrderLineItemDiscount> {
        self.discounts.iter().filter(|d| !matches!(d.scope, Some(DiscountScope::LineItem)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Square represents quantities as decimal strings.
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_money: Option<Money>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    FixedPercentage,
    FixedAmount,
    VariablePercentage,
    VariableAmount,
    #[serde(other)]
    UnknownDiscount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountScope {
    OtherDiscountScope,
    LineItem,
    Order,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItemDiscount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    /// A decimal string, e.g. "7.25" for 7.25%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<DiscountScope>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The body of an `UpdateOrder` call.
///
/// `order` is sparse: it must contain the `location_id` and the `version` the update is based on, plus only the fields
/// being changed. `fields_to_clear` uses Square's dot notation, e.g. `line_items[uid]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order: Order,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields_to_clear: Vec<String>,
}

//--------------------------------------------------   Catalog   ------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogObjectType {
    Item,
    ItemVariation,
    Category,
    Tax,
    Discount,
    Image,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogObject {
    #[serde(rename = "type")]
    pub object_type: CatalogObjectType,
    /// Permanent ids are assigned by Square. New objects use temporary ids that start with `#`.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_at_all_locations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_data: Option<CatalogItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_variation_data: Option<CatalogItemVariation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<CatalogObject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItemVariation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_money: Option<Money>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdMapping {
    pub client_object_id: String,
    pub object_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogUpsertResult {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    #[serde(default)]
    pub id_mappings: Vec<IdMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCatalogItemsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default, alias = "objects")]
    pub items: Vec<CatalogObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

//--------------------------------------------------   Checkout   -----------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_fee_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_for_shipping_address: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPay {
    pub name: String,
    pub price_money: Money,
    pub location_id: String,
}

/// The body of a `CreatePaymentLink` call, minus the idempotency key. Exactly one of `quick_pay` or `order` must be
/// supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPaymentLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_pay: Option<QuickPay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_options: Option<CheckoutOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_options: Option<CheckoutOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentLinkResult {
    pub payment_link: PaymentLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_resources: Option<Value>,
}

//--------------------------------------------------   Locations   ----------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
}

impl Location {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("ACTIVE")
    }
}
