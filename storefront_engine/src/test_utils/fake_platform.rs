//! An in-memory stand-in for the payment platform.
//!
//! It does just enough to exercise the storefront APIs: orders are versioned and stale updates are rejected the way the
//! platform rejects them, sparse updates and `fields_to_clear` are applied, and totals are recomputed after every
//! change. Catalog variations without a stored price are priced at 1.00.
//!
//! Pricing follows the platform closely enough for totals to be checked: order-scoped discounts apply to the gross
//! sales of the order and line-item discounts to the line items that list them in `applied_discounts`. Order-scoped
//! percentage taxes apply to the discounted subtotal, and service charges are added as they are.
use std::{collections::HashMap, sync::Arc};

use log::*;
use parking_lot::Mutex;
use serde_json::Value;
use square_tools::{
    data_objects::{
        CatalogPage,
        DiscountScope,
        DiscountType,
        IdMapping,
        NewPaymentLink,
        OrderState,
        PaymentLink,
        PaymentLinkResult,
        SearchCatalogItemsRequest,
    },
    helpers::parse_price,
    CatalogObject,
    CatalogObjectType,
    CatalogUpsertResult,
    Location,
    Money,
    Order,
    OrderLineItem,
    OrderUpdate,
    SquareErrorDetail,
};

use crate::traits::{
    CatalogManagement,
    CheckoutManagement,
    LocationManagement,
    OrderManagement,
    PlatformError,
    SellerScope,
};

const DEFAULT_CATALOG_PRICE: i64 = 100;

#[derive(Debug, Default)]
struct PlatformState {
    next_id: u64,
    calls: usize,
    last_scope: Option<SellerScope>,
    orders: HashMap<String, Order>,
    /// The version each update to an order was based on, in the order they arrived.
    update_versions: HashMap<String, Vec<Option<i64>>>,
    bump_on_fetch: Vec<String>,
    catalog: Vec<CatalogObject>,
    /// Unit prices of the catalog items found in orders seeded with [`FakePlatform::insert_order`].
    seeded_prices: HashMap<String, Money>,
    locations: Vec<Location>,
    payment_links: Vec<NewPaymentLink>,
}

impl PlatformState {
    fn new_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:04}", self.next_id)
    }

    fn record(&mut self, scope: &SellerScope) {
        self.calls += 1;
        self.last_scope = Some(scope.clone());
    }

    fn catalog_price(&self, catalog_object_id: &str) -> Option<Money> {
        self.catalog
            .iter()
            .flat_map(|o| o.item_data.iter().flat_map(|d| d.variations.iter()))
            .find(|v| v.id == catalog_object_id)
            .and_then(|v| v.item_variation_data.as_ref())
            .and_then(|d| d.price_money.clone())
            .or_else(|| self.seeded_prices.get(catalog_object_id).cloned())
    }

    fn assign_uids(&mut self, order: &mut Order) {
        for li in order.line_items.iter_mut().filter(|li| li.uid.is_none()) {
            self.next_id += 1;
            li.uid = Some(format!("li-{:04}", self.next_id));
        }
        for d in order.discounts.iter_mut().filter(|d| d.uid.is_none()) {
            self.next_id += 1;
            d.uid = Some(format!("disc-{:04}", self.next_id));
        }
    }

    fn price(&self, order: &mut Order) {
        let currency = order
            .line_items
            .iter()
            .find_map(|li| li.base_price_money.as_ref().map(|m| m.currency.clone()))
            .unwrap_or_else(|| "USD".to_string());
        let mut subtotal = 0;
        for li in order.line_items.iter_mut() {
            if li.base_price_money.is_none() {
                let id = li.catalog_object_id.clone().unwrap_or_default();
                li.base_price_money =
                    Some(self.catalog_price(&id).unwrap_or_else(|| Money::new(DEFAULT_CATALOG_PRICE, currency.clone())));
            }
            let unit = li.base_price_money.as_ref().map(|m| m.amount).unwrap_or_default();
            let total = unit * li.quantity.parse::<i64>().unwrap_or(1);
            li.total_money = Some(Money::new(total, currency.clone()));
            subtotal += total;
        }
        let mut discount_total = 0;
        for d in order.discounts.iter_mut() {
            let uid = d.uid.clone().unwrap_or_default();
            let base = match d.scope {
                Some(DiscountScope::LineItem) => order
                    .line_items
                    .iter()
                    .filter(|li| lists_uid(li, "applied_discounts", "discount_uid", &uid))
                    .filter_map(|li| li.total_money.as_ref().map(|m| m.amount))
                    .sum::<i64>(),
                _ => subtotal,
            };
            let applied = match d.discount_type {
                Some(DiscountType::FixedPercentage) => base * percentage(d.percentage.as_deref()) / 10_000,
                Some(DiscountType::FixedAmount) => {
                    d.amount_money.as_ref().map(|m| m.amount.min(base)).unwrap_or_default()
                },
                _ => 0,
            };
            d.applied_money = Some(Money::new(applied, currency.clone()));
            discount_total += applied;
        }
        let discount_total = discount_total.min(subtotal);
        let taxable = subtotal - discount_total;
        let tax_total = objects(order, "taxes")
            .filter(|t| t.get("scope").and_then(Value::as_str) != Some("LINE_ITEM"))
            .map(|t| taxable * percentage(t.get("percentage").and_then(Value::as_str)) / 10_000)
            .sum::<i64>();
        let service_total = objects(order, "service_charges")
            .filter_map(|c| c.get("amount_money").and_then(|m| m.get("amount")).and_then(Value::as_i64))
            .sum::<i64>();
        order.total_discount_money = Some(Money::new(discount_total, currency.clone()));
        order.total_tax_money = Some(Money::new(tax_total, currency.clone()));
        order.total_money = Some(Money::new(taxable + tax_total + service_total, currency));
    }

    fn create_order(&mut self, mut order: Order) -> Order {
        let id = self.new_id("order");
        order.id = Some(id.clone());
        order.version = Some(1);
        order.state = order.state.or(Some(OrderState::Open));
        self.assign_uids(&mut order);
        self.price(&mut order);
        self.orders.insert(id, order.clone());
        order
    }
}

fn percentage(value: Option<&str>) -> i64 {
    value.and_then(|p| parse_price(p).ok()).unwrap_or_default()
}

/// The entries of an array held in the order's extra fields, e.g. its taxes.
fn objects<'a>(order: &'a Order, field: &str) -> impl Iterator<Item = &'a Value> {
    order.extra.get(field).and_then(Value::as_array).into_iter().flatten()
}

fn lists_uid(li: &OrderLineItem, field: &str, uid_field: &str, uid: &str) -> bool {
    li.extra
        .get(field)
        .and_then(Value::as_array)
        .is_some_and(|entries| entries.iter().any(|e| e.get(uid_field).and_then(Value::as_str) == Some(uid)))
}

fn remote_error(status: u16, code: &str, detail: String) -> PlatformError {
    PlatformError::Remote {
        status,
        details: vec![SquareErrorDetail {
            category: "INVALID_REQUEST_ERROR".to_string(),
            code: code.to_string(),
            detail: Some(detail),
            field: None,
        }],
    }
}

fn not_found(order_id: &str) -> PlatformError {
    remote_error(404, "NOT_FOUND", format!("Order {order_id} not found"))
}

fn map_temp_id(state: &mut PlatformState, id: &mut String, mappings: &mut Vec<IdMapping>) {
    if id.starts_with('#') {
        let permanent = state.new_id("CAT");
        mappings.push(IdMapping { client_object_id: id.clone(), object_id: permanent.clone() });
        *id = permanent;
    }
}

fn merge_line_item(existing: &mut OrderLineItem, change: OrderLineItem) {
    existing.quantity = change.quantity;
    if change.name.is_some() {
        existing.name = change.name;
    }
    if change.note.is_some() {
        existing.note = change.note;
    }
    if change.base_price_money.is_some() {
        existing.base_price_money = change.base_price_money;
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePlatform {
    state: Arc<Mutex<PlatformState>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of calls made to the platform so far.
    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }

    pub fn last_scope(&self) -> Option<SellerScope> {
        self.state.lock().last_scope.clone()
    }

    pub fn set_locations(&self, locations: Vec<Location>) {
        self.state.lock().locations = locations;
    }

    pub fn set_order_state(&self, order_id: &str, state: OrderState) {
        if let Some(order) = self.state.lock().orders.get_mut(order_id) {
            order.state = Some(state);
        }
    }

    /// Simulates a concurrent writer: the next fetch of the order returns it as it is, and then its version moves on.
    pub fn bump_version_on_next_fetch(&self, order_id: &str) {
        self.state.lock().bump_on_fetch.push(order_id.to_string());
    }

    pub fn based_on_versions(&self, order_id: &str) -> Vec<Option<i64>> {
        self.state.lock().update_versions.get(order_id).cloned().unwrap_or_default()
    }

    /// Stores an order exactly as given, as if the platform already held it, and returns its id. The unit prices of its
    /// catalog items are remembered so that copies of the order which refer to the catalog are priced the same way.
    pub fn insert_order(&self, mut order: Order) -> String {
        let mut state = self.state.lock();
        let id = match order.id.clone() {
            Some(id) => id,
            None => state.new_id("order"),
        };
        order.id = Some(id.clone());
        for li in &order.line_items {
            if let (Some(catalog_id), Some(price)) = (&li.catalog_object_id, &li.base_price_money) {
                state.seeded_prices.insert(catalog_id.clone(), price.clone());
            }
        }
        state.orders.insert(id.clone(), order);
        id
    }

    pub fn last_payment_link(&self) -> Option<NewPaymentLink> {
        self.state.lock().payment_links.last().cloned()
    }
}

impl OrderManagement for FakePlatform {
    async fn create_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        let order = state.create_order(order);
        trace!("Fake platform created order {:?}", order.id);
        Ok(order)
    }

    async fn fetch_order(&self, scope: &SellerScope, order_id: &str) -> Result<Order, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        let order = state.orders.get(order_id).cloned().ok_or_else(|| not_found(order_id))?;
        if let Some(pos) = state.bump_on_fetch.iter().position(|id| id == order_id) {
            state.bump_on_fetch.remove(pos);
            if let Some(stored) = state.orders.get_mut(order_id) {
                stored.version = stored.version.map(|v| v + 1);
            }
        }
        Ok(order)
    }

    async fn update_order(
        &self,
        scope: &SellerScope,
        order_id: &str,
        update: OrderUpdate,
    ) -> Result<Order, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        let mut order = state.orders.get(order_id).cloned().ok_or_else(|| not_found(order_id))?;
        state.update_versions.entry(order_id.to_string()).or_default().push(update.order.version);
        if update.order.version != order.version {
            return Err(remote_error(
                400,
                "VERSION_MISMATCH",
                format!("Order version {:?} does not match the current version {:?}", update.order.version, order.version),
            ));
        }
        for field in &update.fields_to_clear {
            if let Some(uid) = field.strip_prefix("line_items[").and_then(|f| f.strip_suffix("].note")) {
                if let Some(li) = order.line_items.iter_mut().find(|li| li.uid.as_deref() == Some(uid)) {
                    li.note = None;
                }
            } else if let Some(uid) = field.strip_prefix("line_items[").and_then(|f| f.strip_suffix(']')) {
                order.line_items.retain(|li| li.uid.as_deref() != Some(uid));
            } else if let Some(uid) = field.strip_prefix("discounts[").and_then(|f| f.strip_suffix(']')) {
                order.discounts.retain(|d| d.uid.as_deref() != Some(uid));
            } else {
                return Err(remote_error(400, "INVALID_VALUE", format!("Cannot clear {field}")));
            }
        }
        let mut changes = update.order;
        state.assign_uids(&mut changes);
        for change in changes.line_items {
            match order.line_items.iter_mut().find(|li| li.uid == change.uid) {
                Some(existing) => merge_line_item(existing, change),
                None => order.line_items.push(change),
            }
        }
        for change in changes.discounts {
            order.discounts.retain(|d| d.uid != change.uid);
            order.discounts.push(change);
        }
        order.version = order.version.map(|v| v + 1);
        for li in order.line_items.iter_mut().filter(|li| li.catalog_object_id.is_some()) {
            li.base_price_money = None;
        }
        state.price(&mut order);
        state.orders.insert(order_id.to_string(), order.clone());
        Ok(order)
    }

    async fn calculate_order(&self, scope: &SellerScope, mut order: Order) -> Result<Order, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        state.assign_uids(&mut order);
        state.price(&mut order);
        Ok(order)
    }
}

impl CatalogManagement for FakePlatform {
    async fn upsert_catalog_objects(
        &self,
        scope: &SellerScope,
        objects: Vec<CatalogObject>,
    ) -> Result<CatalogUpsertResult, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        let mut id_mappings = Vec::new();
        let mut stored = Vec::with_capacity(objects.len());
        for mut object in objects {
            let temp_id = object.id.clone();
            map_temp_id(&mut state, &mut object.id, &mut id_mappings);
            object.version = Some(1);
            if let Some(data) = object.item_data.as_mut() {
                for variation in data.variations.iter_mut() {
                    map_temp_id(&mut state, &mut variation.id, &mut id_mappings);
                    variation.version = Some(1);
                    if let Some(v) = variation.item_variation_data.as_mut() {
                        if v.item_id.as_deref() == Some(temp_id.as_str()) {
                            v.item_id = Some(object.id.clone());
                        }
                    }
                }
            }
            stored.push(object);
        }
        state.catalog.extend(stored.iter().cloned());
        Ok(CatalogUpsertResult { objects: stored, id_mappings })
    }

    async fn search_catalog_items(
        &self,
        scope: &SellerScope,
        query: SearchCatalogItemsRequest,
    ) -> Result<CatalogPage, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        let needle = query.text_filter.map(|t| t.to_lowercase());
        let matches = state
            .catalog
            .iter()
            .filter(|o| o.object_type == CatalogObjectType::Item)
            .filter(|o| match &needle {
                None => true,
                Some(needle) => o.item_data.as_ref().is_some_and(|d| {
                    [&d.name, &d.description].iter().any(|s| s.as_deref().is_some_and(|s| s.to_lowercase().contains(needle)))
                }),
            })
            .cloned()
            .collect::<Vec<_>>();
        let start = query.cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or_default();
        let limit = query.limit.unwrap_or(100) as usize;
        let items = matches.iter().skip(start).take(limit).cloned().collect::<Vec<_>>();
        let end = start + items.len();
        let cursor = (end < matches.len()).then(|| end.to_string());
        Ok(CatalogPage { items, cursor })
    }
}

impl CheckoutManagement for FakePlatform {
    async fn create_payment_link(
        &self,
        scope: &SellerScope,
        link: NewPaymentLink,
    ) -> Result<PaymentLinkResult, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        let order = match (&link.order, &link.quick_pay) {
            (Some(order), _) => order.clone(),
            (None, Some(quick_pay)) => Order {
                location_id: quick_pay.location_id.clone(),
                line_items: vec![OrderLineItem {
                    name: Some(quick_pay.name.clone()),
                    quantity: "1".to_string(),
                    base_price_money: Some(quick_pay.price_money.clone()),
                    ..Default::default()
                }],
                ..Default::default()
            },
            (None, None) => return Err(remote_error(400, "MISSING_REQUIRED_PARAMETER", "order or quick_pay".into())),
        };
        let order = state.create_order(Order { state: Some(OrderState::Draft), ..order });
        let id = state.new_id("LINK");
        state.payment_links.push(link.clone());
        let payment_link = PaymentLink {
            url: format!("https://square.link/u/{id}"),
            long_url: Some(format!("https://checkout.square.site/merchant/FAKE/order/{}", order.id.clone().unwrap_or_default())),
            id,
            version: Some(1),
            order_id: order.id,
            description: link.description,
            checkout_options: link.checkout_options,
            created_at: None,
        };
        Ok(PaymentLinkResult { payment_link, related_resources: None })
    }
}

impl LocationManagement for FakePlatform {
    async fn fetch_locations(&self, scope: &SellerScope) -> Result<Vec<Location>, PlatformError> {
        let mut state = self.state.lock();
        state.record(scope);
        Ok(state.locations.clone())
    }
}
