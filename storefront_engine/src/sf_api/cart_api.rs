//! Carts are draft orders held by the payment platform.
//!
//! Every change to an existing cart is a read-then-write: the order is fetched, checked, and a sparse update is sent
//! with the version that was just read. If another writer got in first, the platform rejects the update and the error
//! is returned to the caller unchanged.
use std::fmt::Debug;

use log::*;
use serde_json::{Map, Value};
use square_tools::{
    data_objects::{DiscountScope, OrderState},
    helpers::format_quantity,
    Money,
    Order,
    OrderLineItem,
    OrderLineItemDiscount,
    OrderUpdate,
};

use crate::{
    sf_api::{
        cart_objects::{CalculateRequest, DiscountRequest, LineItemUpdate, NewCart, NewLineItem},
        common_objects::{non_blank, require_non_blank},
        errors::CartError,
        promo_code_api::PromoCodeApi,
        promo_objects::{DiscountKind, DiscountRule},
    },
    traits::{OrderManagement, SellerScope},
};

pub struct CartApi<B> {
    backend: B,
    promos: PromoCodeApi,
    currency: String,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({}, {:?})", self.currency, self.promos)
    }
}

impl<B> CartApi<B>
where B: OrderManagement
{
    pub fn new<S: Into<String>>(backend: B, promos: PromoCodeApi, currency: S) -> Self {
        Self { backend, promos, currency: currency.into() }
    }

    /// Creates a new DRAFT order, optionally with some initial line items.
    pub async fn create_cart(&self, scope: &SellerScope, cart: NewCart) -> Result<Order, CartError> {
        let location_id = non_blank(cart.location_id.as_deref())
            .or_else(|| non_blank(Some(scope.location_id.as_str())))
            .ok_or_else(|| CartError::InvalidRequest("'location_id' is required".to_string()))?;
        let line_items = cart
            .line_items
            .into_iter()
            .map(|item| build_line_item(item, &self.currency))
            .collect::<Result<Vec<_>, _>>()?;
        let order = Order {
            location_id,
            state: Some(OrderState::Draft),
            reference_id: non_blank(cart.reference_id.as_deref()),
            customer_id: non_blank(cart.customer_id.as_deref()),
            line_items,
            ..Default::default()
        };
        let order = self.backend.create_order(scope, order).await?;
        info!(
            "🛒️ Cart {} created at {} with {} line items",
            order.id.as_deref().unwrap_or("??"),
            order.location_id,
            order.line_items.len()
        );
        Ok(order)
    }

    pub async fn fetch_order(&self, scope: &SellerScope, order_id: &str) -> Result<Order, CartError> {
        let order_id = require_non_blank("order_id", order_id).map_err(CartError::InvalidRequest)?;
        Ok(self.backend.fetch_order(scope, &order_id).await?)
    }

    pub async fn add_line_item(&self, scope: &SellerScope, order_id: &str, item: NewLineItem) -> Result<Order, CartError> {
        self.mutate_order(scope, order_id, |order| {
            let line_item = build_line_item(item, &self.order_currency(order))?;
            debug!("🛒️ Adding line item {:?} x{} to order {order_id}", line_item.name, line_item.quantity);
            Ok(Some(OrderUpdate { order: Order { line_items: vec![line_item], ..Default::default() }, ..Default::default() }))
        })
        .await
    }

    pub async fn update_line_item(
        &self,
        scope: &SellerScope,
        order_id: &str,
        uid: &str,
        update: LineItemUpdate,
    ) -> Result<Order, CartError> {
        if update.quantity.is_none() && update.note.is_none() {
            return Err(CartError::InvalidRequest("Nothing to update. Supply a quantity or a note".to_string()));
        }
        let quantity = update
            .quantity
            .as_ref()
            .map(|q| q.whole_units().map(format_quantity))
            .transpose()
            .map_err(CartError::InvalidRequest)?;
        self.mutate_order(scope, order_id, |order| {
            let existing = order.line_item(uid).ok_or_else(|| line_item_not_found(order_id, uid))?;
            let mut fields_to_clear = Vec::new();
            let note = match update.note.as_deref().map(str::trim) {
                Some("") => {
                    fields_to_clear.push(format!("line_items[{uid}].note"));
                    None
                },
                other => other.map(String::from),
            };
            let line_item = OrderLineItem {
                uid: Some(uid.to_string()),
                quantity: quantity.clone().unwrap_or_else(|| existing.quantity.clone()),
                note,
                ..Default::default()
            };
            debug!("🛒️ Updating line item {uid} on order {order_id}: quantity {}", line_item.quantity);
            Ok(Some(OrderUpdate { order: Order { line_items: vec![line_item], ..Default::default() }, fields_to_clear }))
        })
        .await
    }

    pub async fn remove_line_item(&self, scope: &SellerScope, order_id: &str, uid: &str) -> Result<Order, CartError> {
        self.mutate_order(scope, order_id, |order| {
            order.line_item(uid).ok_or_else(|| line_item_not_found(order_id, uid))?;
            debug!("🛒️ Removing line item {uid} from order {order_id}");
            Ok(Some(OrderUpdate { fields_to_clear: vec![format!("line_items[{uid}]")], ..Default::default() }))
        })
        .await
    }

    /// Replaces any order-level discounts with the requested one, in a single update.
    pub async fn apply_discount(
        &self,
        scope: &SellerScope,
        order_id: &str,
        request: DiscountRequest,
    ) -> Result<Order, CartError> {
        // Resolved up front so that bad requests never touch the platform
        let (name, rule) = self.resolve_discount(&request)?;
        self.mutate_order(scope, order_id, |order| {
            let discount = rule.to_order_discount(&name, &self.order_currency(order));
            let fields_to_clear = clear_order_discounts(order);
            info!("🛒️ Applying discount '{name}' ({} {}) to order {order_id}", rule.kind(), rule.display_value());
            Ok(Some(OrderUpdate { order: Order { discounts: vec![discount], ..Default::default() }, fields_to_clear }))
        })
        .await
    }

    /// Removes every order-level discount. Orders without discounts are returned as they are, without an update.
    pub async fn clear_discounts(&self, scope: &SellerScope, order_id: &str) -> Result<Order, CartError> {
        self.mutate_order(scope, order_id, |order| {
            let fields_to_clear = clear_order_discounts(order);
            if fields_to_clear.is_empty() {
                debug!("🛒️ Order {order_id} has no discounts to clear");
                return Ok(None);
            }
            info!("🛒️ Clearing {} discounts from order {order_id}", fields_to_clear.len());
            Ok(Some(OrderUpdate { fields_to_clear, ..Default::default() }))
        })
        .await
    }

    /// Prices the order as it stands (plus an optional discount preview) without changing it.
    pub async fn calculate(
        &self,
        scope: &SellerScope,
        order_id: &str,
        request: CalculateRequest,
    ) -> Result<Order, CartError> {
        let preview = request.discount.as_ref().map(|d| self.resolve_discount(d)).transpose()?;
        let order = self.fetch_order(scope, order_id).await?;
        let mut copy = pricing_copy(&order);
        if let Some((name, rule)) = preview {
            // The preview stands in for the order-level discounts, as it would if it were applied
            trace!("🛒️ Previewing discount '{name}' on order {order_id}");
            copy.discounts.retain(|d| matches!(d.scope, Some(DiscountScope::LineItem)));
            copy.discounts.push(rule.to_order_discount(&name, &self.order_currency(&order)));
        }
        let mut priced = self.backend.calculate_order(scope, copy).await?;
        priced.id = order.id;
        priced.version = order.version;
        debug!("🛒️ Calculated order {order_id}. Total: {:?}", priced.total_money.as_ref().map(Money::to_string));
        Ok(priced)
    }

    /// Fetches the order, lets `change` build a sparse update from it, and writes the update stamped with the version
    /// that was read. If `change` returns `None`, nothing is written and the fetched order is returned.
    async fn mutate_order<F>(&self, scope: &SellerScope, order_id: &str, change: F) -> Result<Order, CartError>
    where F: FnOnce(&Order) -> Result<Option<OrderUpdate>, CartError> {
        let order = self.fetch_order(scope, order_id).await?;
        if let Some(state) = order.state {
            if !state.is_mutable() {
                return Err(CartError::OrderNotMutable { order_id: order_id.to_string(), state });
            }
        }
        let Some(mut update) = change(&order)? else {
            return Ok(order);
        };
        update.order.location_id = order.location_id.clone();
        update.order.version = order.version;
        trace!("🛒️ Writing update to order {order_id} based on version {:?}", order.version);
        Ok(self.backend.update_order(scope, order_id, update).await?)
    }

    fn resolve_discount(&self, request: &DiscountRequest) -> Result<(String, DiscountRule), CartError> {
        let invalid = CartError::InvalidRequest;
        let explicit = request.percentage.is_some() || request.amount.is_some();
        if let Some(code) = non_blank(request.promo_code.as_deref()) {
            if explicit {
                return Err(invalid("Supply either a promo code or an explicit discount, not both".to_string()));
            }
            let promo = self.promos.fetch(&code).ok_or(CartError::UnknownPromoCode(code))?;
            return Ok((promo.name, promo.rule));
        }
        let rule = match (&request.percentage, &request.amount) {
            (Some(p), None) => DiscountRule::new(DiscountKind::Percentage, p),
            (None, Some(a)) => DiscountRule::new(DiscountKind::Fixed, a),
            (Some(_), Some(_)) => Err("Supply either a percentage or an amount, not both".to_string()),
            (None, None) => Err("Supply a promo code, a percentage or an amount".to_string()),
        }
        .map_err(invalid)?;
        let name = require_non_blank("name", request.name.as_deref().unwrap_or_default()).map_err(invalid)?;
        Ok((name, rule))
    }

    fn order_currency(&self, order: &Order) -> String {
        order.total_money.as_ref().map(|m| m.currency.clone()).unwrap_or_else(|| self.currency.clone())
    }
}

fn line_item_not_found(order_id: &str, uid: &str) -> CartError {
    CartError::LineItemNotFound { order_id: order_id.to_string(), uid: uid.to_string() }
}

fn clear_order_discounts(order: &Order) -> Vec<String> {
    order.order_level_discounts().filter_map(|d| d.uid.as_ref()).map(|uid| format!("discounts[{uid}]")).collect()
}

pub(crate) fn build_line_item(item: NewLineItem, currency: &str) -> Result<OrderLineItem, CartError> {
    let invalid = CartError::InvalidRequest;
    let quantity = match &item.quantity {
        Some(q) => q.whole_units().map_err(invalid)?,
        None => 1,
    };
    let note = non_blank(item.note.as_deref());
    if let Some(catalog_object_id) = non_blank(item.catalog_object_id.as_deref()) {
        if item.price.is_some() {
            debug!("🛒️ Ignoring the price given for catalog item {catalog_object_id}. The catalog price applies.");
        }
        return Ok(OrderLineItem {
            catalog_object_id: Some(catalog_object_id),
            quantity: format_quantity(quantity),
            note,
            ..Default::default()
        });
    }
    let name = require_non_blank("name", item.name.as_deref().unwrap_or_default())
        .map_err(|_| invalid("A line item needs either a catalog_object_id or a name and a price".to_string()))?;
    let price = item.price.ok_or_else(|| invalid(format!("Line item '{name}' has no price")))?;
    let amount = price.hundredths().map_err(|e| invalid(format!("Line item '{name}': {e}")))?;
    Ok(OrderLineItem {
        name: Some(name),
        quantity: format_quantity(quantity),
        note,
        base_price_money: Some(Money::new(amount, currency)),
        ..Default::default()
    })
}

/// Order fields, beyond line items and discounts, that the platform prices from.
const ORDER_PRICING_FIELDS: [&str; 3] = ["taxes", "service_charges", "pricing_options"];
const LINE_ITEM_PRICING_FIELDS: [&str; 4] = ["item_type", "catalog_version", "modifiers", "pricing_blocklists"];
const DISCOUNT_PRICING_FIELDS: [&str; 3] = ["catalog_object_id", "catalog_version", "pricing_rule_id"];
/// Amounts the platform computes. They are read-only and are rejected if sent back.
const COMPUTED_AMOUNTS: [&str; 4] = ["applied_money", "total_money", "total_tax_money", "total_price_money"];

/// A copy of the order holding just what determines its price: line items, discounts of either scope, taxes and
/// service charges, with every computed amount removed.
///
/// Catalog-backed line items keep their catalog reference instead of a price so that the catalog price applies. A line
/// item keeps the discounts and taxes applied to it explicitly, i.e. those with `LINE_ITEM` scope. The platform applies
/// the order-scoped ones to every line item by itself.
pub(crate) fn pricing_copy(order: &Order) -> Order {
    let extra = pricing_fields(&order.extra, &ORDER_PRICING_FIELDS);
    let line_item_discounts = order
        .discounts
        .iter()
        .filter(|d| matches!(d.scope, Some(DiscountScope::LineItem)))
        .filter_map(|d| d.uid.as_deref())
        .collect::<Vec<_>>();
    let line_item_taxes = line_item_scoped_uids(order.extra.get("taxes"));
    let line_items = order
        .line_items
        .iter()
        .map(|li| {
            let mut extra = pricing_fields(&li.extra, &LINE_ITEM_PRICING_FIELDS);
            copy_applied(&li.extra, &mut extra, "applied_discounts", "discount_uid", &line_item_discounts);
            copy_applied(&li.extra, &mut extra, "applied_taxes", "tax_uid", &line_item_taxes);
            let (name, base_price_money) = match li.catalog_object_id {
                Some(_) => (None, None),
                None => (li.name.clone(), li.base_price_money.clone()),
            };
            OrderLineItem {
                uid: li.uid.clone(),
                name,
                quantity: li.quantity.clone(),
                catalog_object_id: li.catalog_object_id.clone(),
                note: li.note.clone(),
                base_price_money,
                extra,
                ..Default::default()
            }
        })
        .collect();
    let discounts = order
        .discounts
        .iter()
        .map(|d| OrderLineItemDiscount {
            uid: d.uid.clone(),
            name: d.name.clone(),
            discount_type: d.discount_type.clone(),
            percentage: d.percentage.clone(),
            amount_money: d.amount_money.clone(),
            scope: d.scope.clone(),
            extra: pricing_fields(&d.extra, &DISCOUNT_PRICING_FIELDS),
            ..Default::default()
        })
        .collect();
    Order {
        location_id: order.location_id.clone(),
        customer_id: order.customer_id.clone(),
        line_items,
        discounts,
        extra,
        ..Default::default()
    }
}

fn pricing_fields(extra: &Map<String, Value>, keep: &[&str]) -> Map<String, Value> {
    keep.iter().filter_map(|&k| extra.get(k).map(|v| (k.to_string(), without_computed_amounts(v)))).collect()
}

fn without_computed_amounts(value: &Value) -> Value {
    match value {
        Value::Array(values) => Value::Array(values.iter().map(without_computed_amounts).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(k, _)| !COMPUTED_AMOUNTS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), without_computed_amounts(v)))
                .collect(),
        ),
        v => v.clone(),
    }
}

/// The uids of the taxes in `objects` that have `LINE_ITEM` scope.
fn line_item_scoped_uids(objects: Option<&Value>) -> Vec<&str> {
    objects
        .and_then(Value::as_array)
        .map(|objects| {
            objects
                .iter()
                .filter(|o| o.get("scope").and_then(Value::as_str) == Some("LINE_ITEM"))
                .filter_map(|o| o.get("uid").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Copies the entries of the `field` array that refer (through `uid_field`) to one of `uids`, without their amounts.
fn copy_applied(from: &Map<String, Value>, to: &mut Map<String, Value>, field: &str, uid_field: &str, uids: &[&str]) {
    let Some(entries) = from.get(field).and_then(Value::as_array) else {
        return;
    };
    let kept = entries
        .iter()
        .filter(|e| e.get(uid_field).and_then(Value::as_str).is_some_and(|uid| uids.contains(&uid)))
        .map(without_computed_amounts)
        .collect::<Vec<_>>();
    if !kept.is_empty() {
        to.insert(field.to_string(), Value::Array(kept));
    }
}
