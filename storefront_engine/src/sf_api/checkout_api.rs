use std::fmt::Debug;

use log::*;
use square_tools::{
    data_objects::{CheckoutOptions, NewPaymentLink, QuickPay},
    Money,
    Order,
};

use crate::{
    sf_api::{
        cart_api::pricing_copy,
        checkout_objects::{CheckoutLink, CheckoutRequest, PlatformFee, QuickPayRequest},
        common_objects::{currency_or, non_blank, require_non_blank},
        errors::{CartError, CheckoutError},
    },
    traits::{CheckoutManagement, OrderManagement, SellerScope},
};

/// `CheckoutApi` creates hosted payment links, either for an existing cart or for a one-off amount.
///
/// When the request runs on behalf of a connected seller, the platform's application fee is added to the link.
pub struct CheckoutApi<B> {
    backend: B,
    currency: String,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi ({})", self.currency)
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement + CheckoutManagement
{
    pub fn new<S: Into<String>>(backend: B, currency: S) -> Self {
        Self { backend, currency: currency.into() }
    }

    pub async fn create_link(
        &self,
        scope: &SellerScope,
        request: CheckoutRequest,
        fee: PlatformFee,
    ) -> Result<CheckoutLink, CheckoutError> {
        let invalid = CheckoutError::InvalidRequest;
        let redirect_url = non_blank(request.redirect_url.as_deref());
        if let Some(url) = &redirect_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(invalid(format!("redirect_url must be an http(s) URL, not {url}")));
            }
        }
        let order_id = non_blank(request.order_id.as_deref());
        let (mut link, total) = match (order_id, request.quick_pay) {
            (Some(order_id), None) => self.link_for_order(scope, &order_id).await?,
            (None, Some(quick_pay)) => self.quick_pay_link(scope, quick_pay)?,
            (Some(_), Some(_)) => return Err(invalid("Supply either an order_id or quick_pay, not both".to_string())),
            (None, None) => return Err(invalid("Supply either an order_id or quick_pay".to_string())),
        };
        let app_fee_money = match (scope.is_seller(), fee.fee_for(total.amount)) {
            (true, amount) if amount > 0 => Some(Money::new(amount, total.currency.clone())),
            _ => None,
        };
        if let Some(fee_money) = &app_fee_money {
            debug!("💳️ Adding an application fee of {fee_money} ({} bps of {total})", fee.basis_points);
        }
        if app_fee_money.is_some() || redirect_url.is_some() || request.ask_for_shipping_address.is_some() {
            link.checkout_options = Some(CheckoutOptions {
                app_fee_money,
                redirect_url,
                ask_for_shipping_address: request.ask_for_shipping_address,
                ..Default::default()
            });
        }
        link.description = non_blank(request.description.as_deref());
        let result = self.backend.create_payment_link(scope, link).await?;
        let link = CheckoutLink::from(result.payment_link);
        info!("💳️ Payment link {} created for {total}: {}", link.payment_link_id, link.url);
        Ok(link)
    }

    /// The platform creates a fresh order for every payment link, so the cart's line items and discounts are copied
    /// into a new order that refers back to the cart.
    async fn link_for_order(&self, scope: &SellerScope, order_id: &str) -> Result<(NewPaymentLink, Money), CheckoutError> {
        let order = self.backend.fetch_order(scope, order_id).await?;
        if let Some(state) = order.state {
            if !state.is_mutable() {
                return Err(CartError::OrderNotMutable { order_id: order_id.to_string(), state }.into());
            }
        }
        if order.line_items.is_empty() {
            return Err(CheckoutError::InvalidRequest(format!("Order {order_id} has no line items")));
        }
        let total = order.total_money.clone().unwrap_or_else(|| {
            warn!("💳️ Order {order_id} has no total. No application fee can be charged on it.");
            Money::new(0, self.currency.clone())
        });
        let copy = Order { reference_id: Some(order_id.to_string()), ..pricing_copy(&order) };
        trace!("💳️ Creating a payment link for a copy of order {order_id}");
        Ok((NewPaymentLink { order: Some(copy), ..Default::default() }, total))
    }

    fn quick_pay_link(&self, scope: &SellerScope, quick_pay: QuickPayRequest) -> Result<(NewPaymentLink, Money), CheckoutError> {
        let invalid = CheckoutError::InvalidRequest;
        let name = require_non_blank("quick_pay.name", &quick_pay.name).map_err(invalid)?;
        let amount = quick_pay.price.hundredths().map_err(|e| invalid(format!("quick_pay.price: {e}")))?;
        if amount == 0 {
            return Err(invalid("quick_pay.price must be greater than zero".to_string()));
        }
        let location_id = require_non_blank("location_id", &scope.location_id).map_err(invalid)?;
        let currency = currency_or(quick_pay.currency.as_deref(), &self.currency)
            .map_err(|e| invalid(format!("quick_pay.currency: {e}")))?;
        let price_money = Money::new(amount, currency);
        let link = NewPaymentLink {
            quick_pay: Some(QuickPay { name, price_money: price_money.clone(), location_id }),
            ..Default::default()
        };
        Ok((link, price_money))
    }
}
