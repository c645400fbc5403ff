use square_tools::{Order, OrderUpdate};

use crate::traits::{PlatformError, SellerScope};

/// The `OrderManagement` trait defines the order operations the storefront needs from a payment platform.
///
/// Orders are owned and versioned by the platform. Implementations must pass the version in an [`OrderUpdate`] through
/// unchanged, so that the platform can reject updates that are based on a stale copy of the order.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Creates a new order and returns it as stored by the platform, including its id and version.
    async fn create_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError>;

    async fn fetch_order(&self, scope: &SellerScope, order_id: &str) -> Result<Order, PlatformError>;

    /// Applies a sparse update to the order. `update.order.version` must be the order's current version.
    async fn update_order(
        &self,
        scope: &SellerScope,
        order_id: &str,
        update: OrderUpdate,
    ) -> Result<Order, PlatformError>;

    /// Prices the given order without persisting anything.
    async fn calculate_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError>;
}
