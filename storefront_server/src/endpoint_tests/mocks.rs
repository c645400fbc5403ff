use mockall::mock;
use square_tools::{
    data_objects::{CatalogPage, NewPaymentLink, PaymentLinkResult, SearchCatalogItemsRequest},
    CatalogObject,
    CatalogUpsertResult,
    Location,
    Order,
    OrderUpdate,
};
use storefront_engine::{
    CatalogManagement,
    CheckoutManagement,
    LocationManagement,
    OrderManagement,
    PlatformError,
    SellerScope,
};

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn upsert_catalog_objects(&self, scope: &SellerScope, objects: Vec<CatalogObject>) -> Result<CatalogUpsertResult, PlatformError>;
        async fn search_catalog_items(&self, scope: &SellerScope, query: SearchCatalogItemsRequest) -> Result<CatalogPage, PlatformError>;
    }
}

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn create_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError>;
        async fn fetch_order(&self, scope: &SellerScope, order_id: &str) -> Result<Order, PlatformError>;
        async fn update_order(&self, scope: &SellerScope, order_id: &str, update: OrderUpdate) -> Result<Order, PlatformError>;
        async fn calculate_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError>;
    }
}

mock! {
    pub CheckoutManager {}
    impl OrderManagement for CheckoutManager {
        async fn create_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError>;
        async fn fetch_order(&self, scope: &SellerScope, order_id: &str) -> Result<Order, PlatformError>;
        async fn update_order(&self, scope: &SellerScope, order_id: &str, update: OrderUpdate) -> Result<Order, PlatformError>;
        async fn calculate_order(&self, scope: &SellerScope, order: Order) -> Result<Order, PlatformError>;
    }
    impl CheckoutManagement for CheckoutManager {
        async fn create_payment_link(&self, scope: &SellerScope, link: NewPaymentLink) -> Result<PaymentLinkResult, PlatformError>;
    }
}

mock! {
    pub LocationManager {}
    impl LocationManagement for LocationManager {
        async fn fetch_locations(&self, scope: &SellerScope) -> Result<Vec<Location>, PlatformError>;
    }
}
