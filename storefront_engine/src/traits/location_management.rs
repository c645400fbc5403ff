use square_tools::Location;

use crate::traits::{PlatformError, SellerScope};

#[allow(async_fn_in_trait)]
pub trait LocationManagement {
    async fn fetch_locations(&self, scope: &SellerScope) -> Result<Vec<Location>, PlatformError>;
}
