use square_tools::data_objects::{NewPaymentLink, PaymentLinkResult};

use crate::traits::{PlatformError, SellerScope};

#[allow(async_fn_in_trait)]
pub trait CheckoutManagement {
    /// Creates a hosted checkout page. The platform creates a fresh order for every link.
    async fn create_payment_link(
        &self,
        scope: &SellerScope,
        link: NewPaymentLink,
    ) -> Result<PaymentLinkResult, PlatformError>;
}
