//! Checkout submission.

use tracing::{info, instrument};

use super::PageSession;
use crate::api::{ApiError, CheckoutReceipt, StoreApi};
use crate::display::{DisplaySurface, UserAgent};
use crate::error::{AppError, add_breadcrumb};
use crate::storage::KeyValueStore;

/// Alert shown when checkout is attempted with nothing in the cart.
pub const EMPTY_CART_CHECKOUT_TEXT: &str = "Your cart is empty!";
/// Alert shown before redirecting a signed-out shopper to login.
pub const LOGIN_REQUIRED_TEXT: &str = "Please log in to complete your purchase.";

/// How a checkout attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to submit; no request was made.
    EmptyCart,
    /// The order was placed and the cart cleared.
    Placed(CheckoutReceipt),
    /// The shopper is signed out and was sent to `location`.
    LoginRequired { location: String },
    /// The backend rejected the order or could not be reached. The cart is
    /// unchanged.
    Failed { reason: String },
}

impl<A, S, D, U> PageSession<A, S, D, U>
where
    A: StoreApi,
    S: KeyValueStore,
    D: DisplaySurface,
    U: UserAgent,
{
    /// Submit the cart as an order.
    ///
    /// On success the cart is emptied and the listing re-fetched so stock
    /// figures reflect the purchase. Every other outcome leaves the cart as
    /// it was.
    #[instrument(skip(self), fields(lines = self.cart.cart().len()))]
    pub async fn checkout(&mut self) -> CheckoutOutcome {
        if self.cart.cart().is_empty() {
            self.cart.agent_mut().alert(EMPTY_CART_CHECKOUT_TEXT);
            return CheckoutOutcome::EmptyCart;
        }

        add_breadcrumb("checkout", "Checkout submitted", None);

        match self.api.checkout(self.cart.cart().items()).await {
            Ok(receipt) => {
                info!(order_id = ?receipt.order_id, "Order placed");
                self.cart.agent_mut().alert(&receipt.message);
                self.cart.clear();
                self.refresh_products().await;
                CheckoutOutcome::Placed(receipt)
            }
            Err(ApiError::Unauthorized) => {
                info!("Checkout requires sign-in");
                let location = self.login.location(&self.page_path);
                let agent = self.cart.agent_mut();
                agent.alert(LOGIN_REQUIRED_TEXT);
                agent.navigate(&location);
                CheckoutOutcome::LoginRequired { location }
            }
            Err(err) => {
                let reason = err.to_string();
                AppError::from(err).report();
                self.cart
                    .agent_mut()
                    .alert(&format!("Checkout failed: {reason}"));
                CheckoutOutcome::Failed { reason }
            }
        }
    }
}
