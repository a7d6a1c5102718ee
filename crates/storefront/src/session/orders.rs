use tracing::{info, instrument};

use super::PageSession;
use crate::api::{ApiError, StoreApi};
use crate::display::{DisplaySurface, OrderHistoryView, Region, UserAgent};
use crate::error::AppError;
use crate::storage::KeyValueStore;

/// Path of the order history page, used as the post-login return target.
pub const ORDERS_PATH: &str = "/orders";

impl<A, S, D, U> PageSession<A, S, D, U>
where
    A: StoreApi,
    S: KeyValueStore,
    D: DisplaySurface,
    U: UserAgent,
{
    /// Fetch the customer's orders and draw them.
    ///
    /// A signed-out shopper is sent to login with a return to the order
    /// page. Needs both the list and the "no orders" regions.
    #[instrument(skip(self))]
    pub async fn load_order_history(&mut self) {
        let surface = self.cart.surface();
        if !(surface.has_region(Region::OrdersList) && surface.has_region(Region::NoOrders)) {
            return;
        }

        let history = match self.api.fetch_orders().await {
            Ok(orders) => OrderHistoryView::from(orders.as_slice()),
            Err(ApiError::Unauthorized) => {
                info!("Order history requires sign-in");
                let location = self.login.location(ORDERS_PATH);
                self.cart.agent_mut().navigate(&location);
                return;
            }
            Err(err) => {
                AppError::from(err).report();
                OrderHistoryView::Unavailable
            }
        };
        self.cart.surface_mut().render_orders(&history);
    }
}
