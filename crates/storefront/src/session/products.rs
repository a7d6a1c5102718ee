use tracing::instrument;

use super::PageSession;
use crate::api::StoreApi;
use crate::display::{DisplaySurface, ProductListingView, Region, UserAgent};
use crate::error::AppError;
use crate::storage::KeyValueStore;

impl<A, S, D, U> PageSession<A, S, D, U>
where
    A: StoreApi,
    S: KeyValueStore,
    D: DisplaySurface,
    U: UserAgent,
{
    /// Fetch the catalog and redraw the listing. Failures and an empty
    /// catalog render placeholders; no-op without a listing region.
    #[instrument(skip(self))]
    pub async fn refresh_products(&mut self) {
        if !self.cart.surface().has_region(Region::ProductList) {
            return;
        }

        let listing = match self.api.fetch_products().await {
            Ok(products) => ProductListingView::from(products.as_slice()),
            Err(err) => {
                AppError::from(err).report();
                ProductListingView::Unavailable
            }
        };
        self.cart.surface_mut().render_products(&listing);
    }
}
