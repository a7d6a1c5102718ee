//! Page session.
//!
//! A [`PageSession`] is one loaded storefront page: the cart manager plus
//! the backend client, wired to whichever regions the page has. It runs the
//! page-load sequence and turns [`PageEvent`]s into cart operations,
//! checkout submissions and listing refreshes.
//!
//! Handlers take `&mut self` for their whole duration, including across
//! network awaits, so no two handlers ever interleave on the same cart.

mod checkout;
mod orders;
mod products;

pub use checkout::{CheckoutOutcome, EMPTY_CART_CHECKOUT_TEXT, LOGIN_REQUIRED_TEXT};
pub use orders::ORDERS_PATH;

use tracing::{debug, instrument};

use crate::api::StoreApi;
use crate::cart::CartManager;
use crate::display::{DisplaySurface, PageEvent, Region, UserAgent};
use crate::storage::KeyValueStore;

/// Builds login URLs that carry a return-to hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    login_path: String,
}

impl LoginRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    /// Login location that returns to `next` after signing in.
    #[must_use]
    pub fn location(&self, next: &str) -> String {
        format!("{}?next={}", self.login_path, urlencoding::encode(next))
    }
}

impl Default for LoginRedirect {
    fn default() -> Self {
        Self::new("/login")
    }
}

/// One storefront page and its cart.
#[derive(Debug)]
pub struct PageSession<A, S, D, U> {
    api: A,
    cart: CartManager<S, D, U>,
    login: LoginRedirect,
    page_path: String,
}

impl<A, S, D, U> PageSession<A, S, D, U>
where
    A: StoreApi,
    S: KeyValueStore,
    D: DisplaySurface,
    U: UserAgent,
{
    /// Create a session for the page served at `page_path`.
    pub fn new(
        api: A,
        cart: CartManager<S, D, U>,
        login: LoginRedirect,
        page_path: impl Into<String>,
    ) -> Self {
        Self {
            api,
            cart,
            login,
            page_path: page_path.into(),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn cart(&self) -> &CartManager<S, D, U> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartManager<S, D, U> {
        &mut self.cart
    }

    #[must_use]
    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    /// Restore the cart, then populate every region the page has.
    #[instrument(skip(self), fields(page = %self.page_path))]
    pub async fn on_page_load(&mut self) {
        self.cart.load();

        if self.cart.surface().has_region(Region::ProductList) {
            self.refresh_products().await;
        }

        self.cart.update_cart_display();

        if self.cart.surface().has_region(Region::OrderHistory) {
            self.load_order_history().await;
        }
    }

    /// Run the handler for a UI event to completion.
    pub async fn dispatch(&mut self, event: PageEvent) {
        match event {
            PageEvent::AddToCart(attrs) => {
                if let Err(e) = self.cart.add_to_cart(&attrs) {
                    debug!(error = %e, "Add to cart left the cart unchanged");
                }
            }
            PageEvent::RemoveFromCart(id) => self.cart.remove_from_cart(id),
            PageEvent::Checkout => {
                let outcome = self.checkout().await;
                debug!(?outcome, "Checkout handled");
            }
        }
    }
}
