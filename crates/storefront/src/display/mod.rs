//! Rendering port.
//!
//! The cart logic never touches a concrete display technology. It talks to a
//! [`DisplaySurface`], which reports which [`Region`]s the current page has
//! and draws view models into them, and to a [`UserAgent`], which shows
//! blocking notifications and performs navigation.
//!
//! A missing region turns the matching feature into a no-op, so the same
//! session code drives the index page, the order history page and the
//! product detail page.
//!
//! [`HtmlPage`] is the markup implementation rendered with Askama.

mod html;
pub mod views;

pub use html::HtmlPage;
pub use views::{
    AddToCartAttributes, CartItemView, CartView, OrderHistoryView, OrderLineView, OrderView,
    ProductCardView, ProductListingView,
};

use cartkit_core::ProductId;

/// Named areas of a storefront page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Product cards on the index page.
    ProductList,
    /// Cart line rows.
    CartItems,
    /// Cart grand total.
    CartTotal,
    /// Checkout button.
    Checkout,
    /// Marker for the order history page.
    OrderHistory,
    /// Order cards.
    OrdersList,
    /// "No orders yet" placeholder.
    NoOrders,
    /// Add-to-cart control on a product detail page.
    ProductDetail,
}

impl Region {
    /// Element id the region is known by in page markup.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::ProductList => "product-list",
            Self::CartItems => "cart-items",
            Self::CartTotal => "cart-total",
            Self::Checkout => "checkout-btn",
            Self::OrderHistory => "order-history",
            Self::OrdersList => "orders-list",
            Self::NoOrders => "no-orders",
            Self::ProductDetail => "product-detail-info",
        }
    }
}

/// UI events raised by page controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// An add-to-cart control was activated; carries its data attributes.
    AddToCart(AddToCartAttributes),
    /// A cart row's remove control was activated.
    RemoveFromCart(ProductId),
    /// The checkout button was activated.
    Checkout,
}

/// Where the session draws its state.
///
/// Every render replaces the region's previous content wholesale, including
/// any controls bound inside it.
pub trait DisplaySurface {
    /// Whether the page has `region`.
    fn has_region(&self, region: Region) -> bool;

    /// Draw the cart rows and total. Only called when both
    /// [`Region::CartItems`] and [`Region::CartTotal`] are present.
    fn render_cart(&mut self, cart: &CartView);

    /// Draw the product listing. Only called when [`Region::ProductList`] is
    /// present.
    fn render_products(&mut self, listing: &ProductListingView);

    /// Draw the order history. Only called when [`Region::OrdersList`] and
    /// [`Region::NoOrders`] are present.
    fn render_orders(&mut self, history: &OrderHistoryView);
}

/// Browser-side effects that are not rendering.
pub trait UserAgent {
    /// Show a blocking notification.
    fn alert(&mut self, message: &str);

    /// Leave the page for `location`.
    fn navigate(&mut self, location: &str);
}
