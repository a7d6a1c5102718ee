//! HTML page surface rendered with Askama templates.

use std::collections::BTreeMap;

use askama::Template;
use cartkit_core::{Product, ProductId};

use super::views::{
    AddToCartAttributes, CartView, OrderHistoryView, OrderView, ORDERS_UNAVAILABLE_TEXT,
    ProductCardView, ProductListingView,
};
use super::{DisplaySurface, PageEvent, Region};

/// Cart rows fragment.
#[derive(Template)]
#[template(path = "cart/items.html")]
struct CartItemsTemplate<'a> {
    cart: &'a CartView,
}

/// Product cards fragment.
#[derive(Template)]
#[template(path = "products/list.html")]
struct ProductListTemplate<'a> {
    cards: &'a [ProductCardView],
}

/// Product detail block with its add-to-cart button.
#[derive(Template)]
#[template(path = "products/detail.html")]
struct ProductDetailTemplate<'a> {
    card: &'a ProductCardView,
}

/// Order cards fragment.
#[derive(Template)]
#[template(path = "orders/list.html")]
struct OrderListTemplate<'a> {
    orders: &'a [OrderView],
}

fn render_or_log(template: &impl Template, fragment: &str) -> String {
    match template.render() {
        Ok(markup) => markup.trim().to_string(),
        Err(e) => {
            tracing::error!(error = %e, fragment, "Failed to render template");
            String::new()
        }
    }
}

#[derive(Debug, Clone)]
struct RegionState {
    markup: String,
    visible: bool,
}

impl Default for RegionState {
    fn default() -> Self {
        Self {
            markup: String::new(),
            visible: true,
        }
    }
}

/// An in-memory storefront page.
///
/// Holds the markup of each region it was built with, plus the controls
/// bound by the latest render. Clicks resolve to [`PageEvent`]s only through
/// controls that are currently bound, so a button from a previous render does
/// nothing once its region has been redrawn.
#[derive(Debug, Clone, Default)]
pub struct HtmlPage {
    regions: BTreeMap<Region, RegionState>,
    remove_controls: Vec<ProductId>,
    add_controls: Vec<AddToCartAttributes>,
    detail_control: Option<AddToCartAttributes>,
}

impl HtmlPage {
    /// A page containing exactly `regions`.
    #[must_use]
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|region| (region, RegionState::default()))
                .collect(),
            ..Self::default()
        }
    }

    /// The shop index: listing, cart and checkout button.
    #[must_use]
    pub fn index() -> Self {
        Self::new([
            Region::ProductList,
            Region::CartItems,
            Region::CartTotal,
            Region::Checkout,
        ])
    }

    /// The order history page. It has no cart display.
    #[must_use]
    pub fn order_history() -> Self {
        Self::new([Region::OrderHistory, Region::OrdersList, Region::NoOrders])
    }

    /// A product detail page with its add-to-cart control.
    #[must_use]
    pub fn product_detail(product: &Product) -> Self {
        let mut page = Self::new([Region::ProductDetail]);
        let card = ProductCardView::from(product);
        page.set_markup(
            Region::ProductDetail,
            render_or_log(&ProductDetailTemplate { card: &card }, "product detail"),
        );
        page.detail_control = Some(card.add_to_cart);
        page
    }

    /// Current markup of `region`, if the page has it.
    #[must_use]
    pub fn markup(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(|r| r.markup.as_str())
    }

    /// Whether `region` is shown, if the page has it.
    #[must_use]
    pub fn is_visible(&self, region: Region) -> Option<bool> {
        self.regions.get(&region).map(|r| r.visible)
    }

    /// Products with a currently bound remove control.
    #[must_use]
    pub fn remove_controls(&self) -> &[ProductId] {
        &self.remove_controls
    }

    /// Activate the remove control for `id`.
    #[must_use]
    pub fn click_remove(&self, id: ProductId) -> Option<PageEvent> {
        self.remove_controls
            .contains(&id)
            .then_some(PageEvent::RemoveFromCart(id))
    }

    /// Activate the listing's add-to-cart control for `id`.
    #[must_use]
    pub fn click_add_to_cart(&self, id: ProductId) -> Option<PageEvent> {
        let id = id.to_string();
        self.add_controls
            .iter()
            .find(|attrs| attrs.id == id)
            .cloned()
            .map(PageEvent::AddToCart)
    }

    /// Activate the product detail add-to-cart control.
    #[must_use]
    pub fn click_detail_add_to_cart(&self) -> Option<PageEvent> {
        self.detail_control.clone().map(PageEvent::AddToCart)
    }

    /// Activate the checkout button.
    #[must_use]
    pub fn click_checkout(&self) -> Option<PageEvent> {
        self.has_region(Region::Checkout)
            .then_some(PageEvent::Checkout)
    }

    fn set_markup(&mut self, region: Region, markup: String) {
        if let Some(state) = self.regions.get_mut(&region) {
            state.markup = markup;
        }
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        if let Some(state) = self.regions.get_mut(&region) {
            state.visible = visible;
        }
    }
}

impl DisplaySurface for HtmlPage {
    fn has_region(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    fn render_cart(&mut self, cart: &CartView) {
        self.set_markup(
            Region::CartItems,
            render_or_log(&CartItemsTemplate { cart }, "cart items"),
        );
        self.set_markup(Region::CartTotal, cart.total.clone());
        self.remove_controls = cart.items.iter().map(|item| item.id).collect();
    }

    fn render_products(&mut self, listing: &ProductListingView) {
        let markup = match listing {
            ProductListingView::Products(cards) => {
                self.add_controls = cards.iter().map(|c| c.add_to_cart.clone()).collect();
                render_or_log(&ProductListTemplate { cards }, "product list")
            }
            ProductListingView::Empty | ProductListingView::Unavailable => {
                self.add_controls.clear();
                format!("<p>{}</p>", listing.placeholder().unwrap_or_default())
            }
        };
        self.set_markup(Region::ProductList, markup);
    }

    fn render_orders(&mut self, history: &OrderHistoryView) {
        match history {
            OrderHistoryView::Orders(orders) => {
                self.set_markup(
                    Region::OrdersList,
                    render_or_log(&OrderListTemplate { orders }, "order list"),
                );
                self.set_visible(Region::NoOrders, false);
                self.set_visible(Region::OrdersList, true);
            }
            OrderHistoryView::Empty => {
                self.set_markup(Region::OrdersList, String::new());
                self.set_visible(Region::NoOrders, true);
                self.set_visible(Region::OrdersList, false);
            }
            OrderHistoryView::Unavailable => {
                self.set_markup(
                    Region::OrdersList,
                    format!("<p style=\"color: red;\">{ORDERS_UNAVAILABLE_TEXT}</p>"),
                );
                self.set_visible(Region::NoOrders, false);
            }
        }
    }
}
