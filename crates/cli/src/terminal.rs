//! Plain-text page surface.
//!
//! [`TerminalPage`] keeps the text of each region it was built with; the
//! command prints the whole page once the session is done. Alerts and
//! redirects go straight to stdout through [`TerminalAgent`].

use std::collections::BTreeMap;
use std::fmt::Write as _;

use cartkit_core::ProductId;
use cartkit_storefront::display::views::{EMPTY_CART_TEXT, ORDERS_UNAVAILABLE_TEXT};
use cartkit_storefront::display::{
    AddToCartAttributes, CartView, DisplaySurface, OrderHistoryView, PageEvent, ProductListingView,
    Region, UserAgent,
};

/// Shown in place of the order list when the customer has none.
pub const NO_ORDERS_TEXT: &str = "You have not placed any orders yet.";

/// A storefront page drawn as text.
#[derive(Debug, Default)]
pub struct TerminalPage {
    regions: BTreeMap<Region, Option<String>>,
    add_controls: Vec<AddToCartAttributes>,
}

impl TerminalPage {
    #[must_use]
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions.into_iter().map(|region| (region, None)).collect(),
            add_controls: Vec::new(),
        }
    }

    /// Listing plus cart, like the shop index.
    #[must_use]
    pub fn storefront() -> Self {
        Self::new([
            Region::ProductList,
            Region::CartItems,
            Region::CartTotal,
            Region::Checkout,
        ])
    }

    /// Listing only.
    #[must_use]
    pub fn catalog() -> Self {
        Self::new([Region::ProductList])
    }

    /// Cart only; no catalog request is made.
    #[must_use]
    pub fn cart() -> Self {
        Self::new([Region::CartItems, Region::CartTotal, Region::Checkout])
    }

    #[must_use]
    pub fn orders() -> Self {
        Self::new([Region::OrderHistory, Region::OrdersList, Region::NoOrders])
    }

    /// Add-to-cart event for `id`, if the current listing offers it.
    #[must_use]
    pub fn add_control(&self, id: ProductId) -> Option<PageEvent> {
        let id = id.to_string();
        self.add_controls
            .iter()
            .find(|attrs| attrs.id == id)
            .cloned()
            .map(PageEvent::AddToCart)
    }

    /// Drawn regions in page order, separated by blank lines.
    #[must_use]
    pub fn transcript(&self) -> String {
        self.regions
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn draw(&mut self, region: Region, text: Option<String>) {
        if let Some(slot) = self.regions.get_mut(&region) {
            *slot = text;
        }
    }
}

impl DisplaySurface for TerminalPage {
    fn has_region(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    fn render_cart(&mut self, cart: &CartView) {
        let items = if cart.is_empty() {
            EMPTY_CART_TEXT.to_string()
        } else {
            let mut text = String::from("Cart:");
            for item in &cart.items {
                let _ = write!(text, "\n  {} x {}  ${}", item.name, item.quantity, item.line_total);
            }
            text
        };
        self.draw(Region::CartItems, Some(items));
        self.draw(Region::CartTotal, Some(format!("Total: ${}", cart.total)));
    }

    fn render_products(&mut self, listing: &ProductListingView) {
        let text = match listing {
            ProductListingView::Products(cards) => {
                self.add_controls = cards.iter().map(|c| c.add_to_cart.clone()).collect();
                let mut text = String::from("Products:");
                for card in cards {
                    let _ = write!(
                        text,
                        "\n  #{} {}  ${}  (stock {})",
                        card.id, card.name, card.price, card.stock
                    );
                }
                text
            }
            ProductListingView::Empty | ProductListingView::Unavailable => {
                self.add_controls.clear();
                listing.placeholder().unwrap_or_default().to_string()
            }
        };
        self.draw(Region::ProductList, Some(text));
    }

    fn render_orders(&mut self, history: &OrderHistoryView) {
        match history {
            OrderHistoryView::Orders(orders) => {
                let mut text = String::from("Orders:");
                for order in orders {
                    let _ = write!(
                        text,
                        "\n  Order #{} ({})  ${}",
                        order.order_id, order.order_date, order.total
                    );
                    for line in &order.items {
                        let _ = write!(
                            text,
                            "\n    {} x {} - ${} each",
                            line.product_name, line.quantity, line.price_each
                        );
                    }
                }
                self.draw(Region::OrdersList, Some(text));
                self.draw(Region::NoOrders, None);
            }
            OrderHistoryView::Empty => {
                self.draw(Region::OrdersList, None);
                self.draw(Region::NoOrders, Some(NO_ORDERS_TEXT.to_string()));
            }
            OrderHistoryView::Unavailable => {
                self.draw(Region::OrdersList, Some(ORDERS_UNAVAILABLE_TEXT.to_string()));
                self.draw(Region::NoOrders, None);
            }
        }
    }
}

/// Prints alerts and redirects.
#[derive(Debug, Default)]
pub struct TerminalAgent {
    redirect: Option<String>,
}

impl TerminalAgent {
    /// Where the session asked to navigate, if anywhere.
    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}

impl UserAgent for TerminalAgent {
    fn alert(&mut self, message: &str) {
        println!("{message}");
    }

    fn navigate(&mut self, location: &str) {
        println!("Sign in at {location}");
        self.redirect = Some(location.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartkit_core::{Cart, Order, OrderId, OrderLine, Price, Product};

    use super::*;

    #[test]
    fn test_cart_transcript() {
        let mut cart = Cart::new();
        let pen: Price = "1.5".parse().unwrap();
        cart.add(ProductId::new(1), "Pen", pen, 3).unwrap();
        cart.add(ProductId::new(1), "Pen", pen, 3).unwrap();

        let mut page = TerminalPage::cart();
        page.render_cart(&CartView::from(&cart));
        assert_eq!(page.transcript(), "Cart:\n  Pen x 2  $3.00\n\nTotal: $3.00");

        page.render_cart(&CartView::from(&Cart::new()));
        assert_eq!(page.transcript(), "Your cart is empty.\n\nTotal: $0.00");
    }

    #[test]
    fn test_listing_binds_add_controls() {
        let products = [Product {
            id: ProductId::new(4),
            name: "Notebook".to_string(),
            price: Price::from_cents(350),
            stock: 12,
            image_url: String::new(),
        }];
        let mut page = TerminalPage::catalog();
        page.render_products(&ProductListingView::from(&products[..]));

        assert_eq!(page.transcript(), "Products:\n  #4 Notebook  $3.50  (stock 12)");
        assert!(page.add_control(ProductId::new(4)).is_some());
        assert!(page.add_control(ProductId::new(5)).is_none());

        page.render_products(&ProductListingView::Unavailable);
        assert!(page.add_control(ProductId::new(4)).is_none());
    }

    #[test]
    fn test_order_history_text() {
        let orders = [Order {
            order_id: OrderId::new(12),
            order_date: "2024-05-01 10:00:00".to_string(),
            total_amount: Price::from_cents(300),
            items: vec![OrderLine {
                product_name: "Pen".to_string(),
                quantity: 2,
                price_at_purchase: Price::from_cents(150),
            }],
        }];
        let mut page = TerminalPage::orders();
        page.render_orders(&OrderHistoryView::from(&orders[..]));
        assert_eq!(
            page.transcript(),
            "Orders:\n  Order #12 (2024-05-01 10:00:00)  $3.00\n    Pen x 2 - $1.50 each"
        );

        page.render_orders(&OrderHistoryView::Empty);
        assert_eq!(page.transcript(), NO_ORDERS_TEXT);
    }

    #[test]
    fn test_regions_not_on_page_are_ignored() {
        let mut page = TerminalPage::catalog();
        page.render_cart(&CartView::empty());
        assert!(!page.has_region(Region::CartItems));
        assert_eq!(page.transcript(), "");
    }
}
