//! View models handed to a [`DisplaySurface`](super::DisplaySurface).
//!
//! Money is pre-formatted with two decimals here so every surface shows the
//! same figures.

use cartkit_core::{Cart, CartItem, Order, OrderLine, Price, PriceError, Product, ProductId};

/// Placeholder shown in the cart region when there are no lines.
pub const EMPTY_CART_TEXT: &str = "Your cart is empty.";
/// Placeholder shown when the catalog could not be fetched.
pub const PRODUCTS_UNAVAILABLE_TEXT: &str = "Error loading products. Please try again later.";
/// Placeholder shown when the catalog is empty.
pub const NO_PRODUCTS_TEXT: &str = "No products available at the moment.";
/// Message shown when order history could not be fetched.
pub const ORDERS_UNAVAILABLE_TEXT: &str = "Failed to load order history. Please try again later.";
/// Shown in place of an amount that does not fit the decimal range.
pub const AMOUNT_UNAVAILABLE_TEXT: &str = "n/a";

fn money(amount: Result<Price, PriceError>) -> String {
    amount.map_or_else(|_| AMOUNT_UNAVAILABLE_TEXT.to_string(), |price| price.to_string())
}

// =============================================================================
// Cart
// =============================================================================

/// One cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Price × quantity, two decimals.
    pub line_total: String,
}

/// The whole cart as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Sum of line totals, two decimals.
    pub total: String,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "0.00".to_string(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartItem> for CartItemView {
    fn from(line: &CartItem) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            quantity: line.quantity,
            line_total: money(line.line_total()),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: money(cart.total()),
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// Data attributes carried by an add-to-cart control.
///
/// Values stay raw strings, as a page would hold them; the cart manager
/// normalizes them when the control fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartAttributes {
    pub id: String,
    pub name: String,
    pub price: String,
    pub stock: String,
}

impl From<&Product> for AddToCartAttributes {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.amount().to_string(),
            stock: product.stock.to_string(),
        }
    }
}

/// One product card in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub href: String,
    pub image_url: String,
    pub stock: u32,
    pub price: String,
    pub add_to_cart: AddToCartAttributes,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            href: format!("/product/{}", product.id),
            image_url: product.image_url.clone(),
            stock: product.stock,
            price: product.price.to_string(),
            add_to_cart: AddToCartAttributes::from(product),
        }
    }
}

/// What the product listing region shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductListingView {
    Products(Vec<ProductCardView>),
    Empty,
    Unavailable,
}

impl ProductListingView {
    /// Placeholder text, when the listing has no cards.
    #[must_use]
    pub const fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Products(_) => None,
            Self::Empty => Some(NO_PRODUCTS_TEXT),
            Self::Unavailable => Some(PRODUCTS_UNAVAILABLE_TEXT),
        }
    }
}

impl From<&[Product]> for ProductListingView {
    fn from(products: &[Product]) -> Self {
        if products.is_empty() {
            Self::Empty
        } else {
            Self::Products(products.iter().map(ProductCardView::from).collect())
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One purchased line within an order card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineView {
    pub product_name: String,
    pub quantity: u32,
    pub price_each: String,
}

/// One order card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub order_id: String,
    pub order_date: String,
    pub total: String,
    pub items: Vec<OrderLineView>,
}

impl From<&OrderLine> for OrderLineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            price_each: line.price_at_purchase.to_string(),
        }
    }
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            order_date: order.order_date.clone(),
            total: order.total_amount.to_string(),
            items: order.items.iter().map(OrderLineView::from).collect(),
        }
    }
}

/// What the order history regions show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderHistoryView {
    Orders(Vec<OrderView>),
    Empty,
    Unavailable,
}

impl From<&[Order]> for OrderHistoryView {
    fn from(orders: &[Order]) -> Self {
        if orders.is_empty() {
            Self::Empty
        } else {
            Self::Orders(orders.iter().map(OrderView::from).collect())
        }
    }
}
