//! The in-memory cart and its line items.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s holding at most one line per
//! product. All mutation goes through [`Cart::add`] and [`Cart::remove`], which
//! keep that invariant; lines deserialized from storage are funnelled through
//! [`Cart::from_items`] for the same reason.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::{Price, PriceError};

/// One product line in the cart.
///
/// `stock` is the inventory the client knew about when the line was first
/// added. It is never refreshed, so it can go stale; the backend re-validates
/// quantities at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub stock: u32,
}

impl CartItem {
    /// Price multiplied by quantity, unrounded.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the amount is out of range. Lines
    /// held by a [`Cart`] never overflow.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.price.checked_times(self.quantity)
    }
}

/// Result of a successful [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Inserted,
    /// An existing line was bumped to `quantity`.
    Incremented { quantity: u32 },
}

/// Business-rule rejection of an add. The cart is left untouched.
///
/// The `Display` text is the message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddRejection {
    #[error("\"{name}\" is out of stock.")]
    OutOfStock { name: String },
    #[error("Cannot add more \"{name}\". Maximum stock reached.")]
    MaxStockReached { name: String, stock: u32 },
    #[error("Cannot add more \"{name}\". The cart total is too large.")]
    TotalTooLarge { name: String },
}

/// Ordered cart lines, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw lines, e.g. read back from storage.
    ///
    /// Keeps the first line for each product id and drops lines with a zero
    /// quantity, as well as lines that would push the total out of range, so
    /// the result always satisfies the cart invariants.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        let mut total = Price::ZERO;
        for item in items {
            if item.quantity == 0 || cart.get(item.id).is_some() {
                continue;
            }
            let Ok(next) = item.line_total().and_then(|line| total.checked_add(line)) else {
                continue;
            };
            total = next;
            cart.items.push(item);
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Grand total: sum of unrounded line totals.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the sum is out of range. [`Cart::add`]
    /// and [`Cart::from_items`] refuse lines that would cause this.
    pub fn total(&self) -> Result<Price, PriceError> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |sum, item| sum.checked_add(item.line_total()?))
    }

    /// Add one unit of a product.
    ///
    /// An existing line is incremented only while its quantity is below
    /// `stock`; a new line is appended only when `stock > 0`. The stock of an
    /// existing line is compared against the incoming `stock`, and the line's
    /// own snapshot is left as it was.
    ///
    /// # Errors
    ///
    /// Returns an [`AddRejection`] when the stock bound forbids the add, or
    /// when one more unit would take the grand total out of range. The cart
    /// is unchanged in both cases.
    pub fn add(
        &mut self,
        id: ProductId,
        name: &str,
        price: Price,
        stock: u32,
    ) -> Result<AddOutcome, AddRejection> {
        let unit_price = self.get(id).map_or(price, |line| line.price);
        let fits = self
            .total()
            .and_then(|total| total.checked_add(unit_price))
            .is_ok();

        if let Some(line) = self.items.iter_mut().find(|item| item.id == id) {
            if line.quantity >= stock {
                return Err(AddRejection::MaxStockReached {
                    name: name.to_string(),
                    stock,
                });
            }
            if !fits {
                return Err(AddRejection::TotalTooLarge {
                    name: name.to_string(),
                });
            }
            line.quantity += 1;
            return Ok(AddOutcome::Incremented {
                quantity: line.quantity,
            });
        }

        if stock == 0 {
            return Err(AddRejection::OutOfStock {
                name: name.to_string(),
            });
        }
        if !fits {
            return Err(AddRejection::TotalTooLarge {
                name: name.to_string(),
            });
        }

        self.items.push(CartItem {
            id,
            name: name.to_string(),
            price,
            quantity: 1,
            stock,
        });
        Ok(AddOutcome::Inserted)
    }

    /// Remove every line for `id`, returning how many were removed.
    pub fn remove(&mut self, id: ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before - self.items.len()
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
