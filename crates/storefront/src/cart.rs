//! Cart manager.
//!
//! Owns the session's [`Cart`] together with its persistence adapter, the
//! display surface it is projected onto and the user agent used for
//! notifications. Every mutation is followed, synchronously, by a save and a
//! full re-render.

use cartkit_core::{AddOutcome, AddRejection, Cart, Price, PriceError, ProductId};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::display::{AddToCartAttributes, CartView, DisplaySurface, Region, UserAgent};
use crate::error::add_breadcrumb;
use crate::storage::{CartPersistence, KeyValueStore};

/// Why raw add-to-cart attributes could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("invalid product id {0:?}")]
    Id(String),
    #[error(transparent)]
    Price(#[from] PriceError),
    #[error("invalid stock {0:?}")]
    Stock(String),
}

/// Why an add-to-cart request did not change the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddToCartError {
    #[error(transparent)]
    Rejected(#[from] AddRejection),
    #[error("Could not add \"{name}\" to cart: {source}")]
    InvalidAttributes {
        name: String,
        #[source]
        source: AttributeError,
    },
}

/// A typed add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCart {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Stock snapshot; negative inputs normalize to zero.
    pub stock: u32,
}

impl TryFrom<&AddToCartAttributes> for AddToCart {
    type Error = AttributeError;

    fn try_from(attrs: &AddToCartAttributes) -> Result<Self, Self::Error> {
        let id = attrs
            .id
            .parse::<ProductId>()
            .map_err(|_| AttributeError::Id(attrs.id.clone()))?;
        let price = attrs.price.parse::<Price>()?;
        let stock = attrs
            .stock
            .trim()
            .parse::<i64>()
            .map_err(|_| AttributeError::Stock(attrs.stock.clone()))?;

        Ok(Self {
            id,
            name: attrs.name.clone(),
            price,
            stock: u32::try_from(stock.max(0)).unwrap_or(u32::MAX),
        })
    }
}

/// The single cart of a page session.
#[derive(Debug)]
pub struct CartManager<S, D, U> {
    cart: Cart,
    persistence: CartPersistence<S>,
    surface: D,
    agent: U,
}

impl<S, D, U> CartManager<S, D, U>
where
    S: KeyValueStore,
    D: DisplaySurface,
    U: UserAgent,
{
    /// Create a manager with an empty cart. Call [`Self::load`] to restore
    /// the persisted one.
    pub const fn new(persistence: CartPersistence<S>, surface: D, agent: U) -> Self {
        Self {
            cart: Cart::new(),
            persistence,
            surface,
            agent,
        }
    }

    /// Replace the in-memory cart with the persisted one.
    #[instrument(skip(self))]
    pub fn load(&mut self) {
        self.cart = self.persistence.load();
        debug!(lines = self.cart.len(), "Cart loaded");
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    #[must_use]
    pub const fn surface(&self) -> &D {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    #[must_use]
    pub const fn agent(&self) -> &U {
        &self.agent
    }

    pub const fn agent_mut(&mut self) -> &mut U {
        &mut self.agent
    }

    /// Handle an add-to-cart control carrying raw data attributes.
    ///
    /// # Errors
    ///
    /// Returns [`AddToCartError`] if the attributes are malformed or the
    /// stock bound rejects the add. The shopper has already been notified and
    /// the cart is unchanged.
    pub fn add_to_cart(
        &mut self,
        attrs: &AddToCartAttributes,
    ) -> Result<AddOutcome, AddToCartError> {
        match AddToCart::try_from(attrs) {
            Ok(request) => self.add_item(&request),
            Err(source) => {
                let err = AddToCartError::InvalidAttributes {
                    name: attrs.name.clone(),
                    source,
                };
                tracing::warn!(error = %err, "Rejected add-to-cart attributes");
                self.agent.alert(&err.to_string());
                Err(err)
            }
        }
    }

    /// Add one unit of a product, bounded by its stock snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AddToCartError::Rejected`] when the product is out of stock,
    /// the cart already holds the whole snapshot, or the cart total would no
    /// longer be representable. The shopper has already been notified and the
    /// cart is unchanged.
    #[instrument(skip(self, request), fields(product_id = %request.id, stock = request.stock))]
    pub fn add_item(&mut self, request: &AddToCart) -> Result<AddOutcome, AddToCartError> {
        let outcome = match self
            .cart
            .add(request.id, &request.name, request.price, request.stock)
        {
            Ok(outcome) => outcome,
            Err(rejection) => {
                info!(reason = %rejection, "Add to cart rejected");
                self.agent.alert(&rejection.to_string());
                return Err(rejection.into());
            }
        };

        let product_id = request.id.to_string();
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product_id.as_str())]),
        );
        self.commit();
        self.agent
            .alert(&format!("\"{}\" added to cart!", request.name));
        Ok(outcome)
    }

    /// Remove every line for `id`. Saves and re-renders even when nothing
    /// matched.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, id: ProductId) {
        let removed = self.cart.remove(id);
        debug!(removed, "Removed from cart");
        let product_id = id.to_string();
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", product_id.as_str())]),
        );
        self.commit();
    }

    /// Empty the cart, then save and re-render.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        self.commit();
    }

    /// Project the cart onto the surface. No-op on pages without a cart.
    pub fn update_cart_display(&mut self) {
        if !(self.surface.has_region(Region::CartItems)
            && self.surface.has_region(Region::CartTotal))
        {
            return;
        }
        self.surface.render_cart(&CartView::from(&self.cart));
    }

    fn commit(&mut self) {
        self.persistence.save(&self.cart);
        self.update_cart_display();
    }
}
