//! Core types for Cartkit.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use cart::{AddOutcome, AddRejection, Cart, CartItem};
pub use id::*;
pub use order::{Order, OrderLine};
pub use price::{Price, PriceError};
pub use product::Product;
