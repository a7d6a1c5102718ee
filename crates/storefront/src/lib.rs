//! Cartkit storefront library.
//!
//! Client-side cart management for a storefront: a persisted cart with
//! stock-bounded adds, rendering onto page regions, checkout against the
//! backend and the signed-in customer's order history.
//!
//! The crate is wired through four seams so it can be driven and tested
//! without a browser:
//!
//! - [`storage::KeyValueStore`] - where the cart is persisted
//! - [`api::StoreApi`] - the backend's products, checkout and orders endpoints
//! - [`display::DisplaySurface`] - the page regions state is drawn into
//! - [`display::UserAgent`] - alerts and navigation
//!
//! [`session::PageSession`] ties them together for one loaded page.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod display;
pub mod error;
pub mod session;
pub mod storage;
