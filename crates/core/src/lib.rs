//! Cartkit Core - Shared types library.
//!
//! This crate provides the domain types used across all Cartkit components:
//! - `storefront` - Cart manager, storage adapter, rendering port and API client
//! - `cli` - Command-line page session driver
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart rules - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, cart lines, catalog and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
