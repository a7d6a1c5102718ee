//! Command implementations. Each command is one page session.

pub mod cart;
pub mod catalog;
pub mod orders;

use cartkit_core::ProductId;
use cartkit_storefront::api::HttpStoreApi;
use cartkit_storefront::cart::{AddToCartError, CartManager};
use cartkit_storefront::config::StorefrontConfig;
use cartkit_storefront::session::{LoginRedirect, PageSession};
use cartkit_storefront::storage::{CartPersistence, FileStore};
use thiserror::Error;

use crate::terminal::{TerminalAgent, TerminalPage};

/// Errors that end a command with a failure status.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The product is not offered by the current listing.
    #[error("Product {0} is not in the current listing")]
    UnknownProduct(ProductId),

    /// The cart refused the add.
    #[error(transparent)]
    NotAdded(#[from] AddToCartError),

    /// Checkout ended without an order.
    #[error("No order was placed")]
    NotPlaced,

    /// The backend requires a signed-in customer.
    #[error("Sign-in required")]
    SignInRequired,
}

pub type TerminalSession = PageSession<HttpStoreApi, FileStore, TerminalPage, TerminalAgent>;

/// Open a session for `page`, served at `path`, on the configured store.
pub fn open_session(config: &StorefrontConfig, page: TerminalPage, path: &str) -> TerminalSession {
    let persistence = CartPersistence::new(
        FileStore::open(&config.storage_path),
        config.storage_key.clone(),
    );
    let cart = CartManager::new(persistence, page, TerminalAgent::default());
    PageSession::new(
        HttpStoreApi::new(config),
        cart,
        LoginRedirect::new(config.login_path.clone()),
        path,
    )
}

/// Print the page as it stands.
pub fn print_page(session: &TerminalSession) {
    let transcript = session.cart().surface().transcript();
    if !transcript.is_empty() {
        println!("{transcript}");
    }
}
