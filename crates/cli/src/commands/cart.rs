//! Cart commands: `add`, `remove`, `show` and `checkout`.

use cartkit_core::ProductId;
use cartkit_storefront::config::StorefrontConfig;
use cartkit_storefront::display::PageEvent;
use cartkit_storefront::session::CheckoutOutcome;
use tracing::info;

use super::{CommandError, open_session, print_page};
use crate::terminal::TerminalPage;

/// Add one unit of `id`, using the attributes the live listing offers.
///
/// # Errors
///
/// Returns [`CommandError::UnknownProduct`] if the listing does not offer
/// `id`, or [`CommandError::NotAdded`] if the cart refused it.
pub async fn add(config: &StorefrontConfig, id: ProductId) -> Result<(), CommandError> {
    let mut session = open_session(config, TerminalPage::storefront(), "/");
    session.on_page_load().await;

    let Some(PageEvent::AddToCart(attrs)) = session.cart().surface().add_control(id) else {
        return Err(CommandError::UnknownProduct(id));
    };
    session.cart_mut().add_to_cart(&attrs)?;
    print_page(&session);
    Ok(())
}

/// Remove every unit of `id`.
pub async fn remove(config: &StorefrontConfig, id: ProductId) -> Result<(), CommandError> {
    let mut session = open_session(config, TerminalPage::cart(), "/");
    session.on_page_load().await;
    session.dispatch(PageEvent::RemoveFromCart(id)).await;
    print_page(&session);
    Ok(())
}

/// Print the persisted cart.
pub async fn show(config: &StorefrontConfig) -> Result<(), CommandError> {
    let mut session = open_session(config, TerminalPage::cart(), "/");
    session.on_page_load().await;
    print_page(&session);
    Ok(())
}

/// Place an order for the cart.
///
/// # Errors
///
/// Returns [`CommandError::SignInRequired`] or [`CommandError::NotPlaced`]
/// when no order was created. An empty cart is not an error.
pub async fn checkout(config: &StorefrontConfig) -> Result<(), CommandError> {
    let mut session = open_session(config, TerminalPage::storefront(), "/");
    session.on_page_load().await;

    let outcome = session.checkout().await;
    print_page(&session);

    match outcome {
        CheckoutOutcome::Placed(receipt) => {
            info!(order_id = ?receipt.order_id, "Order placed");
            Ok(())
        }
        CheckoutOutcome::EmptyCart => Ok(()),
        CheckoutOutcome::LoginRequired { .. } => Err(CommandError::SignInRequired),
        CheckoutOutcome::Failed { .. } => Err(CommandError::NotPlaced),
    }
}
