//! `cartkit orders`

use cartkit_storefront::config::StorefrontConfig;
use cartkit_storefront::session::ORDERS_PATH;

use super::{CommandError, open_session, print_page};
use crate::terminal::TerminalPage;

/// Print the signed-in customer's order history.
///
/// # Errors
///
/// Returns [`CommandError::SignInRequired`] when the backend redirected to
/// login.
pub async fn history(config: &StorefrontConfig) -> Result<(), CommandError> {
    let mut session = open_session(config, TerminalPage::orders(), ORDERS_PATH);
    session.on_page_load().await;

    if session.cart().agent().redirect().is_some() {
        return Err(CommandError::SignInRequired);
    }
    print_page(&session);
    Ok(())
}
