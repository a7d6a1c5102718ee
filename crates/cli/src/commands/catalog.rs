//! `cartkit products`

use cartkit_storefront::config::StorefrontConfig;

use super::{CommandError, open_session, print_page};
use crate::terminal::TerminalPage;

/// Print the current catalog.
pub async fn list(config: &StorefrontConfig) -> Result<(), CommandError> {
    let mut session = open_session(config, TerminalPage::catalog(), "/");
    session.on_page_load().await;
    print_page(&session);
    Ok(())
}
