//! Order history records as served by `GET /api/orders`.

use serde::{Deserialize, Serialize};

use super::id::OrderId;
use super::price::Price;

/// A past order placed by the signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    /// Raw timestamp string, kept verbatim for display.
    pub order_date: String,
    pub total_amount: Price,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// One purchased product within an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: u32,
    pub price_at_purchase: Price,
}
