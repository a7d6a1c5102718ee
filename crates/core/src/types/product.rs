//! Catalog listing records as served by `GET /api/products`.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product in the storefront listing.
///
/// `stock` is the live inventory at fetch time; it becomes the cart line's
/// stock snapshot when the product is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub stock: u32,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}
