//! The order history page against a canned backend.

use cartkit_integration_tests::{CannedBackend, TestSession, open_page};
use cartkit_storefront::config::DEFAULT_STORAGE_KEY;
use cartkit_storefront::display::{HtmlPage, Region};
use cartkit_storefront::session::ORDERS_PATH;
use cartkit_storefront::storage::MemoryStore;
use serde_json::{Value, json};

async fn orders_page(status: u16, body: Value) -> (CannedBackend, TestSession) {
    let backend = CannedBackend::start()
        .await
        .expect("Failed to start canned backend");
    backend.respond("GET", "/api/orders", status, body).await;
    let config = backend
        .config(Some("session=abc123"))
        .expect("Invalid test configuration");

    let store = MemoryStore::new().with_entry(
        DEFAULT_STORAGE_KEY,
        r#"[{"id":1,"name":"Pen","price":1.5,"quantity":1,"stock":3}]"#,
    );
    let mut page = open_page(&config, store, HtmlPage::order_history(), ORDERS_PATH);
    page.on_page_load().await;
    (backend, page)
}

#[tokio::test]
async fn test_orders_are_listed_newest_first() {
    let (backend, page) = orders_page(
        200,
        json!([
            {
                "order_id": 12,
                "order_date": "2024-05-02 09:30:00",
                "total_amount": 3.0,
                "items": [{"product_name": "Pen", "quantity": 2, "price_at_purchase": 1.5}]
            },
            {
                "order_id": 7,
                "order_date": "2024-04-18 17:05:11",
                "total_amount": 150.0,
                "items": [{
                    "product_name": "Wireless Headphones",
                    "quantity": 1,
                    "price_at_purchase": 150.0
                }]
            }
        ]),
    )
    .await;

    let surface = page.cart().surface();
    let markup = surface.markup(Region::OrdersList).expect("Orders page has a list");
    let newest = markup.find("Order ID: 12").expect("Order 12 listed");
    let oldest = markup.find("Order ID: 7").expect("Order 7 listed");
    assert!(newest < oldest);
    assert!(markup.contains("Pen x 2 - $1.50 each"));
    assert!(markup.contains("$150.00"));
    assert_eq!(surface.is_visible(Region::NoOrders), Some(false));
    assert_eq!(surface.is_visible(Region::OrdersList), Some(true));

    // No catalog on this page, and the cart is loaded but not drawn
    assert_eq!(backend.hits("GET", "/api/products").await, 0);
    assert_eq!(page.cart().cart().total_quantity(), 1);

    let requests = backend.requests().await;
    assert_eq!(
        requests.first().and_then(|r| r.cookie.as_deref()),
        Some("session=abc123")
    );
}

#[tokio::test]
async fn test_no_orders_shows_placeholder() {
    let (_backend, page) = orders_page(200, json!([])).await;

    let surface = page.cart().surface();
    assert_eq!(surface.is_visible(Region::NoOrders), Some(true));
    assert_eq!(surface.is_visible(Region::OrdersList), Some(false));
}

#[tokio::test]
async fn test_signed_out_customer_is_sent_to_login() {
    let (_backend, page) = orders_page(401, json!({"message": "Authentication required"})).await;

    assert_eq!(page.cart().agent().visited, ["/login?next=%2Forders"]);
    assert!(page.cart().agent().alerts.is_empty());
    assert_eq!(page.cart().surface().markup(Region::OrdersList), Some(""));
}

#[tokio::test]
async fn test_failed_fetch_shows_error_message() {
    let (_backend, page) =
        orders_page(500, json!({"message": "Failed to retrieve order history"})).await;

    let surface = page.cart().surface();
    assert!(
        surface
            .markup(Region::OrdersList)
            .expect("Orders page has a list")
            .contains("Failed to load order history. Please try again later.")
    );
    assert_eq!(surface.is_visible(Region::NoOrders), Some(false));
}
