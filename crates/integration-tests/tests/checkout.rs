//! Checkout against a canned backend.

use cartkit_integration_tests::{CannedBackend, TestSession, catalog, open_page};
use cartkit_storefront::config::{DEFAULT_STORAGE_KEY, StorefrontConfig};
use cartkit_storefront::display::{HtmlPage, Region};
use cartkit_storefront::session::{CheckoutOutcome, LOGIN_REQUIRED_TEXT};
use cartkit_storefront::storage::MemoryStore;
use serde_json::json;

const PEN_CART: &str = r#"[{"id":1,"name":"Pen","price":1.5,"quantity":2,"stock":3}]"#;

async fn backend() -> CannedBackend {
    let backend = CannedBackend::start()
        .await
        .expect("Failed to start canned backend");
    backend
        .respond("GET", "/api/products", 200, catalog(&[(1, "Pen", 1.5, 3)]))
        .await;
    backend
}

async fn loaded_page(config: &StorefrontConfig) -> TestSession {
    let store = MemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, PEN_CART);
    let mut page = open_page(config, store, HtmlPage::index(), "/");
    page.on_page_load().await;
    page
}

fn stored(page: &TestSession) -> Option<&str> {
    page.cart().persistence().store().raw(DEFAULT_STORAGE_KEY)
}

#[tokio::test]
async fn test_successful_checkout_empties_cart_and_refetches_listing() {
    let backend = backend().await;
    backend
        .respond(
            "POST",
            "/api/checkout",
            200,
            json!({"success": true, "message": "Order placed", "orderId": 41, "total": 3.0}),
        )
        .await;
    let config = backend.config(None).expect("Invalid test configuration");
    let mut page = loaded_page(&config).await;

    let outcome = page.checkout().await;

    assert!(matches!(
        outcome,
        CheckoutOutcome::Placed(ref receipt) if receipt.order_id == Some(41)
    ));
    assert!(page.cart().cart().is_empty());
    assert_eq!(stored(&page), Some("[]"));
    assert_eq!(
        page.cart().surface().markup(Region::CartItems),
        Some("Your cart is empty.")
    );
    assert_eq!(page.cart().agent().alerts, ["Order placed"]);
    assert_eq!(backend.hits("GET", "/api/products").await, 2);
}

#[tokio::test]
async fn test_checkout_submits_cart_lines_and_session_cookie() {
    let backend = backend().await;
    backend
        .respond("POST", "/api/checkout", 200, json!({"message": "Order placed"}))
        .await;
    let config = backend
        .config(Some("session=abc123"))
        .expect("Invalid test configuration");
    let mut page = loaded_page(&config).await;

    page.checkout().await;

    let requests = backend.requests().await;
    let submitted = requests
        .iter()
        .find(|r| r.method == "POST" && r.path == "/api/checkout")
        .expect("Checkout should have been submitted");
    assert_eq!(
        submitted.json(),
        json!({"cartItems": [{"id": 1, "name": "Pen", "price": 1.5, "quantity": 2, "stock": 3}]})
    );
    assert_eq!(submitted.cookie.as_deref(), Some("session=abc123"));
}

#[tokio::test]
async fn test_signed_out_checkout_redirects_without_touching_cart() {
    let backend = backend().await;
    backend
        .respond("POST", "/api/checkout", 401, json!({"message": "Authentication required"}))
        .await;
    let config = backend.config(None).expect("Invalid test configuration");
    let mut page = loaded_page(&config).await;
    let before = page.cart().cart().clone();

    let outcome = page.checkout().await;

    assert_eq!(
        outcome,
        CheckoutOutcome::LoginRequired {
            location: "/login?next=%2F".to_string()
        }
    );
    assert_eq!(page.cart().cart(), &before);
    assert_eq!(stored(&page), Some(PEN_CART));
    assert_eq!(page.cart().agent().alerts, [LOGIN_REQUIRED_TEXT]);
    assert_eq!(page.cart().agent().visited, ["/login?next=%2F"]);
    assert_eq!(backend.hits("GET", "/api/products").await, 1);
}

#[tokio::test]
async fn test_rejected_checkout_shows_server_message() {
    let backend = backend().await;
    backend
        .respond(
            "POST",
            "/api/checkout",
            400,
            json!({"message": "Not enough stock for Pen. Available: 1"}),
        )
        .await;
    let config = backend.config(None).expect("Invalid test configuration");
    let mut page = loaded_page(&config).await;

    let outcome = page.checkout().await;

    assert!(matches!(outcome, CheckoutOutcome::Failed { .. }));
    assert_eq!(
        page.cart().agent().alerts,
        ["Checkout failed: Not enough stock for Pen. Available: 1"]
    );
    assert_eq!(stored(&page), Some(PEN_CART));
}

#[tokio::test]
async fn test_server_error_without_message_reports_status() {
    let backend = backend().await;
    backend
        .respond("POST", "/api/checkout", 500, json!("Internal Server Error"))
        .await;
    let config = backend.config(None).expect("Invalid test configuration");
    let mut page = loaded_page(&config).await;

    page.checkout().await;

    assert_eq!(
        page.cart().agent().alerts,
        ["Checkout failed: HTTP error! status: 500"]
    );
    assert_eq!(page.cart().cart().total_quantity(), 2);
}

#[tokio::test]
async fn test_missing_checkout_route_fails_and_is_recorded() {
    let backend = backend().await;
    let config = backend.config(None).expect("Invalid test configuration");
    let mut page = loaded_page(&config).await;

    let outcome = page.checkout().await;

    assert!(matches!(
        outcome,
        CheckoutOutcome::Failed { ref reason } if reason == "Not found"
    ));
    assert_eq!(backend.hits("POST", "/api/checkout").await, 1);
    assert_eq!(stored(&page), Some(PEN_CART));
}

#[tokio::test]
async fn test_unreachable_backend_fails_checkout() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("Failed to reserve a port");
    let config = StorefrontConfig::from_vars(|key| {
        (key == "CARTKIT_API_URL").then(|| format!("http://{addr}"))
    })
    .expect("Invalid test configuration");
    let mut page = loaded_page(&config).await;

    let outcome = page.checkout().await;

    assert!(matches!(
        outcome,
        CheckoutOutcome::Failed { ref reason } if reason.starts_with("HTTP error")
    ));
    assert_eq!(page.cart().cart().total_quantity(), 2);
    assert_eq!(
        page.cart().surface().markup(Region::ProductList),
        Some("<p>Error loading products. Please try again later.</p>")
    );
}
