//! Integration tests for Cartkit.
//!
//! The scenarios in `tests/` drive whole page sessions against
//! [`CannedBackend`], a local axum server answering the storefront API
//! endpoints with fixed JSON. No external services are needed:
//!
//! ```bash
//! cargo test -p cartkit-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - add, remove and persistence across page loads
//! - `checkout` - order placement, sign-in redirects and rejections
//! - `order_history` - the order history page

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use cartkit_storefront::api::HttpStoreApi;
use cartkit_storefront::cart::CartManager;
use cartkit_storefront::config::{ConfigError, DEFAULT_STORAGE_KEY, StorefrontConfig};
use cartkit_storefront::display::{HtmlPage, UserAgent};
use cartkit_storefront::session::{LoginRedirect, PageSession};
use cartkit_storefront::storage::{CartPersistence, MemoryStore};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request the backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub cookie: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Body parsed as JSON, or `Null` if it was not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Default)]
struct BackendState {
    routes: Mutex<HashMap<(String, String), (u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Local axum server with one canned response per route.
///
/// Routes without a canned response answer 404, and are still recorded. The
/// server runs until the test's runtime shuts down.
#[derive(Debug, Clone)]
pub struct CannedBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
}

impl CannedBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(BackendState::default());
        let app = router(Arc::clone(&state));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Canned backend stopped");
            }
        });
        Ok(Self { addr, state })
    }

    /// Answer `method path` with `status` and a JSON `body`.
    pub async fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .routes
            .lock()
            .await
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Number of requests received for `method path`.
    pub async fn hits(&self, method: &str, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .await
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Storefront configuration pointing at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated configuration does not validate.
    pub fn config(&self, session_cookie: Option<&str>) -> Result<StorefrontConfig, ConfigError> {
        let base_url = self.base_url();
        StorefrontConfig::from_vars(|key| match key {
            "CARTKIT_API_URL" => Some(base_url.clone()),
            "CARTKIT_SESSION_COOKIE" => session_cookie.map(str::to_string),
            _ => None,
        })
    }
}

async fn canned(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let method = method.as_str().to_string();
    let path = uri.path().to_string();

    let (status, payload) = state
        .routes
        .lock()
        .await
        .get(&(method.clone(), path.clone()))
        .cloned()
        .unwrap_or_else(|| (404, r#"{"message":"Not found"}"#.to_string()));

    state.requests.lock().await.push(RecordedRequest {
        method,
        path,
        cookie: headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    });

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/products", get(canned))
        .route("/api/checkout", post(canned))
        .route("/api/orders", get(canned))
        .fallback(canned)
        .with_state(state)
}

/// User agent that records what the session asked of it.
#[derive(Debug, Default)]
pub struct RecordingBrowser {
    pub alerts: Vec<String>,
    pub visited: Vec<String>,
}

impl UserAgent for RecordingBrowser {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, location: &str) {
        self.visited.push(location.to_string());
    }
}

pub type TestSession = PageSession<HttpStoreApi, MemoryStore, HtmlPage, RecordingBrowser>;

/// A page session on `store` against the configured backend.
#[must_use]
pub fn open_page(
    config: &StorefrontConfig,
    store: MemoryStore,
    page: HtmlPage,
    path: &str,
) -> TestSession {
    let cart = CartManager::new(
        CartPersistence::new(store, DEFAULT_STORAGE_KEY),
        page,
        RecordingBrowser::default(),
    );
    PageSession::new(
        HttpStoreApi::new(config),
        cart,
        LoginRedirect::new(config.login_path.clone()),
        path,
    )
}

/// Catalog JSON as the backend sends it.
#[must_use]
pub fn catalog(products: &[(i32, &str, f64, u32)]) -> Value {
    Value::Array(
        products
            .iter()
            .map(|(id, name, price, stock)| {
                serde_json::json!({
                    "id": id,
                    "name": name,
                    "price": price,
                    "stock": stock,
                    "imageUrl": format!("https://img.example.net/{id}.jpg"),
                })
            })
            .collect(),
    )
}
