//! Storefront backend API client.
//!
//! The backend is an external collaborator exposing three JSON endpoints:
//!
//! - `GET /api/products` - current catalog with live stock
//! - `POST /api/checkout` - place an order for `{ cartItems: [...] }`
//! - `GET /api/orders` - order history of the signed-in customer
//!
//! [`StoreApi`] is the seam the page session talks to; [`HttpStoreApi`] is the
//! `reqwest` implementation. There are no retries, no backoff and no explicit
//! timeouts: a hung request simply delays the handler that issued it.

#![allow(async_fn_in_trait)]

use cartkit_core::{CartItem, Order, Product};
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend requires a signed-in customer (HTTP 401).
    #[error("Authentication required")]
    Unauthorized,

    /// Any other non-success status, with the server's message if it sent one.
    #[error("{}", format_status(.status, .message))]
    Status { status: u16, message: Option<String> },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint could not be resolved against the base URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

fn format_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => message.clone(),
        _ => format!("HTTP error! status: {status}"),
    }
}

/// Body of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "orderId", default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
}

/// Request body for `POST /api/checkout`.
#[derive(Debug, Serialize)]
struct CheckoutRequest<'a> {
    #[serde(rename = "cartItems")]
    cart_items: &'a [CartItem],
}

/// Error body the backend sends alongside failure statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Operations the page session needs from the backend.
pub trait StoreApi {
    /// Fetch the product listing.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Submit the cart for purchase.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the shopper is signed out, and
    /// other [`ApiError`]s on transport failure or rejection.
    async fn checkout(&self, items: &[CartItem]) -> Result<CheckoutReceipt, ApiError>;

    /// Fetch the signed-in customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the shopper is signed out, and
    /// other [`ApiError`]s on transport failure.
    async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError>;
}

// =============================================================================
// HttpStoreApi
// =============================================================================

/// `reqwest` client for the storefront backend.
#[derive(Clone)]
pub struct HttpStoreApi {
    client: reqwest::Client,
    base_url: Url,
    session_cookie: Option<SecretString>,
}

impl std::fmt::Debug for HttpStoreApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStoreApi")
            .field("base_url", &self.base_url.as_str())
            .field("session_cookie", &self.session_cookie.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl HttpStoreApi {
    /// Create a client from the storefront configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_url.clone(),
            session_cookie: config.session_cookie.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn with_session(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie.expose_secret()),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.with_session(self.client.get(self.endpoint(path)?));
        let response = request.send().await?;
        decode(response).await
    }
}

/// Map a response onto the API's error taxonomy and decode its JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    // Read the body as text first for better error diagnostics
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Store API returned non-success status"
        );
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse Store API response"
        );
        ApiError::Parse(e)
    })
}

impl StoreApi for HttpStoreApi {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let products: Vec<Product> = self.get_json("/api/products").await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self, items), fields(lines = items.len()))]
    async fn checkout(&self, items: &[CartItem]) -> Result<CheckoutReceipt, ApiError> {
        let request = self
            .client
            .post(self.endpoint("/api/checkout")?)
            .json(&CheckoutRequest { cart_items: items });
        let response = self.with_session(request).send().await?;
        decode(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Vec<Order> = self.get_json("/api/orders").await?;
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }
}
