//! Unified error handling with Sentry integration.
//!
//! Each layer has its own `thiserror` enum; [`AppError`] wraps them for the
//! callers that drive a whole session. Unexpected failures are captured to
//! Sentry by [`AppError::report`]; shopper-facing outcomes (stock rejections,
//! sign-in required) are only logged.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API call failed.
    #[error("Store API error: {0}")]
    Api(#[from] ApiError),

    /// Cart storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Whether this error points at a defect or outage rather than at
    /// something the shopper did.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        match self {
            Self::Api(err) => {
                matches!(err, ApiError::Http(_) | ApiError::Parse(_) | ApiError::Url(_))
            }
            Self::Storage(err) => !matches!(err, StorageError::Unavailable(_)),
            Self::Config(_) => false,
        }
    }

    /// Log the error, capturing unexpected ones to Sentry.
    pub fn report(&self) {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront error");
        }
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse_error() -> serde_json::Error {
        serde_json::from_str::<u8>("x").unwrap_err()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(ConfigError::InvalidEnvVar(
            "CARTKIT_API_URL".to_string(),
            "bad".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid environment variable CARTKIT_API_URL: bad"
        );

        let err = AppError::Api(ApiError::Status {
            status: 400,
            message: Some("Cart is empty.".to_string()),
        });
        assert_eq!(err.to_string(), "Store API error: Cart is empty.");
    }

    #[test]
    fn test_unexpected_classification() {
        assert!(!AppError::Api(ApiError::Unauthorized).is_unexpected());
        assert!(
            !AppError::Api(ApiError::Status {
                status: 400,
                message: None
            })
            .is_unexpected()
        );
        assert!(AppError::Api(ApiError::Parse(parse_error())).is_unexpected());
        assert!(AppError::Storage(StorageError::Corrupt(parse_error())).is_unexpected());
        assert!(
            !AppError::Storage(StorageError::Unavailable("quota".to_string())).is_unexpected()
        );
        assert!(
            !AppError::from(ConfigError::InvalidEnvVar("X".to_string(), "y".to_string()))
                .is_unexpected()
        );
    }

    #[test]
    fn test_report_without_sentry_client_is_harmless() {
        AppError::Api(ApiError::Parse(parse_error())).report();
        AppError::Storage(StorageError::Unavailable("quota".to_string())).report();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "1")]));
    }
}
