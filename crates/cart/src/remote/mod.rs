//! Remote cart store client.
//!
//! The remote store is a key-value-per-account service with two operations:
//! fetch the authenticated caller's current server-side cart, and replace it
//! wholesale with a given item list. Each call is atomic from the client's
//! perspective - there is no partial-item failure.
//!
//! [`HttpCartClient`] is the production implementation over `reqwest`; the
//! [`RemoteCart`] trait is the seam used by the reconciler and the push
//! worker, and by test doubles.

mod http;
pub(crate) mod wire;

pub use http::HttpCartClient;

use std::future::Future;

use rouse_core::LineItem;
use thiserror::Error;

/// Errors that can occur when talking to the remote cart store.
///
/// Callers in this crate swallow all of these - a failed fetch degrades to
/// an empty cart, a failed push is dropped and superseded by the next one.
#[derive(Debug, Error)]
pub enum RemoteCartError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No access token is available for the authenticated call.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Per-account remote cart store.
pub trait RemoteCart: Send + Sync {
    /// Fetch the authenticated caller's server-side cart.
    fn fetch(&self) -> impl Future<Output = Result<Vec<LineItem>, RemoteCartError>> + Send;

    /// Replace the server-side cart with `items` (full replace, not a diff).
    fn replace(
        &self,
        items: Vec<LineItem>,
    ) -> impl Future<Output = Result<(), RemoteCartError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_cart_error_display() {
        let err = RemoteCartError::NotAuthenticated;
        assert_eq!(err.to_string(), "not authenticated");

        let err = RemoteCartError::Status(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "unexpected status: 502 Bad Gateway");
    }
}
