//! HTTP client for the remote cart resource.
//!
//! Authenticated GET/PUT against `/clients/cart`. The access token is owned
//! by the application's auth layer and swapped in here as the session
//! changes; calls without a token fail with
//! [`RemoteCartError::NotAuthenticated`].

use std::sync::{Arc, Mutex, PoisonError};

use rouse_core::LineItem;
use secrecy::{ExposeSecret, SecretString};

use crate::config::CartConfig;

use super::wire::CartPayload;
use super::{RemoteCart, RemoteCartError};

/// Client for the authenticated per-account cart resource.
///
/// Cheaply cloneable via `Arc`; the access token is shared across clones.
#[derive(Clone)]
pub struct HttpCartClient {
    inner: Arc<HttpCartClientInner>,
}

struct HttpCartClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: Mutex<Option<SecretString>>,
}

impl HttpCartClient {
    /// Create a new cart client for the configured API.
    #[must_use]
    pub fn new(config: &CartConfig) -> Self {
        let endpoint = format!(
            "{}/clients/cart",
            config.api_base_url.as_str().trim_end_matches('/')
        );

        Self {
            inner: Arc::new(HttpCartClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: Mutex::new(None),
            }),
        }
    }

    /// Install the access token for subsequent calls.
    pub fn set_access_token(&self, token: SecretString) {
        *self.token_slot() = Some(token);
    }

    /// Drop the access token (logout).
    pub fn clear_access_token(&self) {
        *self.token_slot() = None;
    }

    fn token_slot(&self) -> std::sync::MutexGuard<'_, Option<SecretString>> {
        self.inner
            .access_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn bearer(&self) -> Result<String, RemoteCartError> {
        self.token_slot()
            .as_ref()
            .map(|token| token.expose_secret().to_string())
            .ok_or(RemoteCartError::NotAuthenticated)
    }
}

impl RemoteCart for HttpCartClient {
    async fn fetch(&self) -> Result<Vec<LineItem>, RemoteCartError> {
        let token = self.bearer()?;

        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "cart fetch returned non-success status");
            return Err(RemoteCartError::Status(status));
        }

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;
        let payload: CartPayload = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::debug!(
                    %error,
                    body = %body.chars().take(200).collect::<String>(),
                    "failed to parse cart fetch response"
                );
                return Err(RemoteCartError::Parse(error));
            }
        };

        Ok(payload.into_items())
    }

    async fn replace(&self, items: Vec<LineItem>) -> Result<(), RemoteCartError> {
        let token = self.bearer()?;
        let payload = CartPayload::from_items(&items);

        let response = self
            .inner
            .client
            .put(&self.inner.endpoint)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "cart push returned non-success status");
            return Err(RemoteCartError::Status(status));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn config(base: &str) -> CartConfig {
        CartConfig {
            api_base_url: Url::parse(base).expect("valid URL"),
            storage_path: None,
        }
    }

    #[test]
    fn test_endpoint_has_no_double_slash() {
        let client = HttpCartClient::new(&config("https://api.rouse.shop/"));
        assert_eq!(client.inner.endpoint, "https://api.rouse.shop/clients/cart");

        let client = HttpCartClient::new(&config("https://api.rouse.shop"));
        assert_eq!(client.inner.endpoint, "https://api.rouse.shop/clients/cart");
    }

    #[tokio::test]
    async fn test_calls_without_token_fail_not_authenticated() {
        let client = HttpCartClient::new(&config("https://api.rouse.shop"));

        let err = client.fetch().await.expect_err("no token");
        assert!(matches!(err, RemoteCartError::NotAuthenticated));

        let err = client.replace(Vec::new()).await.expect_err("no token");
        assert!(matches!(err, RemoteCartError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_clear_access_token_reverts_to_unauthenticated() {
        let client = HttpCartClient::new(&config("https://api.rouse.shop"));
        client.set_access_token(SecretString::from("tok_123".to_string()));
        client.clear_access_token();

        let err = client.fetch().await.expect_err("token cleared");
        assert!(matches!(err, RemoteCartError::NotAuthenticated));
    }
}
