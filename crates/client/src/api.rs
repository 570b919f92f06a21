//! REST API client implementation.
//!
//! One method per backend endpoint. Reads decode JSON into the records in
//! [`crate::types`]; writes are form-encoded and return nothing - callers
//! re-fetch the affected resource, because the server recomputes totals
//! and stock verdicts on every mutation.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;

use cornershop_core::{OrderId, OrderStatus, ProductId, SessionId};

use crate::config::ClientConfig;
use crate::types::{
    Cart, CheckoutResponse, ErrorBody, Invoice, LoginResponse, Order, Product, ProductUpdate,
    Receipt,
};

/// Errors that can occur when talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, bad TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the backend, with the `detail` field of the
    /// error body when one could be parsed.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("(no detail)"))]
    Api {
        status: StatusCode,
        detail: Option<String>,
    },

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The backend's `detail` message, when the error carried one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status, for errors that have one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the Cornershop REST API.
///
/// Cheap to clone; all methods take `&self`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:8000`.
    base: String,
}

impl ApiClient {
    /// Create a new API client from configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base: config.api_url.as_str().trim_end_matches('/').to_owned(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    /// Send a request and map non-success statuses to [`ApiError::Api`],
    /// keeping the error body's `detail` when it parses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|e| e.detail);
        tracing::debug!(%status, detail = detail.as_deref(), "backend rejected request");
        Err(ApiError::Api { status, detail })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Discard the response body, keeping only the success/failure verdict.
    async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange credentials for a session token and user record.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` with status 401 on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/api/login"))
            .form(&[("email", email), ("password", password.expose_secret())]);
        self.send_json(request).await
    }

    /// Invalidate a session server-side.
    ///
    /// Callers treat this as best-effort; local state is cleared whether or
    /// not it succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self, session))]
    pub async fn logout(&self, session: &SessionId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/api/logout"))
            .query(&[("session_id", session.as_str())]);
        self.send_unit(request).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decode fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.inner.client.get(self.url("/api/products"));
        self.send_json(request).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` with status 404 when the product does not exist.
    #[instrument(skip(self))]
    pub async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("/api/products/{product_id}")));
        self.send_json(request).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the current cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decode fails.
    #[instrument(skip(self, session))]
    pub async fn cart(&self, session: &SessionId) -> Result<Cart, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("/api/cart"))
            .query(&[("session_id", session.as_str())]);
        self.send_json(request).await
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` when the product is unknown or cannot be added.
    #[instrument(skip(self, session))]
    pub async fn add_to_cart(
        &self,
        session: &SessionId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/api/cart/add"))
            .query(&[("session_id", session.as_str())])
            .form(&[
                ("product_id", product_id.to_string()),
                ("quantity", quantity.to_string()),
            ]);
        self.send_unit(request).await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` when the line cannot be updated.
    #[instrument(skip(self, session))]
    pub async fn update_cart_item(
        &self,
        session: &SessionId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .put(self.url("/api/cart/update"))
            .query(&[("session_id", session.as_str())])
            .form(&[
                ("product_id", product_id.to_string()),
                ("quantity", quantity.to_string()),
            ]);
        self.send_unit(request).await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` with status 404 when the line is not in the cart.
    #[instrument(skip(self, session))]
    pub async fn remove_from_cart(
        &self,
        session: &SessionId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.url(&format!("/api/cart/remove/{product_id}")))
            .query(&[("session_id", session.as_str())]);
        self.send_unit(request).await
    }

    // =========================================================================
    // Checkout & orders
    // =========================================================================

    /// Place an order from the current cart.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` when the cart is empty, stock ran out, or the
    /// payment method is rejected.
    #[instrument(skip(self, session, payment_details))]
    pub async fn checkout(
        &self,
        session: &SessionId,
        payment_method: &str,
        payment_details: &str,
    ) -> Result<CheckoutResponse, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/api/checkout"))
            .query(&[("session_id", session.as_str())])
            .form(&[
                ("payment_method", payment_method),
                ("payment_details", payment_details),
            ]);
        self.send_json(request).await
    }

    /// Fetch the order list. The backend scopes it by role: customers see
    /// their own orders, admins see everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decode fails.
    #[instrument(skip(self, session))]
    pub async fn orders(&self, session: &SessionId) -> Result<Vec<Order>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("/api/orders"))
            .query(&[("session_id", session.as_str())]);
        self.send_json(request).await
    }

    /// Fetch the receipt for an order.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` with status 404 when no receipt was issued.
    #[instrument(skip(self, session))]
    pub async fn order_receipt(
        &self,
        session: &SessionId,
        order_id: OrderId,
    ) -> Result<Receipt, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("/api/orders/{order_id}/receipt")))
            .query(&[("session_id", session.as_str())]);
        self.send_json(request).await
    }

    /// Fetch the invoice for an order.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` with status 404 when no invoice exists.
    #[instrument(skip(self, session))]
    pub async fn order_invoice(
        &self,
        session: &SessionId,
        order_id: OrderId,
    ) -> Result<Invoice, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("/api/orders/{order_id}/invoice")))
            .query(&[("session_id", session.as_str())]);
        self.send_json(request).await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Update a product's editable fields (admin only). Sends the full
    /// field set, pre-filled values included.
    ///
    /// # Errors
    ///
    /// `ApiError::Api` with status 403 for non-admin sessions.
    #[instrument(skip(self, session, update))]
    pub async fn update_product(
        &self,
        session: &SessionId,
        product_id: ProductId,
        update: &ProductUpdate,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .put(self.url(&format!("/api/admin/products/{product_id}")))
            .query(&[("session_id", session.as_str())])
            .form(update);
        self.send_unit(request).await
    }

    /// Change an order's status (admin only).
    ///
    /// # Errors
    ///
    /// `ApiError::Api` with status 403 for non-admin sessions.
    #[instrument(skip(self, session))]
    pub async fn update_order_status(
        &self,
        session: &SessionId,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .put(self.url(&format!("/api/admin/orders/{order_id}/status")))
            .query(&[
                ("session_id", session.as_str()),
                ("status", status.as_str()),
            ]);
        self.send_unit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_detail() {
        let err = ApiError::Api {
            status: StatusCode::BAD_REQUEST,
            detail: Some("Cart is empty".to_owned()),
        };
        assert_eq!(err.to_string(), "HTTP 400 Bad Request: Cart is empty");
        assert_eq!(err.detail(), Some("Cart is empty"));
    }

    #[test]
    fn test_api_error_display_without_detail() {
        let err = ApiError::Api {
            status: StatusCode::UNAUTHORIZED,
            detail: None,
        };
        assert_eq!(err.to_string(), "HTTP 401 Unauthorized: (no detail)");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.detail().is_none());
    }
}
