//! Commerce backend API client.
//!
//! The storefront owns no catalog, cart, or customer data - everything
//! lives behind the backend REST API. This module provides a typed client
//! with in-memory caching via `moka` for catalog and store lookups
//! (5 minute TTL). Cart operations are never cached.

mod cache;
pub mod types;

pub use types::{Cart, CartLine, CartLineInput, CartLineUpdateInput, Image, Product, StoreRecord};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::BackendConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("Backend returned {status}: {snippet}")]
    Status { status: u16, snippet: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the commerce backend API.
///
/// Provides typed access to stores, products, and cart operations.
/// Store and product reads are cached for 5 minutes.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                api_token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GET request against the backend.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.base_url))
            .bearer_auth(&self.inner.api_token)
            .send()
            .await?;

        Self::read_response(response).await
    }

    /// Execute a POST request with a JSON body against the backend.
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .post(format!("{}{path}", self.inner.base_url))
            .bearer_auth(&self.inner.api_token)
            .json(body)
            .send()
            .await?;

        Self::read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(
                response.url().path().to_string(),
            ));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend API returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                snippet: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse backend API response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Look up the store record serving `host`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no store is registered for the
    /// host; callers treat that as "render with defaults", not a failure.
    pub async fn store_by_host(&self, host: &str) -> Result<StoreRecord, BackendError> {
        let key = CacheKey::StoreByHost(host.to_string());
        if let Some(CacheValue::Store(store)) = self.inner.cache.get(&key).await {
            return Ok(*store);
        }

        let store: StoreRecord = self.get(&format!("/stores/by-host/{host}")).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Store(Box::new(store.clone())))
            .await;
        Ok(store)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch products, optionally bounded.
    pub async fn get_products(&self, limit: Option<i64>) -> Result<Vec<Product>, BackendError> {
        let key = CacheKey::Products { limit };
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            return Ok(products);
        }

        let path = limit.map_or_else(
            || "/products".to_string(),
            |n| format!("/products?limit={n}"),
        );
        let products: Vec<Product> = self.get(&path).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch a single product by handle.
    pub async fn get_product(&self, handle: &str) -> Result<Product, BackendError> {
        let key = CacheKey::Product(handle.to_string());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            return Ok(*product);
        }

        let product: Product = self.get(&format!("/products/{handle}")).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Create a cart, optionally seeded with lines.
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, BackendError> {
        self.post("/carts", &serde_json::json!({ "lines": lines })).await
    }

    /// Fetch a cart by id.
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, BackendError> {
        self.get(&format!("/carts/{cart_id}")).await
    }

    /// Add lines to an existing cart.
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, BackendError> {
        self.post(
            &format!("/carts/{cart_id}/lines"),
            &serde_json::json!({ "lines": lines }),
        )
        .await
    }

    /// Update a line's quantity.
    pub async fn update_cart_line(
        &self,
        cart_id: &str,
        update: CartLineUpdateInput,
    ) -> Result<Cart, BackendError> {
        self.post(&format!("/carts/{cart_id}/lines/update"), &update)
            .await
    }

    /// Remove a line from a cart.
    pub async fn remove_cart_line(
        &self,
        cart_id: &str,
        line_id: &str,
    ) -> Result<Cart, BackendError> {
        self.post(
            &format!("/carts/{cart_id}/lines/remove"),
            &serde_json::json!({ "line_id": line_id }),
        )
        .await
    }
}
