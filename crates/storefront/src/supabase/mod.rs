//! Supabase (PostgREST) client for products and orders.
//!
//! # Architecture
//!
//! - Plain `reqwest` calls against `<project>/rest/v1/<table>`
//! - The hosted database is the source of truth; nothing is synced locally
//! - Catalog reads are cached in memory via `moka` (5 minute TTL)
//!
//! # Tables
//!
//! - `products` - read-only catalog, newest first
//! - `orders` - one row per placed order, filtered by `user_id`
//!
//! # Example
//!
//! ```rust,ignore
//! use catzo_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(config.require_supabase()?)?;
//! let products = client.fetch_products().await?;
//! ```

mod cache;

use std::sync::Arc;
use std::time::Duration;

use catzo_core::{NewOrder, Order, Product, ProductId, UserId};
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::config::{SupabaseConfig, expose};
use crate::orders::{OrderError, OrderRepository};

use cache::{CacheKey, CacheValue};

/// REST path under the project URL.
const REST_PATH: &str = "rest/v1/";

/// Errors that can occur when interacting with Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API gateway.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Credentials could not be turned into headers.
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// Expected row missing from the response.
    #[error("Not found: {0}")]
    NotFound(String),
}

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for the Supabase REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    rest_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl SupabaseClient {
    /// Create a new Supabase client.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are not valid header values or the
    /// HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let mut headers = HeaderMap::new();

        let anon_key = expose(&config.anon_key);
        headers.insert("apikey", header_value(anon_key)?);

        // Row-level security sees the user when a session token is present
        let bearer = config.access_token.as_ref().map_or(anon_key, expose);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {bearer}"))?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                rest_url: rest_url(&config.url)?,
                cache,
            }),
        })
    }

    /// Fetch all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, SupabaseError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = table_url(
            &self.inner.rest_url,
            "products",
            &[("select", "*"), ("order", "created_at.desc")],
        )?;
        let products: Vec<Product> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, SupabaseError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let filter = format!("eq.{id}");
        let url = table_url(
            &self.inner.rest_url,
            "products",
            &[("select", "*"), ("id", filter.as_str())],
        )?;
        let product = self.get_json::<Vec<Product>>(url).await?.into_iter().next();

        if let Some(product) = &product {
            self.inner
                .cache
                .insert(key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }

        Ok(product)
    }

    /// Insert an order and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or no row comes back.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total_amount))]
    pub async fn insert_order(&self, order: &NewOrder) -> Result<Order, SupabaseError> {
        let url = table_url(&self.inner.rest_url, "orders", &[])?;

        let response = self
            .inner
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&[order])
            .send()
            .await?;

        let rows: Vec<Order> = read_json(response).await?;
        let stored = rows
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound("inserted order row".to_string()))?;

        tracing::info!(order_id = %stored.id, "Order stored");
        Ok(stored)
    }

    /// Fetch a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self, user_id: UserId) -> Result<Vec<Order>, SupabaseError> {
        let filter = format!("eq.{user_id}");
        let url = table_url(
            &self.inner.rest_url,
            "orders",
            &[
                ("select", "*"),
                ("user_id", filter.as_str()),
                ("order", "created_at.desc"),
            ],
        )?;
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SupabaseError> {
        let response = self.inner.client.get(url).send().await?;
        read_json(response).await
    }
}

impl ProductCatalog for SupabaseClient {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.fetch_products().await?)
    }

    async fn find_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.fetch_product(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }
}

impl OrderRepository for SupabaseClient {
    async fn submit_order(&self, order: &NewOrder) -> Result<Order, OrderError> {
        Ok(self.insert_order(order).await?)
    }

    async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.fetch_orders(user_id).await?)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn header_value(value: &str) -> Result<HeaderValue, SupabaseError> {
    HeaderValue::from_str(value)
        .map_err(|e| SupabaseError::Credentials(format!("Invalid header value: {e}")))
}

/// `<project>/rest/v1/`, tolerating a project URL with or without a trailing slash.
fn rest_url(project: &Url) -> Result<Url, SupabaseError> {
    let mut base = project.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(REST_PATH)?)
}

/// Endpoint for `table` with PostgREST query parameters.
fn table_url(rest_url: &Url, table: &str, query: &[(&str, &str)]) -> Result<Url, SupabaseError> {
    let mut url = rest_url.join(table)?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Check the status and decode a JSON body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SupabaseError> {
    let status = response.status();

    // Check for rate limiting
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(SupabaseError::RateLimited(retry_after));
    }

    // Get response body as text first for better error diagnostics
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Supabase API returned non-success status"
        );
        return Err(SupabaseError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
