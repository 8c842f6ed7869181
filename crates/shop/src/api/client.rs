//! Production shop API client over `reqwest`.
//!
//! One client instance is shared by the whole app (cheap `Arc` clone). The
//! bearer token is installed at login/restore and cleared at logout; catalog
//! reads go through a `moka` cache with a 5-minute TTL.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use veda_core::ProductId;

use crate::config::ShopConfig;

use super::types::{
    Credentials, LoginResponse, NewProduct, Product, ProductUpdate, RegisterInput, UserProfile,
};
use super::{ApiError, CollectionFetch, ShopApi, shapes};

/// How long catalog reads stay cached.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

/// Upper bound on cached catalog entries.
const CATALOG_CACHE_CAPACITY: u64 = 1000;

/// How much of an error body ends up in an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Product(Arc<Product>),
    Products(Arc<Vec<Product>>),
}

/// Client for the remote shop API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    /// Base URL with any trailing slash trimmed.
    base_url: String,
    /// Bearer token for authenticated calls; absent while Guest.
    token: RwLock<Option<SecretString>>,
    catalog_cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ShopConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let catalog_cache = Cache::builder()
            .max_capacity(CATALOG_CACHE_CAPACITY)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_owned(),
                token: RwLock::new(None),
                catalog_cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Attach the bearer token, send, and map non-success statuses.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized(Self::error_message(response).await));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(Self::error_message(response).await));
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            });
        }

        Ok(response)
    }

    /// Pull a human-readable message out of an error response body.
    async fn error_message(response: reqwest::Response) -> String {
        let body = response.text().await.unwrap_or_default();
        extract_message(&body).unwrap_or_else(|| body.chars().take(ERROR_BODY_LIMIT).collect())
    }
}

/// Extract a `message`/`error` field from a JSON error body, if present.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddCartItemBody<'a> {
    product_id: &'a ProductId,
    quantity: u32,
}

#[derive(Serialize)]
struct QuantityBody {
    quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddWishlistItemBody<'a> {
    product_id: &'a ProductId,
}

// =============================================================================
// ShopApi implementation
// =============================================================================

impl ShopApi for ApiClient {
    fn set_token(&self, token: Option<SecretString>) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    #[instrument(skip(self, credentials))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .post(self.endpoint("api/auth/login"))
                    .json(credentials),
            )
            .await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, input))]
    async fn register(&self, input: &RegisterInput) -> Result<LoginResponse, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .post(self.endpoint("api/auth/register"))
                    .json(input),
            )
            .await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn fetch_current_user(&self) -> Result<UserProfile, ApiError> {
        let response = self
            .send(self.inner.http.get(self.endpoint("api/users/me")))
            .await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> CollectionFetch {
        let response = self.send(self.inner.http.get(self.endpoint("api/cart"))).await?;
        let value: Value = response.json().await?;
        Ok(shapes::normalize(value))
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn add_cart_item(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .post(self.endpoint("api/cart"))
                .json(&AddCartItemBody {
                    product_id,
                    quantity,
                }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .put(self.endpoint(&format!("api/cart/{product_id}")))
                .json(&QuantityBody { quantity }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_cart_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .delete(self.endpoint(&format!("api/cart/{product_id}"))),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_wishlist(&self) -> CollectionFetch {
        let response = self
            .send(self.inner.http.get(self.endpoint("api/wishlist")))
            .await?;
        let value: Value = response.json().await?;
        Ok(shapes::normalize(value))
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn add_wishlist_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .post(self.endpoint("api/wishlist"))
                .json(&AddWishlistItemBody { product_id }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_wishlist_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .delete(self.endpoint(&format!("api/wishlist/{product_id}"))),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.catalog_cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok((*product).clone());
        }

        let response = self
            .send(
                self.inner
                    .http
                    .get(self.endpoint(&format!("api/products/{product_id}"))),
            )
            .await?;
        let product: Product = response.json().await?;

        self.inner
            .catalog_cache
            .insert(cache_key, CacheValue::Product(Arc::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products".to_owned();

        if let Some(CacheValue::Products(products)) = self.inner.catalog_cache.get(&cache_key).await
        {
            debug!("cache hit for product listing");
            return Ok((*products).clone());
        }

        let response = self
            .send(self.inner.http.get(self.endpoint("api/products")))
            .await?;
        let products: Vec<Product> = response.json().await?;

        self.inner
            .catalog_cache
            .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    #[instrument(skip(self, input))]
    async fn create_product(&self, input: &NewProduct) -> Result<Product, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .post(self.endpoint("api/admin/products"))
                    .json(input),
            )
            .await?;
        let product: Product = response.json().await?;

        // Catalog changed; cached reads are stale.
        self.inner.catalog_cache.invalidate_all();

        Ok(product)
    }

    #[instrument(skip(self, input), fields(product_id = %product_id))]
    async fn update_product(
        &self,
        product_id: &ProductId,
        input: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .put(self.endpoint(&format!("api/admin/products/{product_id}")))
                    .json(input),
            )
            .await?;
        let product: Product = response.json().await?;

        self.inner.catalog_cache.invalidate_all();

        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn delete_product(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .delete(self.endpoint(&format!("api/admin/products/{product_id}"))),
        )
        .await?;

        self.inner.catalog_cache.invalidate_all();

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ShopConfig {
            api_base_url: base.parse().unwrap(),
            storage_dir: std::path::PathBuf::from(".veda"),
            http_timeout: Duration::from_secs(5),
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let api = client("https://shop.example.com/");
        assert_eq!(
            api.endpoint("api/cart"),
            "https://shop.example.com/api/cart"
        );

        let api = client("https://shop.example.com");
        assert_eq!(
            api.endpoint("api/products/7"),
            "https://shop.example.com/api/products/7"
        );
    }

    #[test]
    fn test_extract_message_prefers_message_field() {
        assert_eq!(
            extract_message(r#"{"message": "invalid credentials"}"#),
            Some("invalid credentials".to_owned())
        );
        assert_eq!(
            extract_message(r#"{"error": "boom"}"#),
            Some("boom".to_owned())
        );
        assert_eq!(extract_message("<html>502</html>"), None);
        assert_eq!(extract_message(r#"{"message": 42}"#), None);
    }

    #[test]
    fn test_set_token_replaces_and_clears() {
        let api = client("https://shop.example.com");
        assert!(api.token().is_none());

        api.set_token(Some(SecretString::from("tok-1")));
        assert_eq!(api.token().unwrap().expose_secret(), "tok-1");

        api.set_token(None);
        assert!(api.token().is_none());
    }
}
