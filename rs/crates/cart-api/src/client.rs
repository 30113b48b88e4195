//! REST client for the cart backend.
//!
//! One HTTP request per operation, JSON in and out, no retries. `checkout`
//! is derived: it lists the cart and deletes every row concurrently.

use std::future::Future;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::model::{AmountPatch, CartItem, InventoryItem, ItemId, NewCartItem};

/// The five backend calls plus the derived checkout.
///
/// The controller is generic over this so it can run against the HTTP client
/// or an in-memory double.
pub trait CartBackend: Send + Sync {
    fn get_cart(&self) -> impl Future<Output = Result<Vec<CartItem>, ApiError>> + Send;

    fn get_inventory(&self) -> impl Future<Output = Result<Vec<InventoryItem>, ApiError>> + Send;

    fn add_to_cart(
        &self,
        item: NewCartItem,
    ) -> impl Future<Output = Result<CartItem, ApiError>> + Send;

    fn update_cart(
        &self,
        id: &ItemId,
        amount: u32,
    ) -> impl Future<Output = Result<CartItem, ApiError>> + Send;

    fn delete_from_cart(&self, id: &ItemId) -> impl Future<Output = Result<Value, ApiError>> + Send;

    /// Delete every current cart row. Not atomic: rows deleted before a
    /// failure stay deleted.
    fn checkout(&self) -> impl Future<Output = Result<Vec<Value>, ApiError>> + Send;
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client with its own connection pool from `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("cart-api/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_http(http, &config.base_url))
    }

    /// Wrap an existing reqwest client.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("[api] {} {}{}", method, self.base_url, path);
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let body = resp.text().await?;
        // DELETE on some backends answers with an empty body
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

impl CartBackend for ApiClient {
    async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.send_json(self.request(Method::GET, "/cart"), "/cart").await
    }

    async fn get_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.send_json(self.request(Method::GET, "/inventory"), "/inventory")
            .await
    }

    async fn add_to_cart(&self, item: NewCartItem) -> Result<CartItem, ApiError> {
        let req = self.request(Method::POST, "/cart").json(&item);
        self.send_json(req, "/cart").await
    }

    async fn update_cart(&self, id: &ItemId, amount: u32) -> Result<CartItem, ApiError> {
        let path = format!("/cart/{}", id);
        let req = self.request(Method::PATCH, &path).json(&AmountPatch { amount });
        self.send_json(req, &path).await
    }

    async fn delete_from_cart(&self, id: &ItemId) -> Result<Value, ApiError> {
        let path = format!("/cart/{}", id);
        self.send_json(self.request(Method::DELETE, &path), &path).await
    }

    async fn checkout(&self) -> Result<Vec<Value>, ApiError> {
        let cart = self.get_cart().await?;
        log::info!("[api] checkout: deleting {} cart item(s)", cart.len());

        let mut results = vec![Value::Null; cart.len()];
        let mut tasks = JoinSet::new();
        for (idx, item) in cart.into_iter().enumerate() {
            let client = self.clone();
            tasks.spawn(async move { (idx, client.delete_from_cart(&item.id).await) });
        }

        // Let every delete settle before reporting, so the caller sees the
        // first failure only once nothing is still in flight.
        let mut first_err = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, Ok(value))) => results[idx] = value,
                Ok((_, Err(e))) => {
                    log::warn!("[api] checkout delete failed: {}", e);
                    first_err.get_or_insert(e);
                }
                Err(e) => {
                    first_err.get_or_insert(ApiError::Network(format!("delete task aborted: {}", e)));
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}
