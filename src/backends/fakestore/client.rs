use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::errors::StoreApiError;
use super::retry::RetryPolicy;
use crate::backends::traits::StoreBackend;
use crate::models::{Product, User};

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

fn standard_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// HTTP client for the fake store REST API.
#[derive(Clone, Debug)]
pub struct FakeStoreApi {
    client: reqwest::Client,
    base_url: Url,
    retry_policy: RetryPolicy,
}

impl FakeStoreApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreApiError> {
        Self::with_retry_policy(base_url, timeout, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        base_url: &str,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Result<Self, StoreApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreApiError::Other(format!("Invalid base URL '{}': {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreApiError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            retry_policy,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub(super) fn build_url(&self, path: &str, limit: Option<usize>) -> String {
        let mut url = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        if let Some(limit) = limit {
            url.push_str(&format!("?limit={}", limit));
        }
        url
    }

    /// GET `url` under the retry policy and decode the JSON body.
    async fn execute_get<T: DeserializeOwned>(
        &self,
        url: &str,
        operation_name: &str,
    ) -> Result<T, StoreApiError> {
        self.retry_policy
            .execute(operation_name, || async {
                debug!("[{}] GET {}", operation_name, url);

                let response = self
                    .client
                    .get(url)
                    .headers(standard_headers())
                    .send()
                    .await
                    .map_err(StoreApiError::from_reqwest)?;

                let status = response.status();
                debug!("[{}] Response: {}", operation_name, status);

                if !status.is_success() {
                    let retry_after = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|value| value.to_str().ok())
                        .and_then(|value| value.trim().parse::<u64>().ok());
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<failed to read response body>".to_string());

                    warn!(
                        "[{}] Error response - Status: {}, Body: {}",
                        operation_name,
                        status.as_u16(),
                        body
                    );
                    return Err(StoreApiError::from_status(status.as_u16(), body, retry_after));
                }

                response.json::<T>().await.map_err(|e| {
                    StoreApiError::ParseError(format!("{}: {}", operation_name, e))
                })
            })
            .await
    }
}

#[async_trait]
impl StoreBackend for FakeStoreApi {
    async fn get_products(&self, limit: Option<usize>) -> Result<Vec<Product>, StoreApiError> {
        let url = self.build_url("/products", limit);
        let products: Vec<Product> = self.execute_get(&url, "get_products").await?;
        debug!("Fetched {} products", products.len());
        Ok(products)
    }

    async fn get_categories(&self) -> Result<Vec<String>, StoreApiError> {
        let url = self.build_url("/products/categories", None);
        self.execute_get(&url, "get_categories").await
    }

    async fn get_users(&self, limit: Option<usize>) -> Result<Vec<User>, StoreApiError> {
        let url = self.build_url("/users", limit);
        let users: Vec<User> = self.execute_get(&url, "get_users").await?;
        debug!("Fetched {} users", users.len());
        Ok(users)
    }
}
