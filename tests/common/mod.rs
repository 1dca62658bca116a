#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storefront::backends::{StoreApiError, StoreBackend};
use storefront::models::{Product, User, UserName};

/// In-memory store with per-endpoint failure injection and latency.
#[derive(Debug, Default)]
pub struct MockStore {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub users: Vec<User>,
    pub failing: Mutex<Vec<&'static str>>,
    pub delay: Duration,
    pub calls: Mutex<Vec<&'static str>>,
}

impl MockStore {
    pub fn sample() -> Self {
        Self {
            products: vec![
                Product::new(1, "Fjallraven Backpack", 109.95),
                Product::new(2, "Slim Fit T-Shirt", 22.3),
            ],
            categories: vec!["electronics".to_string(), "jewelery".to_string()],
            users: vec![user(1, "john", "doe"), user(2, "david", "morrison")],
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().push(endpoint);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond<T: Clone>(
        &self,
        endpoint: &'static str,
        value: &T,
    ) -> Result<T, StoreApiError> {
        self.calls.lock().unwrap().push(endpoint);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(StoreApiError::ServerError {
                status: 500,
                message: format!("{} unavailable", endpoint),
            });
        }
        Ok(value.clone())
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl StoreBackend for MockStore {
    async fn get_products(&self, limit: Option<usize>) -> Result<Vec<Product>, StoreApiError> {
        let products = self.respond("products", &self.products).await?;
        Ok(products.into_iter().take(limit.unwrap_or(usize::MAX)).collect())
    }

    async fn get_categories(&self) -> Result<Vec<String>, StoreApiError> {
        self.respond("categories", &self.categories).await
    }

    async fn get_users(&self, limit: Option<usize>) -> Result<Vec<User>, StoreApiError> {
        let users = self.respond("users", &self.users).await?;
        Ok(users.into_iter().take(limit.unwrap_or(usize::MAX)).collect())
    }
}

pub fn user(id: u64, firstname: &str, lastname: &str) -> User {
    User {
        id,
        email: format!("{}@example.com", firstname),
        username: firstname.to_string(),
        name: UserName {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        },
    }
}
