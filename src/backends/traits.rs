use async_trait::async_trait;

use super::fakestore::StoreApiError;
use crate::models::{Product, User};

/// Remote source of catalog data.
#[async_trait]
pub trait StoreBackend: Send + Sync + std::fmt::Debug {
    /// `limit = None` returns the whole catalog
    async fn get_products(&self, limit: Option<usize>) -> Result<Vec<Product>, StoreApiError>;

    async fn get_categories(&self) -> Result<Vec<String>, StoreApiError>;

    async fn get_users(&self, limit: Option<usize>) -> Result<Vec<User>, StoreApiError>;
}
