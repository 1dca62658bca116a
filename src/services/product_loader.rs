use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::backends::{StoreApiError, StoreBackend};
use crate::core::{ChannelReader, ReplayChannel};
use crate::models::Product;

pub type ProductChannel = ReplayChannel<Vec<Product>, StoreApiError>;

/// Fetches the product list and publishes it into a shared channel.
///
/// The loader is the only writer; views hold a [`ChannelReader`]. A view that
/// unmounts while a load is in flight is protected by having unsubscribed,
/// the request itself runs to completion.
#[derive(Debug)]
pub struct ProductLoader {
    backend: Arc<dyn StoreBackend>,
    channel: ProductChannel,
    limit: Option<usize>,
    reset_on_error: bool,
}

impl ProductLoader {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            backend,
            channel: ReplayChannel::named("products", Vec::new()),
            limit: None,
            reset_on_error: true,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// When set, a failed load first publishes an empty list so every view
    /// (and every later subscriber) falls back to the empty state.
    pub fn with_reset_on_error(mut self, reset_on_error: bool) -> Self {
        self.reset_on_error = reset_on_error;
        self
    }

    pub fn channel(&self) -> ChannelReader<Vec<Product>, StoreApiError> {
        self.channel.reader()
    }

    /// Fetch once and publish the outcome. Returns the number of products
    /// published, or the fetch error after it has been delivered to observers.
    pub async fn load(&self) -> Result<usize, StoreApiError> {
        let start = Instant::now();
        match self.backend.get_products(self.limit).await {
            Ok(products) => {
                let count = products.len();
                info!("Loaded {} products in {:?}", count, start.elapsed());
                self.channel.publish(products);
                Ok(count)
            }
            Err(e) => {
                error!("Failed to fetch products: {}", e);
                if self.reset_on_error {
                    self.channel.publish(Vec::new());
                }
                self.channel.publish_error(e.clone());
                Err(e)
            }
        }
    }
}
