use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::backends::{StoreApiError, StoreBackend};
use crate::core::{ChannelReader, ReplayChannel};
use crate::models::CatalogOverview;

/// One source of a join failed; the results of the others were discarded.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source_name} request failed: {error}")]
pub struct JoinError {
    pub source_name: String,
    #[source]
    pub error: StoreApiError,
}

async fn tagged<T, F>(source_name: impl Into<String>, request: F) -> Result<T, JoinError>
where
    F: Future<Output = Result<T, StoreApiError>>,
{
    let source_name = source_name.into();
    debug!("Join source '{}' started", source_name);
    request
        .await
        .map_err(|error| JoinError { source_name, error })
}

/// Products, categories and users fetched together and published as one
/// [`CatalogOverview`], or not at all.
#[derive(Debug)]
pub struct CatalogLoader {
    backend: Arc<dyn StoreBackend>,
    channel: ReplayChannel<CatalogOverview, JoinError>,
    product_limit: Option<usize>,
    user_limit: Option<usize>,
}

impl CatalogLoader {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            backend,
            channel: ReplayChannel::named("catalog", CatalogOverview::default()),
            product_limit: Some(5),
            user_limit: Some(5),
        }
    }

    pub fn with_limits(
        mut self,
        product_limit: Option<usize>,
        user_limit: Option<usize>,
    ) -> Self {
        self.product_limit = product_limit;
        self.user_limit = user_limit;
        self
    }

    pub fn channel(&self) -> ChannelReader<CatalogOverview, JoinError> {
        self.channel.reader()
    }

    /// Run the three requests concurrently. The first failure wins; requests
    /// still in flight are dropped and nothing partial is returned.
    pub async fn fetch(&self) -> Result<CatalogOverview, JoinError> {
        let (products, categories, users) = futures::try_join!(
            tagged("products", self.backend.get_products(self.product_limit)),
            tagged("categories", self.backend.get_categories()),
            tagged("users", self.backend.get_users(self.user_limit)),
        )?;
        Ok(CatalogOverview::from_sources(products, categories, users))
    }

    /// Fetch and publish the aggregate. On failure only the error is
    /// published; observers keep whatever aggregate they had.
    pub async fn load(&self) -> Result<(), JoinError> {
        let start = Instant::now();
        match self.fetch().await {
            Ok(overview) => {
                info!(
                    "Catalog join complete in {:?}: {} products, {} categories, {} users",
                    start.elapsed(),
                    overview.products.len(),
                    overview.categories.len(),
                    overview.users.len()
                );
                self.channel.publish(overview);
                Ok(())
            }
            Err(e) => {
                error!("Catalog join failed: {}", e);
                self.channel.publish_error(e.clone());
                Err(e)
            }
        }
    }
}
