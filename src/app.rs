use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backends::{FakeStoreApi, RetryPolicy, StoreBackend};
use crate::config::Config;
use crate::services::{CatalogLoader, ProductLoader};
use crate::ui::Route;
use crate::ui::views::{CatalogView, HomeView, ProductListView};

/// Application wiring. Owns the loaders and their channels; views borrow
/// read-only handles while they are mounted.
#[derive(Debug)]
pub struct App {
    config: Config,
    products: ProductLoader,
    catalog: CatalogLoader,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let retry_policy = RetryPolicy::new(config.api.max_retries);
        let api =
            FakeStoreApi::with_retry_policy(&config.api.base_url, config.timeout(), retry_policy)
                .context("Failed to create store API client")?;
        info!("Using store API at {}", api.base_url());
        Ok(Self::with_backend(config, Arc::new(api)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn StoreBackend>) -> Self {
        let products = ProductLoader::new(backend.clone())
            .with_limit(config.api.product_limit)
            .with_reset_on_error(config.loader.reset_on_error);
        let catalog = CatalogLoader::new(backend).with_limits(
            Some(config.catalog.product_limit),
            Some(config.catalog.user_limit),
        );

        Self {
            config,
            products,
            catalog,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn products(&self) -> &ProductLoader {
        &self.products
    }

    pub fn catalog(&self) -> &CatalogLoader {
        &self.catalog
    }

    pub async fn render(&self, path: &str) -> Result<String> {
        let route = Route::from_path(path).ok_or_else(|| {
            anyhow!(
                "Unknown route '{}'. Known routes: {}",
                path,
                Route::known_paths().join(", ")
            )
        })?;
        Ok(self.render_route(route).await)
    }

    /// Mount the route's view, run its loader, and return what it rendered.
    /// Load failures are shown by the view, not returned.
    pub async fn render_route(&self, route: Route) -> String {
        info!("Rendering {}", route);
        match route {
            Route::Menu | Route::Home => HomeView::for_route(route).render(),
            Route::BehaviorSubject => {
                let view = ProductListView::mount(&self.products.channel());
                if let Err(e) = self.products.load().await {
                    warn!("Product list falls back to empty state: {}", e);
                }
                let output = view.render();
                view.unmount();
                output
            }
            Route::ForkJoin => {
                let view = CatalogView::mount(&self.catalog.channel());
                if let Err(e) = self.catalog.load().await {
                    warn!("Catalog shows no aggregate: {}", e);
                }
                let output = view.render();
                view.unmount();
                output
            }
        }
    }
}
