use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

use crate::core::{ChannelReader, Observer, ScopedSubscription};
use crate::models::CatalogOverview;
use crate::services::JoinError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub overview: CatalogOverview,
    pub error: Option<String>,
}

/// Fork-join page: renders only complete aggregates.
#[derive(Debug)]
pub struct CatalogView {
    state: Arc<Mutex<CatalogState>>,
    _subscription: ScopedSubscription,
}

impl CatalogView {
    pub fn mount(catalog: &ChannelReader<CatalogOverview, JoinError>) -> Self {
        let state: Arc<Mutex<CatalogState>> = Arc::default();
        let (value_state, error_state) = (state.clone(), state.clone());

        let observer = Observer::new(move |overview: &CatalogOverview| {
            let mut state = value_state.lock().unwrap_or_else(PoisonError::into_inner);
            state.overview = overview.clone();
            state.error = None;
        })
        .on_error(move |error: &JoinError| {
            warn!("Catalog view keeps previous data after join failure: {}", error);
            error_state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .error = Some(error.to_string());
        });

        Self {
            state,
            _subscription: catalog.subscribe(observer).scoped(),
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn unmount(self) {}
}

impl fmt::Display for CatalogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let CatalogState { overview, error } = self.state();

        writeln!(f, "Products, categories and users")?;
        if let Some(error) = error {
            writeln!(f, "Error: {}", error)?;
        }

        writeln!(f, "Products:")?;
        for product in &overview.products {
            writeln!(f, "  - {}  ${:.2}", product.title, product.price)?;
            if !product.description.is_empty() {
                writeln!(f, "    {}", product.description)?;
            }
            if let Some(rating) = product.rating {
                writeln!(f, "    Rating: {} ({} reviews)", rating.rate, rating.count)?;
            }
        }

        writeln!(f, "Categories:")?;
        for category in &overview.categories {
            writeln!(f, "  - {}", category)?;
        }

        writeln!(f, "Users:")?;
        for user in &overview.users {
            writeln!(f, "  - {}", user)?;
        }
        Ok(())
    }
}
