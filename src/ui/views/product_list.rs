use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

use crate::backends::StoreApiError;
use crate::core::{ChannelReader, Observer, ScopedSubscription};
use crate::models::Product;

pub const EMPTY_STATE: &str = "No products found.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListState {
    pub products: Vec<Product>,
    /// Set by an error delivery, cleared by the next value
    pub error: Option<String>,
}

/// Product list page backed by the shared product channel.
///
/// Mounting subscribes and receives the current list right away; the
/// subscription is released when the view is unmounted or dropped.
#[derive(Debug)]
pub struct ProductListView {
    state: Arc<Mutex<ProductListState>>,
    renders: Arc<AtomicUsize>,
    subscription: ScopedSubscription,
}

impl ProductListView {
    pub fn mount(products: &ChannelReader<Vec<Product>, StoreApiError>) -> Self {
        let state: Arc<Mutex<ProductListState>> = Arc::default();
        let renders = Arc::new(AtomicUsize::new(0));

        let (value_state, error_state) = (state.clone(), state.clone());
        let value_renders = renders.clone();
        let observer = Observer::new(move |items: &Vec<Product>| {
            let mut state = value_state.lock().unwrap_or_else(PoisonError::into_inner);
            state.products = items.clone();
            state.error = None;
            value_renders.fetch_add(1, Ordering::Relaxed);
            debug!("Product list re-rendered with {} products", items.len());
        })
        .on_error(move |error: &StoreApiError| {
            warn!("Product list received error: {}", error);
            error_state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .error = Some(error.to_string());
        });

        let subscription = products.subscribe(observer).scoped();
        Self {
            state,
            renders,
            subscription,
        }
    }

    pub fn state(&self) -> ProductListState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of values delivered since mount, including the replay.
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn unmount(self) {
        debug!("Unmounting product list view");
    }
}

impl fmt::Display for ProductListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        writeln!(f, "Product list")?;
        if let Some(error) = &state.error {
            writeln!(f, "Could not load products: {}", error)?;
        }
        if state.products.is_empty() {
            return writeln!(f, "{}", EMPTY_STATE);
        }
        for product in &state.products {
            writeln!(f, "  {}  ${:.2}", product.title, product.price)?;
        }
        Ok(())
    }
}
