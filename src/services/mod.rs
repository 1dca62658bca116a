pub mod catalog;
pub mod product_loader;

pub use catalog::{CatalogLoader, JoinError};
pub use product_loader::{ProductChannel, ProductLoader};
