pub mod catalog;
pub mod home;
pub mod product_list;

pub use catalog::{CatalogState, CatalogView};
pub use home::{HomeView, MenuEntry};
pub use product_list::{EMPTY_STATE, ProductListState, ProductListView};
