pub mod fakestore;
pub mod traits;

pub use fakestore::{FakeStoreApi, RetryPolicy, StoreApiError};
pub use traits::StoreBackend;
