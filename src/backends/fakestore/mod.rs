// Module organization for the fake store REST API

mod client;
pub mod errors;
pub mod retry;
mod tests;

pub use client::{DEFAULT_BASE_URL, FakeStoreApi};
pub use errors::StoreApiError;
pub use retry::RetryPolicy;
