//! Product catalog front-end built around a replaying broadcast channel.
//!
//! Loaders fetch from the store API and publish into
//! [`ReplayChannel`](crate::core::ReplayChannel)s; views subscribe through
//! read-only readers and re-render on every value.

pub mod app;
pub mod backends;
pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod ui;

pub use app::App;
pub use config::Config;
