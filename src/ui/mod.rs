pub mod router;
pub mod views;

pub use router::Route;
