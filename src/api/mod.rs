//! REST API handlers

pub mod discovery;
pub mod health;
pub mod panels;

pub use discovery::discovery_routes;
pub use health::health_routes;
pub use panels::panel_routes;
