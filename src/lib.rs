pub mod app;
pub mod authz;
pub mod config;
pub mod docs;
pub mod errors;
pub mod events;
pub mod jwt;
pub mod models;
pub mod registry;
pub mod routes;
pub mod services;
pub mod session;
pub mod utils;

// Re-export commonly used items for tests
pub use app::{create_app, AppState};
pub use registry::ServiceRegistry;
