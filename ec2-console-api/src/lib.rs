// Library entry point for tests and external usage
// Re-exports all modules needed for testing

pub mod api_docs;
pub mod app;
pub mod config;
pub mod control;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod locale;
pub mod provider_manager;
pub mod routes;
pub mod version;

// Re-export commonly used types
pub use app::AppState;
