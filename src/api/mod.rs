// API module
//
// This module exposes the ledger over HTTP

pub mod handlers;
pub mod routes;
pub mod schema;
pub mod state;

// Re-export main components for easier access
pub use routes::configure_routes;
pub use state::AppState;
