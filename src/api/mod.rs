//! HTTP API layer

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use server::build_app;
pub use server::init_state;
pub use server::serve_api;
