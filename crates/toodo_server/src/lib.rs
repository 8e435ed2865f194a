//! HTTP surface for the Toodo service.
//!
//! # Responsibility
//! - Expose the item list and sync endpoints over JSON.
//! - Serve the front-end bundle under `/ui` and redirect `/` to it.
//! - Bridge async request handling onto the blocking SQLite core.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ServerConfig, SyncModeArg};
pub use error::{ApiError, ServerError};
pub use routes::build_router;
pub use server::serve;
pub use state::AppState;
