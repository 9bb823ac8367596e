//! Pixedge API Library
//!
//! The edge request dispatcher: HTTP handlers, middleware and application setup
//! that forward images and processing options to the external image provider.

mod handlers;
mod middleware;
mod telemetry;
mod utils;

pub mod error;
pub mod provider;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use provider::{HttpImageProvider, ImageProvider, ProviderRequest, ProviderResponse};
pub use state::AppState;
