//! Application state shared by all handlers.

use std::sync::Arc;

use pixedge_core::Config;

use crate::provider::ImageProvider;

/// The dispatcher keeps no per-request state: only configuration and the
/// provider handle are shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn ImageProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn ImageProvider>) -> Self {
        Self { config, provider }
    }
}
