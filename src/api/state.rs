//! Application state for the API server

use crate::Config;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone). The pipeline
/// itself is stateless; the only shared value is the configuration.
#[derive(Clone)]
pub struct AppState {
    /// Configuration, including tool paths and pipeline bounds
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}
