//! Application state for the web layer.

use std::sync::Arc;

use crate::metro::MetroService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Network data and the live routing graph
    pub metro: Arc<MetroService>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(metro: MetroService) -> Self {
        Self {
            metro: Arc::new(metro),
        }
    }
}
