//! Application state shared across handlers

use std::sync::Arc;

use application::ports::GeocodingPort;
use application::services::JourneyPlanner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Journey planner over all routing sources
    pub planner: Arc<JourneyPlanner>,
    /// Geocoder for free-text addresses
    pub geocoding: Arc<dyn GeocodingPort>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
