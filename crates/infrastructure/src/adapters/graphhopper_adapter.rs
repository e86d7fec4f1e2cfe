//! GraphHopper adapter - implements CarRoutingPort using integration_graphhopper

use application::error::ApplicationError;
use application::ports::{CarRoutingPort, RoutingQuery};
use async_trait::async_trait;
use domain::Journey;
use integration_graphhopper::{
    CarRouteClient, GraphHopperConfig, GraphHopperError, GraphHopperHttpClient,
};
use tracing::{debug, instrument};

/// Adapter for car routing using the GraphHopper API
///
/// GraphHopper cannot route for a future departure, so the query's departure
/// time is not forwarded; leg times come back anchored to the request time.
pub struct GraphHopperAdapter {
    client: GraphHopperHttpClient,
}

impl std::fmt::Debug for GraphHopperAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphHopperAdapter")
            .field("client", &"GraphHopperHttpClient")
            .finish()
    }
}

impl GraphHopperAdapter {
    /// Create an adapter over a configured client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &GraphHopperConfig) -> Result<Self, ApplicationError> {
        let client = GraphHopperHttpClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    /// Map integration errors to application errors
    fn map_error(err: GraphHopperError) -> ApplicationError {
        match err {
            GraphHopperError::ConnectionFailed(_)
            | GraphHopperError::RequestFailed(_)
            | GraphHopperError::Timeout { .. }
            | GraphHopperError::RateLimitExceeded { .. } => {
                ApplicationError::ExternalService(err.to_string())
            },
            GraphHopperError::ParseError(e) => ApplicationError::Internal(e),
            GraphHopperError::ConfigurationError(e) => ApplicationError::Configuration(e),
        }
    }
}

#[async_trait]
impl CarRoutingPort for GraphHopperAdapter {
    #[instrument(skip(self, query))]
    async fn route(&self, query: &RoutingQuery) -> Result<Vec<Journey>, ApplicationError> {
        let journeys = self
            .client
            .compute_routes(query.origin, query.destination)
            .await
            .map_err(Self::map_error)?;

        debug!(count = journeys.len(), "Car routing completed");
        Ok(journeys)
    }
}
