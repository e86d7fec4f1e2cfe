//! Geovelo adapter - implements BikeRoutingPort using integration_geovelo

use application::error::ApplicationError;
use application::ports::{BikeRoutingPort, RoutingQuery};
use async_trait::async_trait;
use domain::Journey;
use integration_geovelo::{BikeRouteClient, GeoveloConfig, GeoveloError, GeoveloHttpClient};
use tracing::{debug, instrument};

/// Adapter for bike routing using the Geovelo API
pub struct GeoveloAdapter {
    client: GeoveloHttpClient,
}

impl std::fmt::Debug for GeoveloAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoveloAdapter")
            .field("client", &"GeoveloHttpClient")
            .finish()
    }
}

impl GeoveloAdapter {
    /// Create an adapter over a configured client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &GeoveloConfig) -> Result<Self, ApplicationError> {
        let client = GeoveloHttpClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    /// Map integration errors to application errors
    fn map_error(err: GeoveloError) -> ApplicationError {
        match err {
            GeoveloError::ConnectionFailed(_)
            | GeoveloError::RequestFailed(_)
            | GeoveloError::Timeout { .. }
            | GeoveloError::RateLimitExceeded { .. } => {
                ApplicationError::ExternalService(err.to_string())
            },
            GeoveloError::ParseError(e) => ApplicationError::Internal(e),
            GeoveloError::ConfigurationError(e) => ApplicationError::Configuration(e),
        }
    }
}

#[async_trait]
impl BikeRoutingPort for GeoveloAdapter {
    #[instrument(skip(self, query))]
    async fn route(&self, query: &RoutingQuery) -> Result<Vec<Journey>, ApplicationError> {
        let journeys = self
            .client
            .compute_routes(query.origin, query.destination, query.departure)
            .await
            .map_err(Self::map_error)?;

        debug!(count = journeys.len(), "Bike routing completed");
        Ok(journeys)
    }
}
