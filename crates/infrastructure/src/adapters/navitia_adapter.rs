//! Navitia adapter - implements TransitRoutingPort using integration_navitia

use application::error::ApplicationError;
use application::ports::{RoutingQuery, TransitRoutingPort};
use async_trait::async_trait;
use domain::Journey;
use integration_navitia::{NavitiaConfig, NavitiaError, NavitiaHttpClient, TransitRouteClient};
use tracing::{debug, instrument};

/// Adapter for public transit routing using the Navitia API
pub struct NavitiaAdapter {
    client: NavitiaHttpClient,
}

impl std::fmt::Debug for NavitiaAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavitiaAdapter")
            .field("client", &"NavitiaHttpClient")
            .finish()
    }
}

impl NavitiaAdapter {
    /// Create an adapter over a configured client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NavitiaConfig) -> Result<Self, ApplicationError> {
        let client = NavitiaHttpClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    /// Map integration errors to application errors
    fn map_error(err: NavitiaError) -> ApplicationError {
        match err {
            NavitiaError::ConnectionFailed(_)
            | NavitiaError::RequestFailed(_)
            | NavitiaError::Timeout { .. }
            | NavitiaError::RateLimitExceeded { .. } => {
                ApplicationError::ExternalService(err.to_string())
            },
            NavitiaError::ParseError(e) => ApplicationError::Internal(e),
            NavitiaError::ConfigurationError(e) => ApplicationError::Configuration(e),
        }
    }
}

#[async_trait]
impl TransitRoutingPort for NavitiaAdapter {
    #[instrument(skip(self, query))]
    async fn route(&self, query: &RoutingQuery) -> Result<Vec<Journey>, ApplicationError> {
        let journeys = self
            .client
            .compute_journeys(query.origin, query.destination, query.departure)
            .await
            .map_err(Self::map_error)?;

        debug!(count = journeys.len(), "Transit routing completed");
        Ok(journeys)
    }
}
