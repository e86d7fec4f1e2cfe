//! Geocoding adapter - implements GeocodingPort using the Nominatim client

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::GeoLocation;
use integration_navitia::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use tracing::{debug, instrument};

/// Adapter for address resolution using Nominatim
pub struct GeocodingAdapter {
    client: NominatimGeocodingClient,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"NominatimGeocodingClient")
            .finish()
    }
}

impl GeocodingAdapter {
    /// Create an adapter over a configured client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    /// Map geocoding errors to application errors
    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::AddressNotFound(address) => ApplicationError::NotFound(address),
            GeocodingError::ConnectionFailed(_)
            | GeocodingError::RequestFailed(_)
            | GeocodingError::Timeout => ApplicationError::ExternalService(err.to_string()),
            GeocodingError::ParseError(e) => ApplicationError::Internal(e),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeoLocation, ApplicationError> {
        let location = self
            .client
            .geocode(address)
            .await
            .map_err(Self::map_error)?;

        debug!(%location, "Address resolved");
        Ok(location)
    }
}
