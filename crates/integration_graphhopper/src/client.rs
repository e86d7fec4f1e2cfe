//! GraphHopper route client
//!
//! Requests a car route between two coordinates with unencoded point
//! geometry. GraphHopper returns durations, not absolute times: each path's
//! departure is the wall clock at request time and its arrival adds the
//! reported travel time.

use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoLocation, Journey, PathSegment, RoutingDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::GraphHopperConfig;
use crate::error::GraphHopperError;

/// Average car emission factor, grams of CO2 per kilometer
const CAR_CO2_GRAMS_PER_KM: f64 = 120.0;

/// Trait for car routing clients
#[async_trait]
pub trait CarRouteClient: Send + Sync {
    /// Compute car itineraries between two coordinate pairs
    ///
    /// Leg times are anchored to the wall clock at request time; there is
    /// no way to ask GraphHopper for a departure in the future.
    async fn compute_routes(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
    ) -> Result<Vec<Journey>, GraphHopperError>;
}

/// GraphHopper-backed car routing client
#[derive(Debug)]
pub struct GraphHopperHttpClient {
    client: Client,
    config: GraphHopperConfig,
}

impl GraphHopperHttpClient {
    /// Create a new GraphHopper client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GraphHopperConfig) -> Result<Self, GraphHopperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Verdiroute/1.0")
            .build()
            .map_err(|e| GraphHopperError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse the raw route response into domain journeys anchored at `now`
    fn parse_route_response(
        body: &str,
        now: RoutingDateTime,
    ) -> Result<Vec<Journey>, GraphHopperError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| GraphHopperError::ParseError(e.to_string()))?;

        raw.paths
            .into_iter()
            .map(|path| Self::convert_path(path, now))
            .collect()
    }

    /// Convert a raw path to a single-leg car journey
    fn convert_path(raw: RawPath, now: RoutingDateTime) -> Result<Journey, GraphHopperError> {
        let travel_seconds = raw.time / 1000;
        let arrival = now.plus_seconds(travel_seconds).ok_or_else(|| {
            GraphHopperError::ParseError(format!("Travel time out of range: {} ms", raw.time))
        })?;

        let shape = raw
            .points
            .map(|points| convert_coordinates(points.coordinates))
            .transpose()?
            .unwrap_or_default();

        let co2_grams = raw.distance / 1000.0 * CAR_CO2_GRAMS_PER_KM;

        let path = PathSegment {
            mode: "car".to_string(),
            shape,
            line: None,
            color: None,
            departure: now,
            arrival,
            co2_grams,
        };

        Ok(Journey::new(now, arrival, vec![path]))
    }
}

#[async_trait]
impl CarRouteClient for GraphHopperHttpClient {
    #[instrument(skip(self), fields(%origin, %destination))]
    async fn compute_routes(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
    ) -> Result<Vec<Journey>, GraphHopperError> {
        let url = format!("{}/route", self.config.base_url);

        let params = [
            ("point", format!("{},{}", origin.latitude(), origin.longitude())),
            (
                "point",
                format!("{},{}", destination.latitude(), destination.longitude()),
            ),
            ("profile", self.config.profile.clone()),
            ("locale", self.config.locale.clone()),
            ("calc_points", "true".to_string()),
            ("points_encoded", "false".to_string()),
            ("key", self.config.api_key.clone()),
        ];

        debug!(?url, "Computing car routes");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GraphHopperError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    GraphHopperError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GraphHopperError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(GraphHopperError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GraphHopperError::ParseError(e.to_string()))?;

        let journeys = Self::parse_route_response(&body, RoutingDateTime::now())?;

        if journeys.is_empty() {
            warn!("No car routes found");
        }

        debug!(count = journeys.len(), "Car routes found");
        Ok(journeys)
    }
}

/// Convert GraphHopper `[lon, lat]` coordinate pairs to locations
///
/// Pairs may carry a third elevation component, which is ignored.
fn convert_coordinates(coordinates: Vec<Vec<f64>>) -> Result<Vec<GeoLocation>, GraphHopperError> {
    coordinates
        .into_iter()
        .map(|pair| {
            let (&lon, &lat) = pair
                .first()
                .zip(pair.get(1))
                .ok_or_else(|| {
                    GraphHopperError::ParseError("Coordinate pair too short".to_string())
                })?;
            GeoLocation::new(lat, lon).map_err(|e| GraphHopperError::ParseError(e.to_string()))
        })
        .collect()
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    #[serde(default)]
    paths: Vec<RawPath>,
}

#[derive(Debug, Deserialize)]
struct RawPath {
    points: Option<RawPoints>,
    /// Route length in meters
    #[serde(default)]
    distance: f64,
    /// Travel time in milliseconds
    #[serde(default)]
    time: i64,
}

#[derive(Debug, Deserialize)]
struct RawPoints {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> RoutingDateTime {
        "20251121T073000".parse().unwrap()
    }

    const FIXTURE: &str = r#"{
        "paths": [{
            "distance": 12500.0,
            "time": 1500000,
            "points": {
                "type": "LineString",
                "coordinates": [
                    [2.33792, 48.85827],
                    [2.34500, 48.89000],
                    [2.35885, 48.92711]
                ]
            }
        }]
    }"#;

    #[test]
    fn test_parse_route_response() {
        let journeys = GraphHopperHttpClient::parse_route_response(FIXTURE, now()).unwrap();

        assert_eq!(journeys.len(), 1);
        let journey = &journeys[0];
        assert_eq!(journey.departure.to_string(), "20251121T073000");
        // 1_500_000 ms = 25 minutes of travel
        assert_eq!(journey.arrival.to_string(), "20251121T075500");

        let path = &journey.paths[0];
        assert_eq!(path.mode, "car");
        assert_eq!(path.shape.len(), 3);
        // Coordinates arrive lon-first and must be swapped
        assert!((path.shape[0].latitude() - 48.85827).abs() < 1e-9);
        assert!((path.shape[0].longitude() - 2.33792).abs() < 1e-9);
    }

    #[test]
    fn test_co2_is_distance_times_emission_factor() {
        let journeys = GraphHopperHttpClient::parse_route_response(FIXTURE, now()).unwrap();
        // 12.5 km at 120 g/km
        assert!((journeys[0].total_co2_grams - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_elevation_coordinates() {
        let json = r#"{
            "paths": [{
                "distance": 1000.0,
                "time": 60000,
                "points": { "coordinates": [[2.33792, 48.85827, 35.0]] }
            }]
        }"#;
        let journeys = GraphHopperHttpClient::parse_route_response(json, now()).unwrap();
        assert_eq!(journeys[0].paths[0].shape.len(), 1);
    }

    #[test]
    fn test_parse_empty_paths() {
        let journeys =
            GraphHopperHttpClient::parse_route_response(r#"{"paths": []}"#, now()).unwrap();
        assert!(journeys.is_empty());
    }

    #[test]
    fn test_parse_missing_points() {
        let json = r#"{"paths": [{"distance": 1000.0, "time": 60000}]}"#;
        let journeys = GraphHopperHttpClient::parse_route_response(json, now()).unwrap();
        assert!(journeys[0].paths[0].shape.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(GraphHopperHttpClient::parse_route_response("not json", now()).is_err());
    }

    #[test]
    fn test_parse_absurd_travel_time_is_error() {
        let json = r#"{
            "paths": [{
                "distance": 1000.0,
                "time": 9223372036854775807,
                "points": { "coordinates": [[2.33792, 48.85827]] }
            }]
        }"#;
        let err = GraphHopperHttpClient::parse_route_response(json, now()).unwrap_err();
        assert!(matches!(err, GraphHopperError::ParseError(_)));
    }

    #[test]
    fn test_parse_short_coordinate_pair_is_error() {
        let json = r#"{
            "paths": [{
                "distance": 1000.0,
                "time": 60000,
                "points": { "coordinates": [[2.33792]] }
            }]
        }"#;
        assert!(GraphHopperHttpClient::parse_route_response(json, now()).is_err());
    }
}
