//! Geovelo computed-routes client
//!
//! Requests a single best bike itinerary between two coordinates and
//! normalizes it into a domain journey. Section geometry arrives as a
//! 6-decimal encoded polyline; sections without geometry fall back to their
//! waypoint list.

use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoLocation, Journey, PathSegment, RoutingDateTime, polyline};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::GeoveloConfig;
use crate::error::GeoveloError;

/// Geometry precision of Geovelo polylines
const GEOMETRY_PRECISION: u32 = 6;

/// Fixed query options requesting one geometry-bearing result
const QUERY_OPTIONS: [(&str, &str); 8] = [
    ("instructions", "false"),
    ("elevations", "false"),
    ("geometry", "true"),
    ("single_result", "true"),
    ("bike_stations", "true"),
    ("objects_as_ids", "true"),
    ("merge_instructions", "false"),
    ("show_pushing_bike_instructions", "false"),
];

/// Trait for bike routing clients
#[async_trait]
pub trait BikeRouteClient: Send + Sync {
    /// Compute bike itineraries between two coordinate pairs
    async fn compute_routes(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        departure: RoutingDateTime,
    ) -> Result<Vec<Journey>, GeoveloError>;
}

/// Geovelo-backed bike routing client
#[derive(Debug)]
pub struct GeoveloHttpClient {
    client: Client,
    config: GeoveloConfig,
}

impl GeoveloHttpClient {
    /// Create a new Geovelo client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeoveloConfig) -> Result<Self, GeoveloError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Verdiroute/1.0")
            .build()
            .map_err(|e| GeoveloError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse the raw route array into domain journeys
    ///
    /// Only the first route is kept; the API is queried in single-result
    /// mode and anything beyond the best route is noise.
    fn parse_routes_response(body: &str) -> Result<Vec<Journey>, GeoveloError> {
        let raw: Vec<RawRoute> =
            serde_json::from_str(body).map_err(|e| GeoveloError::ParseError(e.to_string()))?;

        raw.into_iter()
            .take(1)
            .map(Self::convert_route)
            .collect()
    }

    /// Convert a raw route to a domain journey
    fn convert_route(raw: RawRoute) -> Result<Journey, GeoveloError> {
        let departure = parse_timestamp(raw.estimated_datetime_of_departure.as_deref())?;
        let arrival = parse_timestamp(raw.estimated_datetime_of_arrival.as_deref())?;

        let paths = raw
            .sections
            .into_iter()
            .map(|section| Self::convert_section(section, departure, arrival))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Journey::new(departure, arrival, paths))
    }

    /// Convert a raw section to a path segment
    ///
    /// Section times missing from the payload inherit the route-level times.
    fn convert_section(
        raw: RawSection,
        route_departure: RoutingDateTime,
        route_arrival: RoutingDateTime,
    ) -> Result<PathSegment, GeoveloError> {
        let departure = match raw.estimated_datetime_of_departure.as_deref() {
            Some(value) if !value.is_empty() => parse_timestamp(Some(value))?,
            _ => route_departure,
        };
        let arrival = match raw.estimated_datetime_of_arrival.as_deref() {
            Some(value) if !value.is_empty() => parse_timestamp(Some(value))?,
            _ => route_arrival,
        };

        let shape = match raw.geometry.as_deref() {
            Some(encoded) if !encoded.is_empty() => {
                polyline::decode(encoded, GEOMETRY_PRECISION)
                    .map_err(|e| GeoveloError::ParseError(e.to_string()))?
            },
            _ => raw
                .waypoints
                .unwrap_or_default()
                .into_iter()
                .map(RawWaypoint::into_location)
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mode = raw
            .transport_mode
            .unwrap_or_else(|| "BIKE".to_string())
            .to_lowercase();

        Ok(PathSegment {
            mode,
            shape,
            line: None,
            color: None,
            departure,
            arrival,
            co2_grams: 0.0,
        })
    }
}

#[async_trait]
impl BikeRouteClient for GeoveloHttpClient {
    #[instrument(skip(self), fields(%origin, %destination, %departure))]
    async fn compute_routes(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        departure: RoutingDateTime,
    ) -> Result<Vec<Journey>, GeoveloError> {
        let url = format!("{}/computedroutes", self.config.base_url);

        let payload = RouteRequest {
            waypoints: vec![
                RequestWaypoint {
                    latitude: origin.latitude(),
                    longitude: origin.longitude(),
                },
                RequestWaypoint {
                    latitude: destination.latitude(),
                    longitude: destination.longitude(),
                },
            ],
            datetime_of_departure: departure.to_string(),
            transport_modes: vec!["BIKE".to_string()],
        };

        debug!(?url, "Computing bike routes");

        let response = self
            .client
            .post(&url)
            .query(&QUERY_OPTIONS)
            .header("apikey", &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeoveloError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    GeoveloError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeoveloError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(GeoveloError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeoveloError::ParseError(e.to_string()))?;

        let journeys = Self::parse_routes_response(&body)?;

        if journeys.is_empty() {
            warn!("No bike routes found");
        }

        debug!(count = journeys.len(), "Bike routes found");
        Ok(journeys)
    }
}

fn parse_timestamp(raw: Option<&str>) -> Result<RoutingDateTime, GeoveloError> {
    let raw = raw
        .filter(|value| !value.is_empty())
        .ok_or_else(|| GeoveloError::ParseError("Missing route timestamp".to_string()))?;
    RoutingDateTime::parse_lenient(raw).map_err(|e| GeoveloError::ParseError(e.to_string()))
}

// --- Request payload types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRequest {
    waypoints: Vec<RequestWaypoint>,
    datetime_of_departure: String,
    transport_modes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RequestWaypoint {
    latitude: f64,
    longitude: f64,
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoute {
    estimated_datetime_of_departure: Option<String>,
    estimated_datetime_of_arrival: Option<String>,
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    transport_mode: Option<String>,
    geometry: Option<String>,
    estimated_datetime_of_departure: Option<String>,
    estimated_datetime_of_arrival: Option<String>,
    waypoints: Option<Vec<RawWaypoint>>,
}

/// Waypoint coordinates arrive as numbers or as quoted strings
#[derive(Debug, Deserialize)]
struct RawWaypoint {
    latitude: NumberOrText,
    longitude: NumberOrText,
}

impl RawWaypoint {
    fn into_location(self) -> Result<GeoLocation, GeoveloError> {
        let lat = self.latitude.as_f64()?;
        let lon = self.longitude.as_f64()?;
        GeoLocation::new(lat, lon).map_err(|e| GeoveloError::ParseError(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn as_f64(&self) -> Result<f64, GeoveloError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(value) => value
                .parse()
                .map_err(|_| GeoveloError::ParseError(format!("Invalid coordinate: {value}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_geometry() -> String {
        polyline::encode(
            &[
                GeoLocation::new_unchecked(48.85827, 2.33792),
                GeoLocation::new_unchecked(48.89000, 2.34500),
                GeoLocation::new_unchecked(48.92711, 2.35885),
            ],
            GEOMETRY_PRECISION,
        )
    }

    fn fixture_response(geometry: &str) -> String {
        format!(
            r#"[{{
                "estimatedDatetimeOfDeparture": "2025-11-21T07:30:00",
                "estimatedDatetimeOfArrival": "2025-11-21T08:05:00",
                "sections": [{{
                    "transportMode": "BIKE",
                    "geometry": "{geometry}",
                    "estimatedDatetimeOfDeparture": "2025-11-21T07:30:00",
                    "estimatedDatetimeOfArrival": "2025-11-21T08:05:00"
                }}]
            }}]"#
        )
    }

    #[test]
    fn test_parse_routes_response() {
        let json = fixture_response(&fixture_geometry());
        let journeys = GeoveloHttpClient::parse_routes_response(&json).unwrap();

        assert_eq!(journeys.len(), 1);
        let journey = &journeys[0];
        assert_eq!(journey.departure.to_string(), "20251121T073000");
        assert_eq!(journey.arrival.to_string(), "20251121T080500");
        assert_eq!(journey.paths.len(), 1);

        let path = &journey.paths[0];
        assert_eq!(path.mode, "bike");
        assert_eq!(path.shape.len(), 3);
        assert!((path.shape[0].latitude() - 48.85827).abs() < 1e-5);
        assert!((path.co2_grams).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_keeps_first_route_only() {
        let geometry = fixture_geometry();
        let single = fixture_response(&geometry);
        // Two identical routes in the array
        let json = format!("[{},{}]", &single[1..single.len() - 1], &single[1..single.len() - 1]);
        let journeys = GeoveloHttpClient::parse_routes_response(&json).unwrap();
        assert_eq!(journeys.len(), 1);
    }

    #[test]
    fn test_parse_waypoint_fallback_without_geometry() {
        let json = r#"[{
            "estimatedDatetimeOfDeparture": "2025-11-21 07:30:00",
            "estimatedDatetimeOfArrival": "2025-11-21 08:05:00",
            "sections": [{
                "transportMode": "BIKE",
                "waypoints": [
                    {"latitude": "48.85827", "longitude": "2.33792"},
                    {"latitude": 48.92711, "longitude": 2.35885}
                ]
            }]
        }]"#;

        let journeys = GeoveloHttpClient::parse_routes_response(json).unwrap();
        let path = &journeys[0].paths[0];
        assert_eq!(path.shape.len(), 2);
        assert!((path.shape[0].longitude() - 2.33792).abs() < 1e-9);
        // Section times missing: inherited from the route
        assert_eq!(path.departure, journeys[0].departure);
        assert_eq!(path.arrival, journeys[0].arrival);
    }

    #[test]
    fn test_parse_empty_array() {
        let journeys = GeoveloHttpClient::parse_routes_response("[]").unwrap();
        assert!(journeys.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(GeoveloHttpClient::parse_routes_response("not json").is_err());
    }

    #[test]
    fn test_parse_missing_route_times_is_error() {
        let json = r#"[{"sections": []}]"#;
        assert!(GeoveloHttpClient::parse_routes_response(json).is_err());
    }

    #[test]
    fn test_request_payload_shape() {
        let payload = RouteRequest {
            waypoints: vec![RequestWaypoint {
                latitude: 48.85827,
                longitude: 2.33792,
            }],
            datetime_of_departure: "20251121T073000".to_string(),
            transport_modes: vec!["BIKE".to_string()],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["datetimeOfDeparture"], "20251121T073000");
        assert_eq!(json["transportModes"][0], "BIKE");
        assert!((json["waypoints"][0]["latitude"].as_f64().unwrap() - 48.85827).abs() < 1e-9);
    }
}
