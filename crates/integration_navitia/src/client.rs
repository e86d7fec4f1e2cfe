//! Navitia journeys client
//!
//! Requests public-transit itineraries between two coordinates. Only
//! public-transport and street-network sections are kept; journeys that
//! amount to a single long walk are dropped entirely.

use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoLocation, Journey, PathSegment, RoutingDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::NavitiaConfig;
use crate::error::NavitiaError;

/// Section types carried over into journeys
const KEPT_SECTION_TYPES: [&str; 2] = ["public_transport", "street_network"];

/// Trait for public transit routing clients
#[async_trait]
pub trait TransitRouteClient: Send + Sync {
    /// Compute transit itineraries between two coordinate pairs
    async fn compute_journeys(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        departure: RoutingDateTime,
    ) -> Result<Vec<Journey>, NavitiaError>;
}

/// Navitia-backed transit routing client
#[derive(Debug)]
pub struct NavitiaHttpClient {
    client: Client,
    config: NavitiaConfig,
}

impl NavitiaHttpClient {
    /// Create a new Navitia client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NavitiaConfig) -> Result<Self, NavitiaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Verdiroute/1.0")
            .build()
            .map_err(|e| NavitiaError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse the raw journeys response into domain journeys
    fn parse_journeys_response(
        body: &str,
        max_walking_only_meters: f64,
    ) -> Result<Vec<Journey>, NavitiaError> {
        let raw: RawJourneysResponse =
            serde_json::from_str(body).map_err(|e| NavitiaError::ParseError(e.to_string()))?;

        let mut journeys = Vec::new();
        for raw_journey in raw.journeys {
            if let Some(journey) = Self::convert_journey(raw_journey, max_walking_only_meters)? {
                journeys.push(journey);
            }
        }
        Ok(journeys)
    }

    /// Convert a raw journey, or drop it when it is a single long walk
    fn convert_journey(
        raw: RawJourney,
        max_walking_only_meters: f64,
    ) -> Result<Option<Journey>, NavitiaError> {
        let departure = parse_timestamp(raw.departure_date_time.as_deref())?;
        let arrival = parse_timestamp(raw.arrival_date_time.as_deref())?;

        let section_count = raw.sections.len();
        let paths = raw
            .sections
            .into_iter()
            .filter(|section| {
                section
                    .section_type
                    .as_deref()
                    .is_some_and(|t| KEPT_SECTION_TYPES.contains(&t))
            })
            .map(Self::convert_section)
            .collect::<Result<Vec<_>, _>>()?;

        if is_walking_only(&paths, section_count)
            && walking_distance(raw.distances.as_ref()) > max_walking_only_meters
        {
            debug!("Dropping walking-only journey over distance limit");
            return Ok(None);
        }

        Ok(Some(Journey::new(departure, arrival, paths)))
    }

    /// Convert a raw section to a path segment
    fn convert_section(raw: RawSection) -> Result<PathSegment, NavitiaError> {
        let departure = parse_timestamp(raw.departure_date_time.as_deref())?;
        let arrival = parse_timestamp(raw.arrival_date_time.as_deref())?;

        let shape = raw
            .geojson
            .map(|geojson| convert_coordinates(geojson.coordinates))
            .transpose()?
            .unwrap_or_default();

        let co2_grams = raw
            .co2_emission
            .and_then(|emission| emission.value)
            .unwrap_or(0.0);

        // Street-network sections keep their mode; public-transport sections
        // take their label, code, and color from the display informations.
        let mut mode = raw
            .mode
            .or_else(|| raw.section_type.clone())
            .unwrap_or_default();
        let mut line = None;
        let mut color = None;
        if raw.section_type.as_deref() == Some("public_transport") {
            let display = raw.display_informations.unwrap_or_default();
            if let Some(commercial_mode) = display.commercial_mode {
                mode = commercial_mode;
            }
            line = display.code;
            color = display.color;
        }

        Ok(PathSegment {
            mode,
            shape,
            line,
            color,
            departure,
            arrival,
            co2_grams,
        })
    }
}

#[async_trait]
impl TransitRouteClient for NavitiaHttpClient {
    #[instrument(skip(self), fields(%origin, %destination, %departure))]
    async fn compute_journeys(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        departure: RoutingDateTime,
    ) -> Result<Vec<Journey>, NavitiaError> {
        let url = format!("{}/v2/navitia/journeys", self.config.base_url);

        // Navitia expects "lon;lat" coordinate pairs
        let params = [
            (
                "from",
                format!("{};{}", origin.longitude(), origin.latitude()),
            ),
            (
                "to",
                format!("{};{}", destination.longitude(), destination.latitude()),
            ),
            ("datetime", departure.to_string()),
        ];

        debug!(?url, "Computing transit journeys");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("apikey", &self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NavitiaError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    NavitiaError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NavitiaError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(NavitiaError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NavitiaError::ParseError(e.to_string()))?;

        let journeys =
            Self::parse_journeys_response(&body, self.config.max_walking_only_meters)?;

        if journeys.is_empty() {
            warn!("No transit journeys found");
        }

        debug!(count = journeys.len(), "Transit journeys found");
        Ok(journeys)
    }
}

fn parse_timestamp(raw: Option<&str>) -> Result<RoutingDateTime, NavitiaError> {
    let raw = raw
        .filter(|value| !value.is_empty())
        .ok_or_else(|| NavitiaError::ParseError("Missing journey timestamp".to_string()))?;
    RoutingDateTime::parse_lenient(raw).map_err(|e| NavitiaError::ParseError(e.to_string()))
}

/// A journey reduced to one walking path from one original section
fn is_walking_only(paths: &[PathSegment], section_count: usize) -> bool {
    section_count == 1 && paths.len() == 1 && paths[0].mode == "walking"
}

/// Walking distance of a journey; the total wins unless it is absent or zero
fn walking_distance(distances: Option<&RawDistances>) -> f64 {
    let Some(distances) = distances else {
        return 0.0;
    };
    match distances.total {
        Some(total) if total > 0.0 => total,
        _ => distances.walking.unwrap_or(0.0),
    }
}

/// Convert Navitia `[lon, lat]` coordinate pairs to locations
fn convert_coordinates(coordinates: Vec<Vec<f64>>) -> Result<Vec<GeoLocation>, NavitiaError> {
    coordinates
        .into_iter()
        .map(|pair| {
            let (&lon, &lat) = pair.first().zip(pair.get(1)).ok_or_else(|| {
                NavitiaError::ParseError("Coordinate pair too short".to_string())
            })?;
            GeoLocation::new(lat, lon).map_err(|e| NavitiaError::ParseError(e.to_string()))
        })
        .collect()
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawJourneysResponse {
    #[serde(default)]
    journeys: Vec<RawJourney>,
}

#[derive(Debug, Deserialize)]
struct RawJourney {
    departure_date_time: Option<String>,
    arrival_date_time: Option<String>,
    #[serde(default)]
    sections: Vec<RawSection>,
    distances: Option<RawDistances>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(rename = "type")]
    section_type: Option<String>,
    mode: Option<String>,
    departure_date_time: Option<String>,
    arrival_date_time: Option<String>,
    geojson: Option<RawGeojson>,
    co2_emission: Option<RawCo2Emission>,
    display_informations: Option<RawDisplayInformations>,
}

#[derive(Debug, Deserialize)]
struct RawGeojson {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawCo2Emission {
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDisplayInformations {
    commercial_mode: Option<String>,
    code: Option<String>,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDistances {
    total: Option<f64>,
    walking: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "journeys": [{
            "departure_date_time": "20251121T073000",
            "arrival_date_time": "20251121T081500",
            "distances": { "total": 9200, "walking": 450 },
            "sections": [
                {
                    "type": "street_network",
                    "mode": "walking",
                    "departure_date_time": "20251121T073000",
                    "arrival_date_time": "20251121T073500",
                    "geojson": { "coordinates": [[2.33792, 48.85827], [2.33850, 48.86000]] },
                    "co2_emission": { "value": 0 }
                },
                {
                    "type": "waiting",
                    "departure_date_time": "20251121T073500",
                    "arrival_date_time": "20251121T074000"
                },
                {
                    "type": "public_transport",
                    "departure_date_time": "20251121T074000",
                    "arrival_date_time": "20251121T081000",
                    "geojson": { "coordinates": [[2.33850, 48.86000], [2.35885, 48.92711]] },
                    "co2_emission": { "value": 152.4 },
                    "display_informations": {
                        "commercial_mode": "Métro",
                        "code": "4",
                        "color": "BB4D98"
                    }
                }
            ]
        }]
    }"#;

    #[test]
    fn test_parse_journeys_response() {
        let journeys = NavitiaHttpClient::parse_journeys_response(FIXTURE, 1000.0).unwrap();

        assert_eq!(journeys.len(), 1);
        let journey = &journeys[0];
        assert_eq!(journey.departure.to_string(), "20251121T073000");
        assert_eq!(journey.arrival.to_string(), "20251121T081500");
        // The waiting section is filtered out
        assert_eq!(journey.paths.len(), 2);

        let walk = &journey.paths[0];
        assert_eq!(walk.mode, "walking");
        assert!(walk.line.is_none());
        assert!(walk.co2_grams.abs() < f64::EPSILON);

        let metro = &journey.paths[1];
        assert_eq!(metro.mode, "Métro");
        assert_eq!(metro.line.as_deref(), Some("4"));
        assert_eq!(metro.color.as_deref(), Some("BB4D98"));
        assert!((metro.co2_grams - 152.4).abs() < 1e-9);
        assert!((metro.shape[1].latitude() - 48.92711).abs() < 1e-9);
    }

    fn walking_only_fixture(total: f64) -> String {
        format!(
            r#"{{
                "journeys": [{{
                    "departure_date_time": "20251121T073000",
                    "arrival_date_time": "20251121T075000",
                    "distances": {{ "total": {total}, "walking": {total} }},
                    "sections": [{{
                        "type": "street_network",
                        "mode": "walking",
                        "departure_date_time": "20251121T073000",
                        "arrival_date_time": "20251121T075000",
                        "geojson": {{ "coordinates": [[2.33792, 48.85827], [2.34, 48.87]] }}
                    }}]
                }}]
            }}"#
        )
    }

    #[test]
    fn test_long_walking_only_journey_is_dropped() {
        let json = walking_only_fixture(1800.0);
        let journeys = NavitiaHttpClient::parse_journeys_response(&json, 1000.0).unwrap();
        assert!(journeys.is_empty());
    }

    #[test]
    fn test_short_walking_only_journey_is_kept() {
        let json = walking_only_fixture(800.0);
        let journeys = NavitiaHttpClient::parse_journeys_response(&json, 1000.0).unwrap();
        assert_eq!(journeys.len(), 1);
    }

    #[test]
    fn test_walking_limit_is_not_strict() {
        // Exactly at the limit stays in
        let json = walking_only_fixture(1000.0);
        let journeys = NavitiaHttpClient::parse_journeys_response(&json, 1000.0).unwrap();
        assert_eq!(journeys.len(), 1);
    }

    #[test]
    fn test_walking_distance_falls_back_when_total_zero() {
        let distances = RawDistances {
            total: Some(0.0),
            walking: Some(1500.0),
        };
        assert!((walking_distance(Some(&distances)) - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_empty_journeys() {
        let journeys =
            NavitiaHttpClient::parse_journeys_response(r#"{"journeys": []}"#, 1000.0).unwrap();
        assert!(journeys.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(NavitiaHttpClient::parse_journeys_response("not json", 1000.0).is_err());
    }

    #[test]
    fn test_parse_missing_journey_times_is_error() {
        let json = r#"{"journeys": [{"sections": []}]}"#;
        assert!(NavitiaHttpClient::parse_journeys_response(json, 1000.0).is_err());
    }
}
