//! Journey planning handler
//!
//! Accepts an origin, a destination, and a departure time; each endpoint of
//! the trip may be given as coordinates (numbers or quoted strings) or as a
//! free-text address that is geocoded server-side.

use application::ports::GeocodingPort;
use axum::Json;
use axum::extract::State;
use domain::{GeoLocation, RoutingDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Journey planning request body
#[derive(Debug, Deserialize)]
pub struct JourneyRequest {
    /// Trip origin
    pub from: Option<LocationInput>,
    /// Trip destination
    pub to: Option<LocationInput>,
    /// Departure time, `YYYYMMDDTHHMMSS` or ISO-8601
    pub datetime: Option<String>,
}

/// One endpoint of the trip
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    /// Explicit coordinates; values may be JSON numbers or quoted strings
    Coordinates {
        lat: CoordinateValue,
        lon: CoordinateValue,
    },
    /// Free-text address, resolved through the geocoder
    Address { address: String },
}

/// A coordinate given as a number or as a quoted string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    fn as_f64(&self) -> Result<f64, ApiError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(value) => value
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("Invalid coordinate: {value}"))),
        }
    }
}

impl LocationInput {
    /// Resolve the input to coordinates, geocoding when needed
    async fn resolve(&self, geocoding: &dyn GeocodingPort) -> Result<GeoLocation, ApiError> {
        match self {
            Self::Coordinates { lat, lon } => {
                GeoLocation::new(lat.as_f64()?, lon.as_f64()?)
                    .map_err(|e| ApiError::BadRequest(e.to_string()))
            },
            Self::Address { address } => Ok(geocoding.geocode(address).await?),
        }
    }
}

/// Journey planning response body
#[derive(Debug, Serialize)]
pub struct JourneysResponse {
    pub success: bool,
    pub journeys: Vec<application::services::RankedJourney>,
}

/// Plan and rank journeys between two points
///
/// All sources failing to produce a candidate is a successful empty result,
/// not an error.
#[instrument(skip_all)]
pub async fn plan_journeys(
    State(state): State<AppState>,
    Json(request): Json<JourneyRequest>,
) -> Result<Json<JourneysResponse>, ApiError> {
    let (from, to, datetime) = validate(request)?;

    let origin = from.resolve(state.geocoding.as_ref()).await?;
    let destination = to.resolve(state.geocoding.as_ref()).await?;
    let departure = RoutingDateTime::parse_lenient(&datetime)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    info!(%origin, %destination, %departure, "Planning journeys");
    let journeys = state.planner.plan(origin, destination, departure).await;
    info!(count = journeys.len(), "Journeys planned");

    Ok(Json(JourneysResponse {
        success: true,
        journeys,
    }))
}

/// Reject requests missing any of the three required fields
fn validate(request: JourneyRequest) -> Result<(LocationInput, LocationInput, String), ApiError> {
    let JourneyRequest { from, to, datetime } = request;
    match (from, to, datetime) {
        (Some(from), Some(to), Some(datetime)) => Ok((from, to, datetime)),
        _ => Err(ApiError::BadRequest(
            "Missing required fields: 'from', 'to', and 'datetime' are required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_input_accepts_numeric_coordinates() {
        let json = r#"{"lat": 48.85827, "lon": 2.33792}"#;
        let input: LocationInput = serde_json::from_str(json).unwrap();
        assert!(matches!(input, LocationInput::Coordinates { .. }));
    }

    #[test]
    fn location_input_accepts_string_coordinates() {
        let json = r#"{"lat": "48.85827", "lon": "2.33792"}"#;
        let input: LocationInput = serde_json::from_str(json).unwrap();
        let LocationInput::Coordinates { lat, lon } = input else {
            panic!("expected coordinates");
        };
        assert!((lat.as_f64().unwrap() - 48.85827).abs() < 1e-9);
        assert!((lon.as_f64().unwrap() - 2.33792).abs() < 1e-9);
    }

    #[test]
    fn location_input_accepts_address() {
        let json = r#"{"address": "Gare de Lyon, Paris"}"#;
        let input: LocationInput = serde_json::from_str(json).unwrap();
        assert!(matches!(input, LocationInput::Address { .. }));
    }

    #[test]
    fn coordinate_value_rejects_garbage_text() {
        let value = CoordinateValue::Text("not-a-number".to_string());
        assert!(value.as_f64().is_err());
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let request = JourneyRequest {
            from: None,
            to: Some(LocationInput::Address {
                address: "somewhere".to_string(),
            }),
            datetime: Some("20251121T073000".to_string()),
        };
        assert!(validate(request).is_err());
    }
}
