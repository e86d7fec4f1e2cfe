//! Journey aggregation, scoring and ranking
//!
//! Collects candidates from the five sources (direct transit, direct car,
//! direct bike, intermodal bike, intermodal car), derives CO2 totals, places
//! gift markers, sorts by ascending CO2 and re-encodes geometry for the wire.

use std::cmp::Ordering;
use std::sync::Arc;

use domain::{polyline, GiftMarker, Journey, ParkKind, GeoLocation, RoutingDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{BikeRoutingPort, CarRoutingPort, RoutingQuery, TransitRoutingPort};
use crate::services::gifts::place_gifts;
use crate::services::intermodal::IntermodalPlanner;
use crate::services::parking_index::ParkingIndex;

/// Gift quotas per candidate source; presentation hints only, never ranking
const GIFTS_DIRECT_TRANSIT: u32 = 5;
const GIFTS_DIRECT_CAR: u32 = 1;
const GIFTS_DIRECT_BIKE: u32 = 10;
const GIFTS_INTERMODAL_BIKE: u32 = 7;
const GIFTS_INTERMODAL_CAR: u32 = 3;

/// One leg of a ranked journey with wire-encoded geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedPath {
    /// Travel mode
    pub mode: String,
    /// Leg geometry as a 5-decimal encoded polyline
    pub shape: String,
    /// Line label for public transport legs
    pub line: Option<String>,
    /// Line color for public transport legs
    pub color: Option<String>,
    /// Leg departure time
    pub departure: RoutingDateTime,
    /// Leg arrival time
    pub arrival: RoutingDateTime,
    /// Leg CO2 in grams
    pub co2: f64,
}

/// A scored, gift-decorated journey as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJourney {
    /// Journey departure time
    pub departure: RoutingDateTime,
    /// Journey arrival time
    pub arrival: RoutingDateTime,
    /// Legs with encoded geometry
    pub paths: Vec<EncodedPath>,
    /// Total CO2 in grams (the ranking key)
    pub co2: f64,
    /// Gift quota of the journey's source
    pub number_of_gifts: u32,
    /// Markers placed along the geometry
    pub gifts: Vec<GiftMarker>,
}

impl RankedJourney {
    /// Encode a scored journey for the wire
    ///
    /// Geometry stays decoded through distance and gift computations and is
    /// only re-encoded here, at the very end.
    #[must_use]
    fn from_journey(journey: Journey) -> Self {
        let paths = journey
            .paths
            .into_iter()
            .map(|path| EncodedPath {
                mode: path.mode,
                shape: polyline::encode(&path.shape, polyline::RESPONSE_PRECISION),
                line: path.line,
                color: path.color,
                departure: path.departure,
                arrival: path.arrival,
                co2: path.co2_grams,
            })
            .collect();
        Self {
            departure: journey.departure,
            arrival: journey.arrival,
            paths,
            co2: journey.total_co2_grams,
            number_of_gifts: journey.gift_count,
            gifts: journey.gifts,
        }
    }
}

/// Aggregates, scores and ranks journey candidates from all sources
pub struct JourneyPlanner {
    bike: Arc<dyn BikeRoutingPort>,
    car: Arc<dyn CarRoutingPort>,
    transit: Arc<dyn TransitRoutingPort>,
    intermodal: IntermodalPlanner,
}

impl std::fmt::Debug for JourneyPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyPlanner").finish_non_exhaustive()
    }
}

impl JourneyPlanner {
    /// Create a planner over the three routing ports and the parking index
    #[must_use]
    pub fn new(
        bike: Arc<dyn BikeRoutingPort>,
        car: Arc<dyn CarRoutingPort>,
        transit: Arc<dyn TransitRoutingPort>,
        parking: Arc<ParkingIndex>,
    ) -> Self {
        let intermodal = IntermodalPlanner::new(
            Arc::clone(&bike),
            Arc::clone(&car),
            Arc::clone(&transit),
            parking,
        );
        Self {
            bike,
            car,
            transit,
            intermodal,
        }
    }

    /// Plan and rank all candidates for one origin/destination/datetime
    ///
    /// Source results are independent until aggregation, so the five sources
    /// fan out concurrently. A failed source contributes nothing: its error
    /// is logged and the remaining sources still rank. The result is sorted
    /// ascending by total CO2; the sort is stable and sources are aggregated
    /// in fixed order, so CO2 ties keep a deterministic order.
    #[instrument(skip(self), fields(%departure))]
    pub async fn plan(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        departure: RoutingDateTime,
    ) -> Vec<RankedJourney> {
        let query = RoutingQuery::new(origin, destination, departure);

        let (transit, car, bike, intermodal_bike, intermodal_car) = tokio::join!(
            self.transit.route(&query),
            self.car.route(&query),
            self.bike.route(&query),
            self.intermodal
                .plan(ParkKind::Bike, origin, destination, departure),
            self.intermodal
                .plan(ParkKind::Car, origin, destination, departure),
        );

        let mut candidates: Vec<Journey> = Vec::new();
        collect_source(&mut candidates, "transit", transit, GIFTS_DIRECT_TRANSIT);
        collect_source(&mut candidates, "car", car, GIFTS_DIRECT_CAR);
        collect_source(&mut candidates, "bike", bike, GIFTS_DIRECT_BIKE);
        collect_source(
            &mut candidates,
            "intermodal_bike",
            intermodal_bike,
            GIFTS_INTERMODAL_BIKE,
        );
        collect_source(
            &mut candidates,
            "intermodal_car",
            intermodal_car,
            GIFTS_INTERMODAL_CAR,
        );

        for journey in &mut candidates {
            journey.recompute_total_co2();
            let quota = journey.gift_count;
            place_gifts(journey, quota);
        }

        candidates.sort_by(|a, b| {
            a.total_co2_grams
                .partial_cmp(&b.total_co2_grams)
                .unwrap_or(Ordering::Equal)
        });

        info!(count = candidates.len(), "Ranked journey candidates");
        candidates
            .into_iter()
            .map(RankedJourney::from_journey)
            .collect()
    }
}

/// Append one source's contribution, tagging its gift quota
///
/// Provider failures never propagate past this point; partial data
/// availability is expected and the remaining sources must still rank.
fn collect_source(
    candidates: &mut Vec<Journey>,
    source: &str,
    result: Result<Vec<Journey>, ApplicationError>,
    quota: u32,
) {
    match result {
        Ok(journeys) => {
            for mut journey in journeys {
                journey.gift_count = quota;
                candidates.push(journey);
            }
        },
        Err(error) => {
            warn!(source, %error, "Source unavailable, excluded from ranking");
        },
    }
}

#[cfg(test)]
mod tests {
    use domain::PathSegment;

    use super::*;
    use crate::ports::{MockBikeRoutingPort, MockCarRoutingPort, MockTransitRoutingPort};

    const ORIGIN: GeoLocation = GeoLocation::new_unchecked(48.85827, 2.33792);
    const DESTINATION: GeoLocation = GeoLocation::new_unchecked(48.9271087, 2.3588523);

    fn ts(s: &str) -> RoutingDateTime {
        s.parse().expect("valid timestamp")
    }

    fn journey(mode: &str, co2: f64) -> Journey {
        let shape: Vec<_> = (0..10)
            .map(|i| GeoLocation::new_unchecked(48.86 + 0.007 * f64::from(i), 2.34))
            .collect();
        Journey::new(
            ts("20251121T073000"),
            ts("20251121T080000"),
            vec![PathSegment {
                mode: mode.to_string(),
                shape,
                line: None,
                color: None,
                departure: ts("20251121T073000"),
                arrival: ts("20251121T080000"),
                co2_grams: co2,
            }],
        )
    }

    fn planner_with(
        bike: MockBikeRoutingPort,
        car: MockCarRoutingPort,
        transit: MockTransitRoutingPort,
    ) -> JourneyPlanner {
        JourneyPlanner::new(
            Arc::new(bike),
            Arc::new(car),
            Arc::new(transit),
            Arc::new(ParkingIndex::default()),
        )
    }

    /// Direct calls happen once per source; the empty parking index keeps
    /// the intermodal chains from reaching the providers again.
    fn mocks(
        bike_result: Vec<Journey>,
        car_result: Vec<Journey>,
        transit_result: Vec<Journey>,
    ) -> (MockBikeRoutingPort, MockCarRoutingPort, MockTransitRoutingPort) {
        let mut bike = MockBikeRoutingPort::new();
        bike.expect_route().returning(move |_| Ok(bike_result.clone()));
        let mut car = MockCarRoutingPort::new();
        car.expect_route().returning(move |_| Ok(car_result.clone()));
        let mut transit = MockTransitRoutingPort::new();
        transit
            .expect_route()
            .returning(move |_| Ok(transit_result.clone()));
        (bike, car, transit)
    }

    #[tokio::test]
    async fn ranks_by_ascending_co2() {
        let (bike, car, transit) = mocks(
            vec![journey("bike", 0.0)],
            vec![journey("car", 960.0)],
            vec![journey("Metro", 150.0), journey("Bus", 90.0)],
        );
        let planner = planner_with(bike, car, transit);

        let ranked = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;

        assert_eq!(ranked.len(), 4);
        assert!(ranked.iter().all(|j| !j.paths.is_empty()));
        let co2: Vec<f64> = ranked.iter().map(|j| j.co2).collect();
        assert!(co2.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(ranked[0].paths[0].mode, "bike");
        assert!((ranked[3].co2 - 960.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn gift_quotas_follow_source() {
        let (bike, car, transit) = mocks(
            vec![journey("bike", 0.0)],
            vec![journey("car", 960.0)],
            vec![journey("Metro", 150.0)],
        );
        let planner = planner_with(bike, car, transit);

        let ranked = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;

        let quota_of = |mode: &str| {
            ranked
                .iter()
                .find(|j| j.paths[0].mode == mode)
                .map(|j| j.number_of_gifts)
        };
        assert_eq!(quota_of("bike"), Some(10));
        assert_eq!(quota_of("car"), Some(1));
        assert_eq!(quota_of("Metro"), Some(5));
    }

    #[tokio::test]
    async fn failed_source_is_excluded_not_fatal() {
        let mut bike = MockBikeRoutingPort::new();
        bike.expect_route()
            .returning(|_| Err(ApplicationError::ExternalService("HTTP 502".to_string())));
        let mut car = MockCarRoutingPort::new();
        car.expect_route().returning(|_| Ok(vec![journey("car", 960.0)]));
        let mut transit = MockTransitRoutingPort::new();
        transit.expect_route().returning(|_| Ok(Vec::new()));

        let planner = planner_with(bike, car, transit);
        let ranked = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].paths[0].mode, "car");
    }

    #[tokio::test]
    async fn all_sources_empty_is_empty_success() {
        let (bike, car, transit) = mocks(Vec::new(), Vec::new(), Vec::new());
        let planner = planner_with(bike, car, transit);
        let ranked = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn ranking_is_idempotent() {
        let (bike, car, transit) = mocks(
            vec![journey("bike", 0.0)],
            vec![journey("car", 960.0)],
            vec![journey("Metro", 150.0), journey("Tram", 150.0)],
        );
        let planner = planner_with(bike, car, transit);

        let first = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;
        let second = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;
        assert_eq!(first, second);

        // Stable sort keeps provider order on the CO2 tie
        let tie_modes: Vec<&str> = first
            .iter()
            .filter(|j| (j.co2 - 150.0).abs() < f64::EPSILON)
            .map(|j| j.paths[0].mode.as_str())
            .collect();
        assert_eq!(tie_modes, vec!["Metro", "Tram"]);
    }

    #[tokio::test]
    async fn shapes_are_encoded_for_the_wire() {
        let (bike, car, transit) = mocks(vec![journey("bike", 0.0)], Vec::new(), Vec::new());
        let planner = planner_with(bike, car, transit);

        let ranked = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;
        assert_eq!(ranked.len(), 1);

        let encoded = &ranked[0].paths[0].shape;
        let decoded =
            polyline::decode(encoded, polyline::RESPONSE_PRECISION).expect("valid polyline");
        assert_eq!(decoded.len(), 10);
        assert!((decoded[0].latitude() - 48.86).abs() < 1e-5);
    }

    #[tokio::test]
    async fn gifts_are_placed_along_geometry() {
        let (bike, car, transit) = mocks(vec![journey("bike", 0.0)], Vec::new(), Vec::new());
        let planner = planner_with(bike, car, transit);

        let ranked = planner.plan(ORIGIN, DESTINATION, ts("20251121T073000")).await;
        let journey = &ranked[0];
        assert!(!journey.gifts.is_empty());
        assert!(journey.gifts.len() <= journey.number_of_gifts as usize);
        assert_eq!(journey.gifts[0].id, "gift_1");
    }
}
