//! Intermodal (park-and-ride) journey composition
//!
//! Builds a two-leg candidate: personal vehicle to a parking facility, then
//! public transit from the facility to the destination. Any missing leg
//! anywhere in the chain drops the whole candidate; partial intermodal
//! journeys are never surfaced.

use std::sync::Arc;

use domain::{GeoLocation, Journey, ParkKind, RoutingDateTime};
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::{BikeRoutingPort, CarRoutingPort, RoutingQuery, TransitRoutingPort};
use crate::services::parking_index::{ParkingIndex, SearchBand};

/// Composes vehicle-plus-transit journeys around a parking facility
pub struct IntermodalPlanner {
    bike: Arc<dyn BikeRoutingPort>,
    car: Arc<dyn CarRoutingPort>,
    transit: Arc<dyn TransitRoutingPort>,
    parking: Arc<ParkingIndex>,
}

impl std::fmt::Debug for IntermodalPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntermodalPlanner")
            .field("parking", &self.parking)
            .finish_non_exhaustive()
    }
}

impl IntermodalPlanner {
    /// Create a planner over the routing ports and the parking index
    #[must_use]
    pub fn new(
        bike: Arc<dyn BikeRoutingPort>,
        car: Arc<dyn CarRoutingPort>,
        transit: Arc<dyn TransitRoutingPort>,
        parking: Arc<ParkingIndex>,
    ) -> Self {
        Self {
            bike,
            car,
            transit,
            parking,
        }
    }

    /// Plan the intermodal candidate for one vehicle kind
    ///
    /// Returns an empty list whenever any stage yields no viable option:
    /// inverted search band, no facility in the band, or either leg missing.
    /// The band check runs before any provider call.
    ///
    /// # Errors
    ///
    /// Propagates provider errors; the aggregator converts them into an
    /// empty contribution with a log line.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn plan(
        &self,
        kind: ParkKind,
        origin: GeoLocation,
        destination: GeoLocation,
        departure: RoutingDateTime,
    ) -> Result<Vec<Journey>, ApplicationError> {
        let od_distance = origin.distance_meters(&destination);
        let band = SearchBand::for_kind(kind, od_distance);
        if !band.is_viable() {
            debug!(od_distance, "Search band inverted, skipping intermodal");
            return Ok(Vec::new());
        }

        let candidates = self.parking.within_band(kind, &origin, &band);
        debug!(count = candidates.len(), "Facilities in search band");
        // Among facilities convenient to leave from, the best one is the one
        // closest to where the traveler is ultimately headed.
        let Some(facility) = ParkingIndex::nearest_to(&candidates, &destination) else {
            return Ok(Vec::new());
        };

        let first_query = RoutingQuery::new(origin, facility.location, departure);
        let first_legs = match kind {
            ParkKind::Bike => self.bike.route(&first_query).await?,
            ParkKind::Car => self.car.route(&first_query).await?,
        };
        let Some(first_leg) = first_legs.into_iter().next() else {
            debug!(facility = %facility.id, "No vehicle leg to facility");
            return Ok(Vec::new());
        };

        // Legs are chained in time: the transit leg departs when the vehicle
        // leg arrives at the facility.
        let second_query =
            RoutingQuery::new(facility.location, destination, first_leg.arrival);
        let second_legs = self.transit.route(&second_query).await?;
        let Some(second_leg) = second_legs.into_iter().next() else {
            debug!(facility = %facility.id, "No transit leg from facility");
            return Ok(Vec::new());
        };

        Ok(vec![Journey::chain(first_leg, second_leg)])
    }
}
