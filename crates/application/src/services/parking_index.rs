//! Nearby-parking index
//!
//! Read-only in-memory index over the parking facilities loaded at startup.
//! Constructed once, injected by ownership into the planners; there is no
//! process-wide mutable state. Distances are great-circle and advisory: they
//! only bound provider-call fan-out.

use domain::{GeoLocation, ParkKind, ParkingFacility};

/// Minimum park-and-ride detour for bikes, meters
const BIKE_MIN_DISTANCE_M: f64 = 2_000.0;
/// Minimum park-and-ride detour for cars, meters
const CAR_MIN_DISTANCE_M: f64 = 5_000.0;

/// A `[min, max]` search distance band around a journey origin
///
/// The lower bound skips facilities within comfortable reach of the origin;
/// the upper bound is a mode-specific fraction of the straight-line
/// origin-destination distance, since a car justifies a longer detour than
/// a bike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBand {
    /// Lower bound in meters (inclusive)
    pub min_meters: f64,
    /// Upper bound in meters (inclusive)
    pub max_meters: f64,
}

impl SearchBand {
    /// Derive the band for a mode from the origin-destination distance
    #[must_use]
    pub fn for_kind(kind: ParkKind, od_distance_meters: f64) -> Self {
        match kind {
            ParkKind::Bike => Self {
                min_meters: BIKE_MIN_DISTANCE_M,
                max_meters: od_distance_meters / 2.0,
            },
            ParkKind::Car => Self {
                min_meters: CAR_MIN_DISTANCE_M,
                max_meters: od_distance_meters / 3.0 * 2.0,
            },
        }
    }

    /// An inverted band means no facility can qualify
    #[must_use]
    pub fn is_viable(&self) -> bool {
        self.max_meters >= self.min_meters
    }
}

/// In-memory index of parking facilities, split by kind
#[derive(Debug, Default)]
pub struct ParkingIndex {
    bike: Vec<ParkingFacility>,
    car: Vec<ParkingFacility>,
}

impl ParkingIndex {
    /// Build the index, partitioning facilities by kind
    #[must_use]
    pub fn new(facilities: Vec<ParkingFacility>) -> Self {
        let (bike, car) = facilities
            .into_iter()
            .partition(|f| f.kind == ParkKind::Bike);
        Self { bike, car }
    }

    /// Number of indexed facilities of a kind
    #[must_use]
    pub fn count(&self, kind: ParkKind) -> usize {
        self.of_kind(kind).len()
    }

    /// All facilities of `kind` whose distance from `center` falls in the band
    #[must_use]
    pub fn within_band(
        &self,
        kind: ParkKind,
        center: &GeoLocation,
        band: &SearchBand,
    ) -> Vec<&ParkingFacility> {
        if !band.is_viable() {
            return Vec::new();
        }
        self.of_kind(kind)
            .iter()
            .filter(|facility| {
                let distance = facility.location.distance_meters(center);
                distance >= band.min_meters && distance <= band.max_meters
            })
            .collect()
    }

    /// The candidate nearest to `target`; first-encountered wins ties
    #[must_use]
    pub fn nearest_to<'a>(
        candidates: &[&'a ParkingFacility],
        target: &GeoLocation,
    ) -> Option<&'a ParkingFacility> {
        let mut nearest: Option<&ParkingFacility> = None;
        let mut min_distance = f64::INFINITY;
        for facility in candidates {
            let distance = facility.location.distance_meters(target);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(facility);
            }
        }
        nearest
    }

    fn of_kind(&self, kind: ParkKind) -> &[ParkingFacility] {
        match kind {
            ParkKind::Bike => &self.bike,
            ParkKind::Car => &self.car,
        }
    }
}
