//! Journey, path segment and gift marker entities
//!
//! A `Journey` is one complete candidate trip from origin to destination,
//! composed of ordered single-mode `PathSegment`s. Journeys are built fresh
//! per request from provider responses and never mutated afterwards, except
//! for the derived fields (`total_co2_grams`, `gifts`) computed once by the
//! planner.

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, RoutingDateTime};

/// One continuous leg of travel in a single mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Travel mode (`bike`, `car`, `walking`, or a commercial transit mode)
    pub mode: String,
    /// Ordered decoded geometry of the leg
    pub shape: Vec<GeoLocation>,
    /// Line label for public transport legs (e.g. `"14"`)
    pub line: Option<String>,
    /// Line color for public transport legs
    pub color: Option<String>,
    /// Departure time of the leg
    pub departure: RoutingDateTime,
    /// Arrival time of the leg
    pub arrival: RoutingDateTime,
    /// CO2 emitted over the leg, in grams
    pub co2_grams: f64,
}

impl PathSegment {
    /// Straight-line distance between the leg's first and last point, meters
    ///
    /// Zero when the shape has fewer than two points.
    #[must_use]
    pub fn endpoint_distance_meters(&self) -> f64 {
        match (self.shape.first(), self.shape.last()) {
            (Some(first), Some(last)) if self.shape.len() >= 2 => first.distance_meters(last),
            _ => 0.0,
        }
    }
}

/// A gamification waypoint placed along a journey's geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftMarker {
    /// Marker identifier (`gift_1`, `gift_2`, ...)
    pub id: String,
    /// Marker position
    #[serde(flatten)]
    pub location: GeoLocation,
}

/// One complete candidate trip from origin to destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    /// Departure time of the first leg
    pub departure: RoutingDateTime,
    /// Arrival time of the last leg
    pub arrival: RoutingDateTime,
    /// Ordered legs; non-empty, best-effort chronologically contiguous
    pub paths: Vec<PathSegment>,
    /// Sum of the legs' CO2 in grams; recomputed whenever paths change
    pub total_co2_grams: f64,
    /// Gift quota for this journey's source (presentation hint, not ranking)
    pub gift_count: u32,
    /// Markers placed along the geometry by the planner
    pub gifts: Vec<GiftMarker>,
}

impl Journey {
    /// Build a journey from its legs, deriving the CO2 total
    #[must_use]
    pub fn new(
        departure: RoutingDateTime,
        arrival: RoutingDateTime,
        paths: Vec<PathSegment>,
    ) -> Self {
        let mut journey = Self {
            departure,
            arrival,
            paths,
            total_co2_grams: 0.0,
            gift_count: 0,
            gifts: Vec::new(),
        };
        journey.recompute_total_co2();
        journey
    }

    /// Chain two journeys: first leg set, then second leg set
    ///
    /// Departure comes from the first journey, arrival from the second.
    #[must_use]
    pub fn chain(first: Self, second: Self) -> Self {
        let mut paths = first.paths;
        paths.extend(second.paths);
        Self::new(first.departure, second.arrival, paths)
    }

    /// Re-derive `total_co2_grams` from the current paths
    pub fn recompute_total_co2(&mut self) {
        self.total_co2_grams = self.paths.iter().map(|p| p.co2_grams).sum();
    }
}
