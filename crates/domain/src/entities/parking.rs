//! Parking facility entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// Kind of vehicle a parking facility accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkKind {
    /// Bike racks and shelters
    Bike,
    /// Park-and-ride car parks
    Car,
}

impl fmt::Display for ParkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bike => write!(f, "bike"),
            Self::Car => write!(f, "car"),
        }
    }
}

/// A parking facility loaded once at startup and read-only thereafter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingFacility {
    /// Facility identifier from the source dataset
    pub id: String,
    /// Facility position
    pub location: GeoLocation,
    /// Accepted vehicle kind
    pub kind: ParkKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(ParkKind::Bike.to_string(), "bike");
        assert_eq!(ParkKind::Car.to_string(), "car");
    }

    #[test]
    fn kind_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ParkKind::Bike).expect("serialize"),
            "\"bike\""
        );
        let kind: ParkKind = serde_json::from_str("\"car\"").expect("deserialize");
        assert_eq!(kind, ParkKind::Car);
    }
}
