//! Parking facility CSV loader
//!
//! Reads the Île-de-France Mobilités open-data exports: semicolon-delimited
//! CSV with a header row, a `"lat, lon"` geopoint in the first column and
//! the facility identifier in the third. Malformed rows are skipped, not
//! fatal; the exports routinely contain entries without coordinates.

use std::path::Path;

use csv::ReaderBuilder;
use domain::{GeoLocation, ParkKind, ParkingFacility};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ParkingConfig;
use application::ParkingIndex;

/// Errors that can occur while loading parking data
#[derive(Debug, Error)]
pub enum ParkingDataError {
    /// The CSV file could not be opened or read
    #[error("Failed to read parking data: {0}")]
    Read(#[from] csv::Error),
}

/// Load all facilities of one kind from a CSV export
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a record cannot be
/// read. Rows that read fine but do not parse as a facility are skipped.
pub fn load_facilities(
    path: &Path,
    kind: ParkKind,
) -> Result<Vec<ParkingFacility>, ParkingDataError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut facilities = Vec::new();
    let mut skipped = 0_usize;

    for record in reader.records() {
        let record = record?;
        match parse_record(&record, kind) {
            Some(facility) => facilities.push(facility),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(%kind, skipped, "Skipped malformed parking rows");
    }
    info!(%kind, count = facilities.len(), path = %path.display(), "Loaded parking facilities");
    Ok(facilities)
}

/// Load both exports and build the in-memory index
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn load_index(config: &ParkingConfig) -> Result<ParkingIndex, ParkingDataError> {
    let mut facilities = load_facilities(Path::new(&config.bike_csv_path), ParkKind::Bike)?;
    facilities.extend(load_facilities(
        Path::new(&config.car_csv_path),
        ParkKind::Car,
    )?);
    Ok(ParkingIndex::new(facilities))
}

/// Parse one record; `None` when the row is unusable
fn parse_record(record: &csv::StringRecord, kind: ParkKind) -> Option<ParkingFacility> {
    let geopoint = record.get(0)?;
    let id = record.get(2)?;
    if id.is_empty() {
        return None;
    }

    let (lat, lon) = geopoint.split_once(", ")?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    let location = GeoLocation::new(lat, lon).ok()?;

    Some(ParkingFacility {
        id: id.to_string(),
        location,
        kind,
    })
}
