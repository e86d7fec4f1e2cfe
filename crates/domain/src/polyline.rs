//! Polyline geometry codec
//!
//! Encodes and decodes the Google encoded-polyline format. The bike provider
//! ships geometry at 6-decimal precision, while responses to callers use the
//! conventional 5-decimal precision, so both functions take the precision as
//! a parameter (number of decimal digits).

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// Precision used by responses returned to callers
pub const RESPONSE_PRECISION: u32 = 5;

/// Decode an encoded polyline into an ordered coordinate sequence
///
/// # Errors
///
/// Returns `DomainError::InvalidPolyline` on truncated or out-of-alphabet
/// input, or when a decoded point falls outside valid coordinate ranges.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<GeoLocation>, DomainError> {
    let factor = 10_f64.powi(precision.try_into().unwrap_or(5));
    let mut points = Vec::new();
    let mut bytes = encoded.bytes();
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    loop {
        let Some(lat_delta) = next_delta(&mut bytes)? else {
            break;
        };
        let Some(lon_delta) = next_delta(&mut bytes)? else {
            return Err(DomainError::InvalidPolyline(
                "odd number of values".to_string(),
            ));
        };
        lat += lat_delta;
        lon += lon_delta;
        points.push(GeoLocation::new(lat as f64 / factor, lon as f64 / factor)?);
    }

    Ok(points)
}

/// Encode an ordered coordinate sequence into a polyline string
#[must_use]
pub fn encode(points: &[GeoLocation], precision: u32) -> String {
    let factor = 10_f64.powi(precision.try_into().unwrap_or(5));
    let mut out = String::with_capacity(points.len() * 6);
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for point in points {
        #[allow(clippy::cast_possible_truncation)]
        let lat = (point.latitude() * factor).round() as i64;
        #[allow(clippy::cast_possible_truncation)]
        let lon = (point.longitude() * factor).round() as i64;
        push_value(lat - prev_lat, &mut out);
        push_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

/// Read one zigzag-encoded delta from the byte stream
///
/// `Ok(None)` means the stream ended cleanly between values.
fn next_delta(bytes: &mut impl Iterator<Item = u8>) -> Result<Option<i64>, DomainError> {
    let mut result: i64 = 0;
    let mut shift = 0u32;
    let mut started = false;

    loop {
        let Some(byte) = bytes.next() else {
            if started {
                return Err(DomainError::InvalidPolyline("truncated value".to_string()));
            }
            return Ok(None);
        };
        if !(63..=127).contains(&byte) {
            return Err(DomainError::InvalidPolyline(format!(
                "byte {byte} outside polyline alphabet"
            )));
        }
        started = true;
        if shift > 60 {
            return Err(DomainError::InvalidPolyline("value too long".to_string()));
        }
        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk & 0x20 == 0 {
            let delta = if result & 1 == 1 {
                !(result >> 1)
            } else {
                result >> 1
            };
            return Ok(Some(delta));
        }
    }
}

/// Append one zigzag-encoded value to the output string
fn push_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        out.push(((0x20 | (v & 0x1f)) as u8 + 63) as char);
        v >>= 5;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    out.push((v as u8 + 63) as char);
}
