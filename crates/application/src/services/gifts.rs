//! Gift marker placement
//!
//! Distributes a journey's gift quota along its geometry at regular distance
//! intervals. The reference distance is the sum of each path's straight-line
//! start-to-end distance, not the cumulative polyline length, so markers
//! thin out on winding legs.

use domain::{GiftMarker, Journey};

/// Place up to `quota` gift markers along the journey's flattened geometry
///
/// Sets `gift_count` and replaces `gifts`. Walks consecutive points
/// accumulating great-circle distances; every time the accumulator exceeds
/// the interval `total / (quota + 1)`, a marker is emitted at the current
/// point and the interval subtracted, carrying the remainder forward.
pub fn place_gifts(journey: &mut Journey, quota: u32) {
    journey.gift_count = quota;
    journey.gifts = Vec::new();

    if quota == 0 || journey.paths.is_empty() {
        return;
    }

    let total_distance: f64 = journey
        .paths
        .iter()
        .map(domain::PathSegment::endpoint_distance_meters)
        .sum();
    if total_distance <= 0.0 {
        return;
    }

    let points: Vec<_> = journey
        .paths
        .iter()
        .flat_map(|path| path.shape.iter().copied())
        .collect();
    if points.len() < 3 {
        return;
    }

    let interval = total_distance / f64::from(quota + 1);
    let mut accumulated = 0.0;
    let mut gifts = Vec::new();

    // The final point is never a marker candidate; it is the destination.
    for pair in points[..points.len() - 1].windows(2) {
        accumulated += pair[0].distance_meters(&pair[1]);
        if accumulated > interval {
            gifts.push(GiftMarker {
                id: format!("gift_{}", gifts.len() + 1),
                location: pair[1],
            });
            accumulated -= interval;
            if gifts.len() >= quota as usize {
                break;
            }
        }
    }

    journey.gifts = gifts;
}
