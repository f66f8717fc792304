// ABOUTME: Great-circle distance and polyline progress helpers for course tracking
// ABOUTME: Haversine distance, cumulative path lengths and nearest-vertex lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use outline_core::constants::geo::EARTH_RADIUS_METERS;
use outline_core::models::Coordinate;

/// Haversine distance between two coordinates in meters
#[must_use]
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Distance from the first point to each point of `path`, in meters
///
/// The result has one entry per point; the first is always 0 and the last is
/// the length of the whole path.
#[must_use]
pub fn cumulative_distances(path: &[Coordinate]) -> Vec<f64> {
    let mut total = 0.0;
    let mut distances = Vec::with_capacity(path.len());
    let mut previous: Option<Coordinate> = None;
    for &point in path {
        if let Some(prev) = previous {
            total += haversine_distance(prev, point);
        }
        distances.push(total);
        previous = Some(point);
    }
    distances
}

/// Index of the path vertex closest to `point` and its distance in meters
#[must_use]
pub fn nearest_vertex(path: &[Coordinate], point: Coordinate) -> Option<(usize, f64)> {
    path.iter()
        .enumerate()
        .map(|(index, &vertex)| (index, haversine_distance(vertex, point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
