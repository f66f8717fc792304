// ABOUTME: Tracks a live runner against a course guide to detect approach and arrival at the finish
// ABOUTME: Emits one NearEnd/AtEnd event per threshold crossing plus display-only progress along the guide
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use outline_core::models::{Coordinate, CourseGuide, CourseProgress, ProximityEvent};
use outline_intelligence::geo::{cumulative_distances, haversine_distance, nearest_vertex};
use tracing::debug;

use crate::config::ProximityConfig;

/// Result of observing one live location
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityUpdate {
    /// Threshold crossings caused by this point, `NearEnd` before `AtEnd`
    pub events: Vec<ProximityEvent>,
    /// Progress along the guide after this point
    pub progress: CourseProgress,
}

/// Edge-triggered threshold: fires once when crossed inward, re-arms when left
///
/// The first observation only seeds the side the runner is on, so a loop
/// course whose finish is its start does not fire at the first fix.
#[derive(Debug, Clone, Copy)]
struct Threshold {
    meters: f64,
    inside: Option<bool>,
}

impl Threshold {
    const fn new(meters: f64) -> Self {
        Self {
            meters,
            inside: None,
        }
    }

    /// Whether `remaining` crosses into the threshold
    fn crossed(&mut self, remaining: f64) -> bool {
        let inside = remaining < self.meters;
        let crossed = inside && self.inside == Some(false);
        self.inside = Some(inside);
        crossed
    }
}

/// Compares live locations against a borrowed course guide
///
/// Never touches session state; the controller forwards what it returns.
#[derive(Debug, Clone)]
pub struct CourseProximityTracker {
    path: Vec<Coordinate>,
    cumulative: Vec<f64>,
    end: Coordinate,
    near_end: Threshold,
    at_end: Threshold,
    furthest_vertex: usize,
}

impl CourseProximityTracker {
    /// Build a tracker for `guide`, or `None` when the guide has no points
    #[must_use]
    pub fn new(guide: &CourseGuide, config: &ProximityConfig) -> Option<Self> {
        let end = guide.end_coordinate()?;
        Some(Self {
            cumulative: cumulative_distances(&guide.path),
            path: guide.path.clone(),
            end,
            near_end: Threshold::new(config.near_end_meters),
            at_end: Threshold::new(config.at_end_meters),
            furthest_vertex: 0,
        })
    }

    /// Measured length of the guide path in meters
    #[must_use]
    pub fn guide_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or_default()
    }

    /// Process one live location
    pub fn observe(&mut self, point: Coordinate) -> ProximityUpdate {
        let remaining = haversine_distance(point, self.end);

        let mut events = Vec::new();
        if self.near_end.crossed(remaining) {
            events.push(ProximityEvent::NearEnd {
                remaining_meters: remaining,
            });
        }
        if self.at_end.crossed(remaining) {
            events.push(ProximityEvent::AtEnd {
                remaining_meters: remaining,
            });
        }

        if let Some((index, _)) = nearest_vertex(&self.path, point) {
            self.furthest_vertex = self.furthest_vertex.max(index);
        }

        let progress = self.progress(remaining);
        debug!(
            remaining_meters = remaining,
            traveled_meters = progress.traveled_along_guide_meters,
            events = events.len(),
            "Observed course location"
        );
        ProximityUpdate { events, progress }
    }

    fn progress(&self, distance_to_end: f64) -> CourseProgress {
        let guide_length = self.guide_length();
        let traveled = self
            .cumulative
            .get(self.furthest_vertex)
            .copied()
            .unwrap_or_default();
        CourseProgress {
            traveled_along_guide_meters: traveled,
            remaining_along_guide_meters: (guide_length - traveled).max(0.0),
            distance_to_end_meters: distance_to_end,
            guide_length_meters: guide_length,
        }
    }
}
