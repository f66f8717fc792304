// ABOUTME: Course geometry models for guided runs and proximity signals
// ABOUTME: Coordinates, the read-only course guide, proximity events and progress along the guide
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Predefined course the runner tries to retrace
///
/// `path` is in traversal order; its last point is the finish. The remaining
/// fields are display metadata and never drive tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CourseGuide {
    /// Display name of the course
    pub course_name: String,
    /// Ordered course points
    pub path: Vec<Coordinate>,
    /// Rotation applied when the guide is drawn, in degrees
    #[serde(default)]
    pub heading: f64,
    /// Advertised course length in meters
    #[serde(default)]
    pub total_length_meters: f64,
    /// Human readable region the course is in
    #[serde(default)]
    pub region_display_name: String,
}

impl CourseGuide {
    /// Finish coordinate, `None` for an empty path
    #[must_use]
    pub fn end_coordinate(&self) -> Option<Coordinate> {
        self.path.last().copied()
    }
}

/// Signal emitted when the runner approaches the end of a course guide
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProximityEvent {
    /// Finish is close
    NearEnd {
        /// Straight-line distance to the finish when the threshold was crossed
        remaining_meters: f64,
    },
    /// Finish reached; completing the session can be offered
    AtEnd {
        /// Straight-line distance to the finish when the threshold was crossed
        remaining_meters: f64,
    },
}

impl ProximityEvent {
    /// Distance that triggered the event
    #[must_use]
    pub const fn remaining_meters(&self) -> f64 {
        match self {
            Self::NearEnd { remaining_meters } | Self::AtEnd { remaining_meters } => {
                *remaining_meters
            }
        }
    }
}

/// Progress along a course guide, for display only
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseProgress {
    /// Furthest distance along the guide the runner has reached
    pub traveled_along_guide_meters: f64,
    /// Guide length still ahead of the furthest point reached
    pub remaining_along_guide_meters: f64,
    /// Straight-line distance from the latest point to the finish
    pub distance_to_end_meters: f64,
    /// Measured length of the guide path
    pub guide_length_meters: f64,
}
