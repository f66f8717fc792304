// ABOUTME: Activity type and running mode enumerations for workout sessions
// ABOUTME: Defines the supported activity kinds with parsing and display implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Kind of workout being recorded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Outdoor running
    #[default]
    Run,
    /// Walking
    Walk,
    /// Hiking
    Hike,
    /// Cycling
    Ride,
    /// Wheelchair run pace
    WheelchairRun,
    /// Anything the collection service supports that has no dedicated variant
    Other,
}

impl ActivityType {
    /// Create `ActivityType` from its configuration string, falling back to `Other`
    #[must_use]
    pub fn from_internal_string(internal_name: &str) -> Self {
        match internal_name {
            "run" | "running" => Self::Run,
            "walk" | "walking" => Self::Walk,
            "hike" | "hiking" => Self::Hike,
            "ride" | "bike_ride" | "cycling" => Self::Ride,
            "wheelchair_run" => Self::WheelchairRun,
            _ => Self::Other,
        }
    }

    /// Get the human-readable name for this activity type
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Walk => "walk",
            Self::Hike => "hike",
            Self::Ride => "bike ride",
            Self::WheelchairRun => "wheelchair run",
            Self::Other => "workout",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ActivityType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_internal_string(&s.to_lowercase()))
    }
}

/// How the session relates to a predefined course
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunningMode {
    /// No course guide; proximity tracking is inert
    #[default]
    Freeform,
    /// The runner retraces a course guide and is told when the finish is near
    GuidedCourse,
}

impl RunningMode {
    /// Guided when a course guide is supplied
    #[must_use]
    pub const fn for_guide_present(has_guide: bool) -> Self {
        if has_guide {
            Self::GuidedCourse
        } else {
            Self::Freeform
        }
    }
}
