// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Unit conversion factors, geodesy constants and engine default values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one flat list.

/// Unit conversion factors
pub mod units {
    /// Meters per kilometer conversion factor
    pub const METERS_PER_KM: f64 = 1000.0;
}

/// Geodesy constants
pub mod geo {
    /// Mean Earth radius in meters (IUGG)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// Default values for course proximity tracking
pub mod proximity_defaults {
    /// Remaining distance under which the runner is told the finish is close
    pub const NEAR_END_METERS: f64 = 30.0;

    /// Remaining distance under which completing the session is offered
    pub const AT_END_METERS: f64 = 5.0;
}

/// Default values for the session controller
pub mod session_defaults {
    /// Sessions with less active time than this are ended without a record
    pub const MIN_RECORD_SECONDS: u64 = 3;

    /// Capacity of the broadcast event stream handed to UI layers
    pub const EVENT_BUFFER: usize = 256;
}

/// Service identification for structured logs
pub mod service_names {
    /// Service name reported by the session engine
    pub const OUTLINE_WORKOUT: &str = "outline-workout";
}
