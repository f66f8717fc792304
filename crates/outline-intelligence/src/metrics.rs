// ABOUTME: Pace and cadence calculations for live workout metrics
// ABOUTME: Deterministic functions that degrade to zero instead of dividing by zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use outline_core::constants::units::METERS_PER_KM;

/// Stateless metric calculations
///
/// All functions are side-effect free and never panic. Zero, negative or
/// non-finite inputs produce the documented default of `0`.
pub struct MetricCalculator;

impl MetricCalculator {
    /// Average pace in seconds per kilometer
    ///
    /// `duration_seconds / distance_meters * 1000` when both are positive,
    /// otherwise `0`.
    #[must_use]
    pub fn average_pace(distance_meters: f64, duration_seconds: f64) -> f64 {
        if distance_meters > 0.0 && duration_seconds > 0.0 {
            finite_or_zero(duration_seconds / distance_meters * METERS_PER_KM)
        } else {
            0.0
        }
    }

    /// Instantaneous pace in seconds per kilometer
    ///
    /// `1 / speed * 1000` when `speed_meters_per_second` is positive, otherwise `0`.
    #[must_use]
    pub fn pace_from_speed(speed_meters_per_second: f64) -> f64 {
        if speed_meters_per_second > 0.0 {
            finite_or_zero(1.0 / speed_meters_per_second * METERS_PER_KM)
        } else {
            0.0
        }
    }

    /// Steps per second, `None` when there is no elapsed time to divide by
    ///
    /// Callers keep their previous cadence on `None` rather than zeroing it.
    #[must_use]
    pub fn cadence(step_count_average: f64, elapsed_seconds: f64) -> Option<f64> {
        if elapsed_seconds > 0.0 {
            Some(finite_or_zero(step_count_average / elapsed_seconds).max(0.0))
        } else {
            None
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
