// ABOUTME: Derived live metrics republished after every sensor sample batch
// ABOUTME: Immutable snapshot value type whose fields default to zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Current set of derived workout metrics
///
/// Every field is non-negative and defaults to 0 when its defining
/// denominator is 0 or undefined. Observers receive copies; only the
/// aggregator produces new snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Cumulative distance in meters
    pub distance_meters: f64,
    /// Latest heart rate in beats per minute
    pub heart_rate_current: f64,
    /// Average heart rate since start in beats per minute
    pub heart_rate_average: f64,
    /// Cumulative active energy in kilocalories
    pub calorie_kcal: f64,
    /// Instantaneous pace in seconds per kilometer
    pub pace_sec_per_km: f64,
    /// Average pace over elapsed active time in seconds per kilometer
    pub average_pace_sec_per_km: f64,
    /// Average step count over the collection window
    pub step_count_average: f64,
    /// Steps per second of elapsed active time
    pub cadence: f64,
}

impl MetricsSnapshot {
    /// Whether every field is at its default
    #[must_use]
    pub fn is_zeroed(&self) -> bool {
        *self == Self::default()
    }
}
