// ABOUTME: Sensor sample model delivered by the external collection service
// ABOUTME: One statistic per quantity kind with most-recent, average and cumulative readings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Quantity a sample measures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Beats per minute
    HeartRate,
    /// Kilocalories burned
    ActiveEnergy,
    /// Meters walked or run
    Distance,
    /// Meters per second
    Speed,
    /// Steps
    StepCount,
    /// Any kind the engine has no metric mapping for; ignored by aggregation
    #[serde(other)]
    Unsupported,
}

/// One statistic for one quantity kind
///
/// The collection service reports statistics rather than raw points. Which
/// reading is meaningful depends on `kind`: heart rate uses `most_recent` and
/// `average`, energy and distance use `cumulative_sum`, speed uses
/// `most_recent`, and step count uses `average`. A missing reading counts as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Quantity measured
    pub kind: SampleKind,
    /// Latest instantaneous value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_recent: Option<f64>,
    /// Average since the start of the session (or over the sample window)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    /// Running total since the start of the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_sum: Option<f64>,
}

impl SensorSample {
    const fn empty(kind: SampleKind) -> Self {
        Self {
            kind,
            most_recent: None,
            average: None,
            cumulative_sum: None,
        }
    }

    /// Heart rate statistic in beats per minute
    #[must_use]
    pub const fn heart_rate(most_recent: f64, average_since_start: f64) -> Self {
        Self {
            most_recent: Some(most_recent),
            average: Some(average_since_start),
            ..Self::empty(SampleKind::HeartRate)
        }
    }

    /// Cumulative active energy in kilocalories
    #[must_use]
    pub const fn active_energy(cumulative_kcal: f64) -> Self {
        Self {
            cumulative_sum: Some(cumulative_kcal),
            ..Self::empty(SampleKind::ActiveEnergy)
        }
    }

    /// Cumulative distance in meters
    #[must_use]
    pub const fn distance(cumulative_meters: f64) -> Self {
        Self {
            cumulative_sum: Some(cumulative_meters),
            ..Self::empty(SampleKind::Distance)
        }
    }

    /// Instantaneous speed in meters per second
    #[must_use]
    pub const fn speed(meters_per_second: f64) -> Self {
        Self {
            most_recent: Some(meters_per_second),
            ..Self::empty(SampleKind::Speed)
        }
    }

    /// Average step count over the collection window
    #[must_use]
    pub const fn step_count(average_over_window: f64) -> Self {
        Self {
            average: Some(average_over_window),
            ..Self::empty(SampleKind::StepCount)
        }
    }

    /// Latest value, 0 when absent or not a finite non-negative number
    #[must_use]
    pub fn most_recent_or_zero(&self) -> f64 {
        non_negative(self.most_recent)
    }

    /// Average value, 0 when absent or not a finite non-negative number
    #[must_use]
    pub fn average_or_zero(&self) -> f64 {
        non_negative(self.average)
    }

    /// Cumulative sum, 0 when absent or not a finite non-negative number
    #[must_use]
    pub fn cumulative_sum_or_zero(&self) -> f64 {
        non_negative(self.cumulative_sum)
    }
}

fn non_negative(reading: Option<f64>) -> f64 {
    reading.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_invalid_readings_read_as_zero() {
        let sample = SensorSample {
            kind: SampleKind::HeartRate,
            most_recent: Some(f64::NAN),
            average: Some(-3.0),
            cumulative_sum: None,
        };
        assert!(sample.most_recent_or_zero().abs() < f64::EPSILON);
        assert!(sample.average_or_zero().abs() < f64::EPSILON);
        assert!(sample.cumulative_sum_or_zero().abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_kind_deserializes_as_unsupported() {
        let sample: SensorSample =
            serde_json::from_str(r#"{"kind":"cycling_cadence","most_recent":80.0}"#).unwrap();
        assert_eq!(sample.kind, SampleKind::Unsupported);
    }
}
