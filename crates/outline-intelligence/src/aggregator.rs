// ABOUTME: Applies batches of sensor samples to the live metrics snapshot
// ABOUTME: Kind-specific update rules with one published snapshot per batch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use outline_core::models::{MetricsSnapshot, SampleKind, SensorSample};
use tracing::{debug, trace};

use crate::metrics::MetricCalculator;

/// Owns the live `MetricsSnapshot` and updates it one batch at a time
///
/// Each sample is applied independently of the other kinds in its batch, so
/// arrival order inside a batch does not matter. The caller publishes the
/// snapshot returned by [`apply_batch`](Self::apply_batch); no intermediate
/// state is visible outside this type.
#[derive(Debug, Default)]
pub struct SensorSampleAggregator {
    snapshot: MetricsSnapshot,
}

impl SensorSampleAggregator {
    /// Create an aggregator with all metrics at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    #[must_use]
    pub const fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot
    }

    /// Clear every metric back to zero
    pub fn reset(&mut self) {
        self.snapshot = MetricsSnapshot::default();
    }

    /// Apply a batch and return the resulting snapshot
    ///
    /// `elapsed_seconds` is the active (pause-excluded) session duration at
    /// the time the batch arrived. It drives average pace and cadence.
    pub fn apply_batch(&mut self, batch: &[SensorSample], elapsed_seconds: f64) -> MetricsSnapshot {
        let mut next = self.snapshot;
        for sample in batch {
            Self::apply_sample(&mut next, sample, elapsed_seconds);
        }
        trace!(samples.count = batch.len(), elapsed_seconds, "Applied sample batch");
        self.snapshot = next;
        next
    }

    fn apply_sample(snapshot: &mut MetricsSnapshot, sample: &SensorSample, elapsed_seconds: f64) {
        match sample.kind {
            SampleKind::HeartRate => {
                snapshot.heart_rate_current = sample.most_recent_or_zero();
                snapshot.heart_rate_average = sample.average_or_zero();
            }
            SampleKind::ActiveEnergy => {
                snapshot.calorie_kcal = sample.cumulative_sum_or_zero();
            }
            SampleKind::Distance => {
                snapshot.distance_meters = sample.cumulative_sum_or_zero();
                snapshot.average_pace_sec_per_km =
                    MetricCalculator::average_pace(snapshot.distance_meters, elapsed_seconds);
            }
            SampleKind::Speed => {
                snapshot.pace_sec_per_km =
                    MetricCalculator::pace_from_speed(sample.most_recent_or_zero());
            }
            SampleKind::StepCount => {
                snapshot.step_count_average = sample.average_or_zero();
                if let Some(cadence) =
                    MetricCalculator::cadence(snapshot.step_count_average, elapsed_seconds)
                {
                    snapshot.cadence = cadence;
                }
            }
            SampleKind::Unsupported => {
                debug!("Ignoring sample with no metric mapping");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_heart_rate_sets_current_and_average() {
        let mut aggregator = SensorSampleAggregator::new();
        let snapshot = aggregator.apply_batch(&[SensorSample::heart_rate(140.0, 130.0)], 60.0);
        assert!(approx(snapshot.heart_rate_current, 140.0));
        assert!(approx(snapshot.heart_rate_average, 130.0));
    }

    #[test]
    fn test_distance_recomputes_average_pace() {
        let mut aggregator = SensorSampleAggregator::new();
        let snapshot = aggregator.apply_batch(&[SensorSample::distance(1000.0)], 300.0);
        assert!(approx(snapshot.distance_meters, 1000.0));
        assert!(approx(snapshot.average_pace_sec_per_km, 300.0));
    }

    #[test]
    fn test_speed_sets_pace() {
        let mut aggregator = SensorSampleAggregator::new();
        let snapshot = aggregator.apply_batch(&[SensorSample::speed(2.5)], 10.0);
        assert!(approx(snapshot.pace_sec_per_km, 400.0));

        let snapshot = aggregator.apply_batch(&[SensorSample::speed(0.0)], 11.0);
        assert!(approx(snapshot.pace_sec_per_km, 0.0));
    }

    #[test]
    fn test_cadence_kept_when_elapsed_is_zero() {
        let mut aggregator = SensorSampleAggregator::new();
        aggregator.apply_batch(&[SensorSample::step_count(150.0)], 60.0);
        assert!(approx(aggregator.snapshot().cadence, 2.5));

        let snapshot = aggregator.apply_batch(&[SensorSample::step_count(90.0)], 0.0);
        assert!(approx(snapshot.step_count_average, 90.0));
        assert!(approx(snapshot.cadence, 2.5));
    }

    #[test]
    fn test_batch_order_does_not_matter() {
        let batch = [
            SensorSample::distance(2000.0),
            SensorSample::active_energy(110.0),
            SensorSample::speed(3.2),
            SensorSample::step_count(170.0),
            SensorSample::heart_rate(155.0, 148.0),
        ];
        let mut reversed = batch;
        reversed.reverse();

        let forward = SensorSampleAggregator::new().apply_batch(&batch, 640.0);
        let backward = SensorSampleAggregator::new().apply_batch(&reversed, 640.0);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_unsupported_kind_leaves_snapshot_untouched() {
        let mut aggregator = SensorSampleAggregator::new();
        let before = aggregator.apply_batch(&[SensorSample::distance(800.0)], 240.0);
        let unsupported = SensorSample {
            kind: SampleKind::Unsupported,
            most_recent: Some(91.0),
            average: None,
            cumulative_sum: None,
        };
        let after = aggregator.apply_batch(&[unsupported], 250.0);
        assert_eq!(before, after);
    }

    #[test]
    fn test_cumulative_fields_follow_non_decreasing_input() {
        let mut aggregator = SensorSampleAggregator::new();
        let mut last = MetricsSnapshot::default();
        for step in 1..=20_u32 {
            let t = f64::from(step);
            let snapshot = aggregator.apply_batch(
                &[
                    SensorSample::distance(t * 12.5),
                    SensorSample::active_energy(t * 0.8),
                ],
                t * 5.0,
            );
            assert!(snapshot.distance_meters >= last.distance_meters);
            assert!(snapshot.calorie_kcal >= last.calorie_kcal);
            last = snapshot;
        }
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut aggregator = SensorSampleAggregator::new();
        aggregator.apply_batch(&[SensorSample::heart_rate(120.0, 110.0)], 5.0);
        aggregator.reset();
        assert!(aggregator.snapshot().is_zeroed());
    }
}
