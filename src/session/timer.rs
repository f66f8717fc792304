// ABOUTME: Pause-aware elapsed time for a workout session
// ABOUTME: Accumulates active intervals so pauses never count toward pace or cadence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};

/// Active (pause-excluded) duration of the current session
#[derive(Debug, Clone)]
pub struct ActiveTimer {
    accumulated: Duration,
    running_since: Option<DateTime<Utc>>,
}

impl Default for ActiveTimer {
    fn default() -> Self {
        Self {
            accumulated: Duration::zero(),
            running_since: None,
        }
    }
}

impl ActiveTimer {
    /// Start timing from zero at `at`
    pub fn start(&mut self, at: DateTime<Utc>) {
        self.accumulated = Duration::zero();
        self.running_since = Some(at);
    }

    /// Stop counting; the time so far is kept
    pub fn pause(&mut self, at: DateTime<Utc>) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += (at - since).max(Duration::zero());
        }
    }

    /// Continue counting from `at`
    pub fn resume(&mut self, at: DateTime<Utc>) {
        if self.running_since.is_none() {
            self.running_since = Some(at);
        }
    }

    /// Clear back to zero and stop
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether time is currently being counted
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Active seconds as of `at`
    #[must_use]
    pub fn elapsed_seconds(&self, at: DateTime<Utc>) -> f64 {
        let running = self
            .running_since
            .map_or_else(Duration::zero, |since| (at - since).max(Duration::zero()));
        (self.accumulated + running).num_milliseconds() as f64 / 1000.0
    }
}
