// ABOUTME: End-of-session results handed to callers and to the persistence collaborator
// ABOUTME: Session summary, finalized workout, and the running record with its health summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::RunningMode;
use super::course::{Coordinate, CourseGuide};
use super::metrics::MetricsSnapshot;
use super::session::WorkoutSession;
use crate::errors::FinalizeError;

/// Workout as stored by the collection service after a successful finalize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedSession {
    /// Identifier assigned by the collection service
    pub workout_id: String,
    /// Start reported by the service
    pub start_time: DateTime<Utc>,
    /// End reported by the service
    pub end_time: DateTime<Utc>,
    /// Total distance the service recorded, when it tracks one
    pub total_distance_meters: Option<f64>,
    /// Total energy the service recorded, when it tracks one
    pub total_energy_kcal: Option<f64>,
}

/// Finished session surfaced to the caller of a with-summary end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The session, in state `Ended`
    pub session: WorkoutSession,
    /// Final metrics
    pub metrics: MetricsSnapshot,
    /// Guide the session followed, if any
    pub course: Option<CourseGuide>,
    /// Accepted live locations in arrival order
    pub user_path: Vec<Coordinate>,
    /// Elapsed time excluding pauses
    pub active_duration_seconds: f64,
    /// Workout returned by the collection service's finalize step
    pub finalized: Option<FinalizedSession>,
    /// Why finalize failed; when set the summary is incomplete
    #[serde(skip)]
    pub finalize_error: Option<FinalizeError>,
    /// Whether a record was handed to the persistence collaborator
    pub recorded: bool,
}

impl SessionSummary {
    /// Whether the finalize step failed
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        self.finalize_error.is_some()
    }
}

/// What an `end` request resolves to once the collection service acknowledges it
#[derive(Debug, Clone, PartialEq)]
pub enum EndOutcome {
    /// Ended with a summary
    Summary(Box<SessionSummary>),
    /// Ended without a summary; session and metrics were cleared
    Discarded,
}

/// Health totals stored alongside a running record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    /// Elapsed time excluding pauses, in seconds
    pub total_time_seconds: f64,
    /// Steps per second
    pub average_cadence: f64,
    /// Meters
    pub total_running_distance_meters: f64,
    /// Kilocalories
    pub total_energy_kcal: f64,
    /// Beats per minute
    pub average_heart_rate: f64,
    /// Seconds per kilometer
    pub average_pace_sec_per_km: f64,
    /// Session start
    pub start_date: DateTime<Utc>,
    /// Session end
    pub end_date: DateTime<Utc>,
}

/// Persisted form of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningRecord {
    /// Record identifier
    pub id: Uuid,
    /// Session this record was built from
    pub session_id: Uuid,
    /// Freeform or guided
    pub running_mode: RunningMode,
    /// Guide followed, if any
    pub course: Option<CourseGuide>,
    /// Path actually run
    pub user_path: Vec<Coordinate>,
    /// Health totals
    pub health: HealthSummary,
}

impl RunningRecord {
    /// Build a record from an ended session summary
    ///
    /// Returns `None` when the summarized session has no end time, which only
    /// happens if the summary was not produced by an acknowledged end.
    #[must_use]
    pub fn from_summary(summary: &SessionSummary) -> Option<Self> {
        let end_date = summary.session.end_time()?;
        let metrics = &summary.metrics;
        Some(Self {
            id: Uuid::new_v4(),
            session_id: summary.session.id,
            running_mode: summary.session.mode,
            course: summary.course.clone(),
            user_path: summary.user_path.clone(),
            health: HealthSummary {
                total_time_seconds: summary.active_duration_seconds,
                average_cadence: metrics.cadence,
                total_running_distance_meters: metrics.distance_meters,
                total_energy_kcal: metrics.calorie_kcal,
                average_heart_rate: metrics.heart_rate_average,
                average_pace_sec_per_km: metrics.average_pace_sec_per_km,
                start_date: summary.session.start_time,
                end_date,
            },
        })
    }
}
