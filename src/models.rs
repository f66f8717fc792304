// ABOUTME: Data models for the workout session engine
// ABOUTME: Re-exports session, sample, metrics, course and record types from outline-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use outline_core::models::{
    ActivityType, Coordinate, CourseGuide, CourseProgress, EndOutcome, FinalizedSession,
    HealthSummary, MetricsSnapshot, ProximityEvent, RunningMode, RunningRecord, SampleKind,
    SensorSample, SessionOperation, SessionState, SessionSummary, WorkoutSession,
};
