// ABOUTME: Core data models for the live workout session engine
// ABOUTME: Re-exports session, sample, metrics, course and record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! ## Design Principles
//!
//! - **Value types**: snapshots, samples and events are plain data and cheap to copy
//! - **Invariants in constructors**: a `WorkoutSession` only gets an end time when it ends
//! - **Serializable**: all models serialize to JSON for observers and the persistence boundary
//!
//! ## Core Models
//!
//! - `WorkoutSession`: identity and lifecycle of one workout attempt
//! - `SensorSample`: one statistic delivered by the collection service
//! - `MetricsSnapshot`: derived metrics republished after every sample batch
//! - `CourseGuide`: the predefined path a guided run tries to retrace
//! - `RunningRecord`: what the persistence collaborator receives

mod activity;
mod course;
mod metrics;
mod record;
mod sample;
mod session;

pub use activity::{ActivityType, RunningMode};
pub use course::{Coordinate, CourseGuide, CourseProgress, ProximityEvent};
pub use metrics::MetricsSnapshot;
pub use record::{EndOutcome, FinalizedSession, HealthSummary, RunningRecord, SessionSummary};
pub use sample::{SampleKind, SensorSample};
pub use session::{SessionOperation, SessionState, WorkoutSession};
