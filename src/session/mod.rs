// ABOUTME: Live workout session engine: controller task, public handle, timer and course tracker
// ABOUTME: Owns the state machine and routes samples and locations to aggregation and proximity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Session Engine
//!
//! One [`WorkoutSessionController`] owns at most one session at a time.
//! Requests from callers and callbacks from the collection and location
//! services are queued onto a single controller task, which is the only
//! code that mutates the session, the metrics or the course tracker.
//!
//! ```text
//! collection service ──samples/state──┐
//! location service ──coordinates──────┼─▶ controller task ──▶ observers, watch, companion
//! caller ──start/pause/resume/end─────┘
//! ```

pub(crate) mod commands;
mod controller;
mod handle;

/// Course proximity tracking
pub mod proximity;

/// Pause-aware elapsed time
pub mod timer;

pub use handle::{PendingEnd, SessionCollaborators, WorkoutSessionController};
pub use proximity::{CourseProximityTracker, ProximityUpdate};
pub use timer::ActiveTimer;
