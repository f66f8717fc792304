// ABOUTME: Main library entry point for the Outline live workout session engine
// ABOUTME: Session lifecycle, live metric aggregation and course proximity tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Outline Workout
//!
//! Live workout session engine for a running app. It owns the lifecycle of
//! one workout at a time, turns sensor statistics into live metrics, and
//! tracks the runner against a course guide to detect the finish.
//!
//! ## Features
//!
//! - **Session state machine**: start, pause, resume, end and abort with
//!   acknowledgement from the collection service
//! - **Live metrics**: pace, average pace, cadence, heart rate, energy and distance
//! - **Course proximity**: `NearEnd` / `AtEnd` signals and progress along a guide
//! - **Observers**: ordered callbacks, watch channels and a serializable event stream
//! - **Companion sync**: best-effort running-state messages to a paired process
//!
//! ## Architecture
//!
//! - **session**: controller task and its public handle
//! - **collection**, **companion**, **persistence**: collaborator boundaries
//! - **observers**: notification fan-out
//! - **config**, **logging**, **clock**: ambient setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use outline_workout::collection::CollectionService;
//! use outline_workout::config::EngineConfig;
//! use outline_workout::errors::SessionResult;
//! use outline_workout::models::ActivityType;
//! use outline_workout::session::{SessionCollaborators, WorkoutSessionController};
//!
//! async fn run(collection: Arc<dyn CollectionService>) -> SessionResult<()> {
//!     let config = EngineConfig::from_env()?;
//!     let controller =
//!         WorkoutSessionController::spawn(config, SessionCollaborators::new(collection));
//!
//!     controller.start(ActivityType::Run, None).await?;
//!     let outcome = controller.end(true).await?.outcome().await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

/// Wall-clock abstraction
pub mod clock;

/// Sensor collection service boundary
pub mod collection;

/// Companion running-state notifications
pub mod companion;

/// Environment-driven configuration
pub mod config;

/// Error taxonomy
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Data models
pub mod models;

/// Session observers and the event stream
pub mod observers;

/// Finished record storage boundary
pub mod persistence;

/// Session controller, timer and course tracker
pub mod session;

pub use outline_intelligence::{MetricCalculator, SensorSampleAggregator};
pub use session::{CourseProximityTracker, WorkoutSessionController};
