// ABOUTME: Configuration module for the workout session engine
// ABOUTME: Re-exports the environment-driven engine, proximity and session settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the session engine
//!
//! - **Environment**: deployment environment used for logging defaults
//! - **Proximity**: `NearEnd` / `AtEnd` distance thresholds
//! - **Session**: end acknowledgement timeout, minimum record duration, event buffer

/// Environment variable parsing and validation
pub mod environment;

pub use environment::{EngineConfig, Environment, ProximityConfig, SessionConfig};
