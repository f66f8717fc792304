// ABOUTME: Workout metric math, geodesy helpers and live sensor sample aggregation
// ABOUTME: Pure numeric rules shared by the session engine and its benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Outline Intelligence
//!
//! Numeric core of the workout engine. Nothing here blocks, allocates per
//! sample, or knows about the session state machine.
//!
//! - **metrics**: pace, average pace and cadence with zero-denominator guards
//! - **geo**: haversine distance and progress along a polyline
//! - **aggregator**: applies sample batches to a `MetricsSnapshot`

/// Pace and cadence calculations
pub mod metrics;

/// Great-circle distance and polyline helpers
pub mod geo;

/// Sensor sample batch aggregation
pub mod aggregator;

pub use aggregator::SensorSampleAggregator;
pub use metrics::MetricCalculator;
