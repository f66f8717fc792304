// ABOUTME: Core types and constants for the Outline live workout session engine
// ABOUTME: Foundation crate with session models, error taxonomy and unit constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Outline Core
//!
//! Foundation crate providing the shared vocabulary of the workout session
//! engine. It has no async runtime and performs no I/O, so it changes rarely
//! and keeps incremental builds of the engine crate cheap.
//!
//! ## Modules
//!
//! - **errors**: `SessionError` taxonomy with stable `ErrorCode`s
//! - **constants**: Unit conversion factors and engine defaults
//! - **models**: Sessions, sensor samples, metric snapshots, course geometry and records

/// Unified error handling with stable error codes
pub mod errors;

/// Unit conversions and engine defaults
pub mod constants;

/// Session, sample, metrics, course and record models
pub mod models;
