// ABOUTME: Error types for the workout session engine
// ABOUTME: Re-exports the session error taxonomy from outline-core for crate-local paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Error handling for the session engine
//!
//! Start and transition errors are returned from the controller call that
//! caused them. Finalize, collection, persistence and acknowledgement
//! failures happen on the controller task and reach callers through
//! [`SessionObserver::on_error`](crate::observers::SessionObserver::on_error)
//! and the `Error` variant of the event stream.

pub use outline_core::errors::{
    CollectionError, ErrorCode, FinalizeError, RecordError, SessionError, SessionResult,
};
