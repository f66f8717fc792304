// ABOUTME: Unified error taxonomy for the workout session engine
// ABOUTME: Defines SessionError, collaborator errors and stable error codes for UI layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Error Types
//!
//! Every failure the engine can report is a [`SessionError`]. Errors are
//! session-scoped: none of them is fatal to the process and all are
//! recoverable by resetting the session.
//!
//! Errors raised by external collaborators keep their own types
//! ([`CollectionError`], [`FinalizeError`], [`RecordError`]) and convert into
//! `SessionError` with `?`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::{SessionOperation, SessionState};

/// Standard error codes reported to observers and UI layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The collection service could not begin a session
    SessionStartFailed,
    /// An operation was requested from a state that does not permit it
    InvalidTransition,
    /// The finalize step of ending a session failed
    FinalizeFailed,
    /// The collection service reported an error or an unexpected state
    CollectionFailed,
    /// The end acknowledgement did not arrive in time
    AcknowledgementTimeout,
    /// The session was aborted before it could end normally
    SessionAborted,
    /// The persistence collaborator rejected the record
    PersistenceFailed,
    /// Configuration is invalid
    ConfigInvalid,
    /// The controller task is no longer running
    EngineStopped,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SessionStartFailed => "The workout session could not be started",
            Self::InvalidTransition => "The operation is not allowed in the current session state",
            Self::FinalizeFailed => "The workout could not be finalized; the summary is incomplete",
            Self::CollectionFailed => "The sensor collection service reported a failure",
            Self::AcknowledgementTimeout => "The end of the session was not acknowledged in time",
            Self::SessionAborted => "The workout session was aborted",
            Self::PersistenceFailed => "The workout record could not be saved",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::EngineStopped => "The session engine is no longer running",
        }
    }
}

/// Errors reported by the external sensor collection service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The service is not available on this device
    #[error("collection service unavailable: {0}")]
    Unavailable(String),
    /// The user has not granted access to the required data types
    #[error("collection service is not authorized")]
    NotAuthorized,
    /// The session configuration was rejected
    #[error("collection service misconfigured: {0}")]
    Misconfigured(String),
    /// Collection started but failed afterwards
    #[error("collection failed: {0}")]
    Failed(String),
}

/// The finalize step of ending a workout failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("workout could not be finalized: {reason}")]
pub struct FinalizeError {
    /// Why the workout builder could not finish
    pub reason: String,
}

impl FinalizeError {
    /// Create a finalize error with the given reason
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors reported by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Storage could not be reached
    #[error("record storage unavailable: {0}")]
    Unavailable(String),
    /// Storage refused the record
    #[error("record rejected: {0}")]
    Rejected(String),
}

/// Unified error type for the session engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Start aborted because the collection service is unavailable or misconfigured
    #[error("session could not start: {reason}")]
    SessionStart {
        /// Failure reported by the collection service
        reason: String,
    },
    /// Operation requested from a state that does not permit it; state is unchanged
    #[error("cannot {operation} while session is {from}")]
    InvalidTransition {
        /// State the session was in when the operation was requested
        from: SessionState,
        /// The rejected operation
        operation: SessionOperation,
    },
    /// The session ended but the workout could not be finalized
    #[error(transparent)]
    Finalize(#[from] FinalizeError),
    /// The collection service reported an error or an unexpected state
    #[error(transparent)]
    Collection(#[from] CollectionError),
    /// The end acknowledgement did not arrive within the configured timeout
    #[error("end of session not acknowledged after {waited:?}")]
    AcknowledgementTimeout {
        /// How long the controller waited
        waited: Duration,
    },
    /// The session was aborted before ending normally
    #[error("session aborted: {reason}")]
    Aborted {
        /// Why the session was aborted
        reason: String,
    },
    /// The finished record could not be persisted
    #[error(transparent)]
    Persistence(#[from] RecordError),
    /// Configuration value is invalid
    #[error("invalid configuration: {reason}")]
    Config {
        /// Which value is wrong and why
        reason: String,
    },
    /// The controller task has stopped and can no longer accept requests
    #[error("session engine is no longer running")]
    EngineStopped,
}

impl SessionError {
    /// Start failure caused by the collection service
    #[must_use]
    pub fn session_start(reason: impl Into<String>) -> Self {
        Self::SessionStart {
            reason: reason.into(),
        }
    }

    /// Operation rejected in the given state
    #[must_use]
    pub const fn invalid_transition(from: SessionState, operation: SessionOperation) -> Self {
        Self::InvalidTransition { from, operation }
    }

    /// Session aborted for the given reason
    #[must_use]
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: reason.into(),
        }
    }

    /// Configuration error
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SessionStart { .. } => ErrorCode::SessionStartFailed,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::Finalize(_) => ErrorCode::FinalizeFailed,
            Self::Collection(_) => ErrorCode::CollectionFailed,
            Self::AcknowledgementTimeout { .. } => ErrorCode::AcknowledgementTimeout,
            Self::Aborted { .. } => ErrorCode::SessionAborted,
            Self::Persistence(_) => ErrorCode::PersistenceFailed,
            Self::Config { .. } => ErrorCode::ConfigInvalid,
            Self::EngineStopped => ErrorCode::EngineStopped,
        }
    }
}

/// Result type alias for convenience
pub type SessionResult<T> = Result<T, SessionError>;
