// ABOUTME: Boundary to the external sensor collection service
// ABOUTME: CollectionService trait, its state notifications and the sink it pushes samples into
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Collection Service Boundary
//!
//! The engine never samples sensors itself. A [`CollectionService`] begins and
//! ends collection on request, and pushes sample batches and state changes
//! back through the [`CollectionSink`] it receives when collection begins.
//!
//! Calls into the service are awaited on the controller task, so
//! implementations must not wait for the controller to reply to anything.
//! Pushing into the sink never blocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use outline_core::errors::{CollectionError, FinalizeError};
use outline_core::models::{ActivityType, FinalizedSession, SensorSample};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::errors::{SessionError, SessionResult};
use crate::session::commands::Command;

/// State reported by the collection service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionState {
    /// Collecting samples
    Running,
    /// Collection paused, possibly by the device itself
    Paused,
    /// Collection stopped; acknowledges a pending end
    Ended,
    /// Collection failed and will not recover
    Failed(String),
}

/// What the controller asks the service to collect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    /// Session the samples belong to
    pub session_id: Uuid,
    /// Kind of workout, used by the service to pick data types
    pub activity_type: ActivityType,
    /// Collection start
    pub start_time: DateTime<Utc>,
}

/// External sensor collection service
#[async_trait]
pub trait CollectionService: Send + Sync {
    /// Begin collecting for a new session
    ///
    /// Samples and state changes for this session go to `sink`.
    async fn begin_collection(
        &self,
        request: CollectionRequest,
        sink: CollectionSink,
    ) -> Result<(), CollectionError>;

    /// Pause collection after the user paused the session
    async fn pause_collection(&self) {}

    /// Resume collection after the user resumed the session
    async fn resume_collection(&self) {}

    /// Ask collection to stop at `end_time`
    ///
    /// The request is fire-and-forget; completion is reported later as
    /// [`CollectionState::Ended`] through the sink.
    async fn end_collection(&self, end_time: DateTime<Utc>);

    /// Finish the workout once collection has ended
    async fn finalize(&self) -> Result<FinalizedSession, FinalizeError>;
}

/// Non-blocking entry point for collection callbacks
///
/// Every call is queued onto the controller task, which applies them in
/// arrival order. A sink handed out by `begin_collection` is bound to that
/// session: once the controller has moved on to another session (or none),
/// its deliveries are dropped. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct CollectionSink {
    commands: mpsc::UnboundedSender<Command>,
    session_id: Option<Uuid>,
}

impl CollectionSink {
    pub(crate) const fn new(
        commands: mpsc::UnboundedSender<Command>,
        session_id: Option<Uuid>,
    ) -> Self {
        Self {
            commands,
            session_id,
        }
    }

    /// Session this sink reports for, `None` when it follows the current one
    #[must_use]
    pub const fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Deliver one batch of samples
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EngineStopped` if the controller task is gone
    pub fn deliver_samples(&self, batch: Vec<SensorSample>) -> SessionResult<()> {
        self.send(Command::Samples {
            origin: self.session_id,
            batch,
        })
    }

    /// Report a collection state change observed at `at`
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EngineStopped` if the controller task is gone
    pub fn state_changed(&self, state: CollectionState, at: DateTime<Utc>) -> SessionResult<()> {
        self.send(Command::CollectionStateChanged {
            origin: self.session_id,
            state,
            at,
        })
    }

    fn send(&self, command: Command) -> SessionResult<()> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::EngineStopped)
    }
}
