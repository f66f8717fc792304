// ABOUTME: Messages queued onto the session controller task
// ABOUTME: Caller requests with reply channels and non-blocking collaborator callbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use chrono::{DateTime, Utc};
use outline_core::models::{
    ActivityType, Coordinate, CourseGuide, EndOutcome, SensorSample, WorkoutSession,
};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::collection::CollectionState;
use crate::errors::SessionResult;
use crate::observers::SessionObserver;

pub type Reply<T> = oneshot::Sender<SessionResult<T>>;

/// Everything the controller task reacts to, in arrival order
pub enum Command {
    Start {
        activity: ActivityType,
        guide: Option<CourseGuide>,
        reply: Reply<WorkoutSession>,
    },
    Pause {
        reply: Reply<()>,
    },
    Resume {
        reply: Reply<()>,
    },
    End {
        with_summary: bool,
        accepted: Reply<()>,
        outcome: Reply<EndOutcome>,
    },
    Abort {
        reason: String,
        reply: Reply<()>,
    },
    Reset {
        reply: Reply<()>,
    },
    RegisterObserver(Arc<dyn SessionObserver>),
    Session {
        reply: oneshot::Sender<Option<WorkoutSession>>,
    },
    UserPath {
        reply: oneshot::Sender<Vec<Coordinate>>,
    },
    /// `origin` is the session a collection sink was bound to, `None` for the current one
    Samples {
        origin: Option<Uuid>,
        batch: Vec<SensorSample>,
    },
    Location(Coordinate),
    CollectionStateChanged {
        origin: Option<Uuid>,
        state: CollectionState,
        at: DateTime<Utc>,
    },
}
