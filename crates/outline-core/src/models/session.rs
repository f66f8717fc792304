// ABOUTME: Workout session identity, lifecycle states and the transition table
// ABOUTME: Encodes which operation moves the session from which state to which
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::activity::{ActivityType, RunningMode};

/// Lifecycle state of a workout session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session is running
    #[default]
    NotStarted,
    /// Collecting samples
    Active,
    /// Collection paused; elapsed time is frozen
    Paused,
    /// End requested; waiting for the collection service to acknowledge
    Ending,
    /// Acknowledged and finalized
    Ended,
    /// Abandoned before it could end normally
    Aborted,
}

impl SessionState {
    /// Stable lowercase name used in logs and error messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Ending => "ending",
            Self::Ended => "ended",
            Self::Aborted => "aborted",
        }
    }

    /// Whether a companion should show the workout as running
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the session is started and not yet winding down
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }

    /// Whether sensor samples still update the metrics in this state
    #[must_use]
    pub const fn accepts_samples(self) -> bool {
        matches!(self, Self::Active | Self::Paused | Self::Ending)
    }

    /// State reached by applying `operation`, or `None` when the operation is not allowed
    #[must_use]
    pub const fn next(self, operation: SessionOperation) -> Option<Self> {
        use SessionOperation as Op;
        match (self, operation) {
            (Self::NotStarted, Op::Start) | (Self::Paused, Op::Resume) => Some(Self::Active),
            (Self::Active, Op::Pause) => Some(Self::Paused),
            (Self::Active | Self::Paused, Op::End) => Some(Self::Ending),
            (Self::Ending, Op::AcknowledgeEnd) => Some(Self::Ended),
            (Self::Active | Self::Paused | Self::Ending, Op::Abort) => Some(Self::Aborted),
            (Self::NotStarted | Self::Ended | Self::Aborted, Op::Reset) => Some(Self::NotStarted),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations that move a session between states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionOperation {
    /// Begin a new session
    Start,
    /// Pause an active session
    Pause,
    /// Resume a paused session
    Resume,
    /// Request the end of a started session
    End,
    /// Collection service confirmed the end
    AcknowledgeEnd,
    /// Abandon the session
    Abort,
    /// Clear a finished session
    Reset,
}

impl SessionOperation {
    /// Every operation, in declaration order
    pub const ALL: [Self; 7] = [
        Self::Start,
        Self::Pause,
        Self::Resume,
        Self::End,
        Self::AcknowledgeEnd,
        Self::Abort,
        Self::Reset,
    ];
}

impl fmt::Display for SessionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::End => "end",
            Self::AcknowledgeEnd => "acknowledge end",
            Self::Abort => "abort",
            Self::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// Identity and lifecycle of one workout attempt
///
/// `end_time` is set exactly when `state` is [`SessionState::Ended`]; the only
/// way to change the state is [`WorkoutSession::transition_to`], which keeps
/// that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Unique session identifier
    pub id: Uuid,
    /// Kind of workout
    pub activity_type: ActivityType,
    /// Freeform or guided by a course
    pub mode: RunningMode,
    /// When collection began
    pub start_time: DateTime<Utc>,
    state: SessionState,
    end_time: Option<DateTime<Utc>>,
}

impl WorkoutSession {
    /// Create a session that has not been committed to any state yet
    #[must_use]
    pub fn new(activity_type: ActivityType, mode: RunningMode, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_type,
            mode,
            start_time,
            state: SessionState::NotStarted,
            end_time: None,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// When the session ended, present only once it is `Ended`
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Move to `state` at time `at`
    pub fn transition_to(&mut self, state: SessionState, at: DateTime<Utc>) {
        self.state = state;
        self.end_time = (state == SessionState::Ended).then_some(at);
    }
}
