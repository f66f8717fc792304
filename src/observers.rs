// ABOUTME: Observer capability set for UI layers watching a workout session
// ABOUTME: SessionObserver trait, the ordered observer registry and a broadcast event stream adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Observers
//!
//! Observers are called on the controller task, one after another in
//! registration order, so every observer sees the same sequence of events.
//! Callbacks must return quickly; anything slow belongs on a task fed by an
//! [`EventStream`] subscription.

use std::sync::Arc;

use outline_core::errors::{ErrorCode, SessionError};
use outline_core::models::{
    CourseProgress, EndOutcome, MetricsSnapshot, ProximityEvent, SessionState, SessionSummary,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Receives session notifications; every method defaults to doing nothing
pub trait SessionObserver: Send + Sync {
    /// A state transition was committed
    fn on_state_changed(&self, _from: SessionState, _to: SessionState) {}

    /// A sample batch was applied, or metrics were cleared
    fn on_metrics_updated(&self, _snapshot: &MetricsSnapshot) {}

    /// The runner crossed a course proximity threshold
    fn on_proximity_event(&self, _event: ProximityEvent) {}

    /// Progress along the course guide after a location update
    fn on_course_progress(&self, _progress: &CourseProgress) {}

    /// An end request resolved
    fn on_session_finished(&self, _outcome: &EndOutcome) {}

    /// An asynchronous failure: finalize, collection, persistence or a missing acknowledgement
    fn on_error(&self, _error: &SessionError) {}
}

/// Ordered list of observers
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl ObserverRegistry {
    /// Add an observer after the existing ones
    pub fn register(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observer is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Fan out a state transition
    pub fn state_changed(&self, from: SessionState, to: SessionState) {
        for observer in &self.observers {
            observer.on_state_changed(from, to);
        }
    }

    /// Fan out a metrics snapshot
    pub fn metrics_updated(&self, snapshot: &MetricsSnapshot) {
        for observer in &self.observers {
            observer.on_metrics_updated(snapshot);
        }
    }

    /// Fan out a proximity event
    pub fn proximity_event(&self, event: ProximityEvent) {
        for observer in &self.observers {
            observer.on_proximity_event(event);
        }
    }

    /// Fan out course progress
    pub fn course_progress(&self, progress: &CourseProgress) {
        for observer in &self.observers {
            observer.on_course_progress(progress);
        }
    }

    /// Fan out an end outcome
    pub fn session_finished(&self, outcome: &EndOutcome) {
        for observer in &self.observers {
            observer.on_session_finished(outcome);
        }
    }

    /// Fan out an asynchronous error
    pub fn error(&self, error: &SessionError) {
        for observer in &self.observers {
            observer.on_error(error);
        }
    }
}

/// Serializable form of every observer notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A state transition was committed
    StateChanged {
        /// Previous state
        from: SessionState,
        /// New state
        to: SessionState,
    },
    /// New metrics snapshot
    MetricsUpdated {
        /// The published snapshot
        snapshot: MetricsSnapshot,
    },
    /// Proximity threshold crossed
    Proximity {
        /// The signal
        event: ProximityEvent,
    },
    /// Progress along the course guide
    CourseProgress {
        /// Latest progress
        progress: CourseProgress,
    },
    /// An end request resolved
    SessionFinished {
        /// Present when the session ended with a summary
        summary: Option<Box<SessionSummary>>,
        /// Whether finalize failed
        incomplete: bool,
    },
    /// Asynchronous failure
    Error {
        /// Stable error code
        code: ErrorCode,
        /// Human readable message
        message: String,
    },
}

impl From<&EndOutcome> for SessionEvent {
    fn from(outcome: &EndOutcome) -> Self {
        match outcome {
            EndOutcome::Summary(summary) => Self::SessionFinished {
                incomplete: summary.is_incomplete(),
                summary: Some(summary.clone()),
            },
            EndOutcome::Discarded => Self::SessionFinished {
                summary: None,
                incomplete: false,
            },
        }
    }
}

impl From<&SessionError> for SessionEvent {
    fn from(error: &SessionError) -> Self {
        Self::Error {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Observer that republishes every notification on a broadcast channel
///
/// Lagging subscribers lose the oldest events; the controller never waits
/// for them.
#[derive(Debug, Clone)]
pub struct EventStream {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventStream {
    /// Create a stream holding up to `buffer_size` undelivered events per subscriber
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl SessionObserver for EventStream {
    fn on_state_changed(&self, from: SessionState, to: SessionState) {
        self.publish(SessionEvent::StateChanged { from, to });
    }

    fn on_metrics_updated(&self, snapshot: &MetricsSnapshot) {
        self.publish(SessionEvent::MetricsUpdated {
            snapshot: *snapshot,
        });
    }

    fn on_proximity_event(&self, event: ProximityEvent) {
        self.publish(SessionEvent::Proximity { event });
    }

    fn on_course_progress(&self, progress: &CourseProgress) {
        self.publish(SessionEvent::CourseProgress {
            progress: *progress,
        });
    }

    fn on_session_finished(&self, outcome: &EndOutcome) {
        self.publish(outcome.into());
    }

    fn on_error(&self, error: &SessionError) {
        self.publish(error.into());
    }
}
