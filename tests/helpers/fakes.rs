// ABOUTME: In-memory collaborators for driving the session controller in tests
// ABOUTME: Scriptable collection service, recording observer, companion and record sink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use outline_workout::collection::{
    CollectionRequest, CollectionService, CollectionSink, CollectionState,
};
use outline_workout::companion::CompanionSync;
use outline_workout::errors::{
    CollectionError, ErrorCode, FinalizeError, RecordError, SessionError,
};
use outline_workout::models::{
    ActivityType, CourseProgress, EndOutcome, FinalizedSession, MetricsSnapshot, ProximityEvent,
    RunningRecord, SessionState,
};
use outline_workout::observers::{SessionEvent, SessionObserver};
use outline_workout::persistence::RecordSink;

/// Calls the controller made into the collection service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionCall {
    Begin(ActivityType),
    Pause,
    Resume,
    End,
    Finalize,
}

/// Collection service whose behavior each test configures
#[derive(Default)]
pub struct FakeCollectionService {
    start_error: Option<CollectionError>,
    finalize_error: Option<FinalizeError>,
    acknowledge_immediately: bool,
    sink: Mutex<Option<CollectionSink>>,
    started: Mutex<Option<CollectionRequest>>,
    calls: Mutex<Vec<CollectionCall>>,
}

impl FakeCollectionService {
    /// Service that never acknowledges an end on its own
    pub fn new() -> Self {
        Self::default()
    }

    /// Service that acknowledges every end request right away
    pub fn acknowledging() -> Self {
        Self {
            acknowledge_immediately: true,
            ..Self::default()
        }
    }

    /// Service that refuses to begin collection
    pub fn refusing(error: CollectionError) -> Self {
        Self {
            start_error: Some(error),
            ..Self::default()
        }
    }

    /// Make finalize fail with `reason`
    pub fn with_finalize_failure(mut self, reason: &str) -> Self {
        self.finalize_error = Some(FinalizeError::new(reason));
        self
    }

    pub fn calls(&self) -> Vec<CollectionCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Sink handed over by the last `begin_collection`
    pub fn sink(&self) -> CollectionSink {
        self.sink
            .lock()
            .unwrap()
            .clone()
            .expect("collection was never started")
    }

    /// Report a state change as the device would
    pub fn report(&self, state: CollectionState, at: DateTime<Utc>) {
        self.sink().state_changed(state, at).unwrap();
    }

    fn record(&self, call: CollectionCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CollectionService for FakeCollectionService {
    async fn begin_collection(
        &self,
        request: CollectionRequest,
        sink: CollectionSink,
    ) -> Result<(), CollectionError> {
        self.record(CollectionCall::Begin(request.activity_type));
        if let Some(error) = &self.start_error {
            return Err(error.clone());
        }
        *self.sink.lock().unwrap() = Some(sink);
        *self.started.lock().unwrap() = Some(request);
        Ok(())
    }

    async fn pause_collection(&self) {
        self.record(CollectionCall::Pause);
    }

    async fn resume_collection(&self) {
        self.record(CollectionCall::Resume);
    }

    async fn end_collection(&self, end_time: DateTime<Utc>) {
        self.record(CollectionCall::End);
        if self.acknowledge_immediately {
            self.report(CollectionState::Ended, end_time);
        }
    }

    async fn finalize(&self) -> Result<FinalizedSession, FinalizeError> {
        self.record(CollectionCall::Finalize);
        if let Some(error) = &self.finalize_error {
            return Err(error.clone());
        }
        let request = self.started.lock().unwrap().clone().unwrap();
        Ok(FinalizedSession {
            workout_id: format!("workout-{}", request.session_id),
            start_time: request.start_time,
            end_time: request.start_time,
            total_distance_meters: None,
            total_energy_kcal: None,
        })
    }
}

/// Observer that keeps every notification in arrival order
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn transitions(&self) -> Vec<(SessionState, SessionState)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::StateChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    pub fn metrics(&self) -> Vec<MetricsSnapshot> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::MetricsUpdated { snapshot } => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn proximity_events(&self) -> Vec<ProximityEvent> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::Proximity { event } => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<CourseProgress> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::CourseProgress { progress } => Some(progress),
                _ => None,
            })
            .collect()
    }

    pub fn error_codes(&self) -> Vec<ErrorCode> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::Error { code, .. } => Some(code),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl SessionObserver for RecordingObserver {
    fn on_state_changed(&self, from: SessionState, to: SessionState) {
        self.push(SessionEvent::StateChanged { from, to });
    }

    fn on_metrics_updated(&self, snapshot: &MetricsSnapshot) {
        self.push(SessionEvent::MetricsUpdated {
            snapshot: *snapshot,
        });
    }

    fn on_proximity_event(&self, event: ProximityEvent) {
        self.push(SessionEvent::Proximity { event });
    }

    fn on_course_progress(&self, progress: &CourseProgress) {
        self.push(SessionEvent::CourseProgress {
            progress: *progress,
        });
    }

    fn on_session_finished(&self, outcome: &EndOutcome) {
        self.push(outcome.into());
    }

    fn on_error(&self, error: &SessionError) {
        self.push(error.into());
    }
}

/// Companion that remembers every running flag it was sent
#[derive(Default)]
pub struct RecordingCompanion {
    notifications: Mutex<Vec<bool>>,
}

impl RecordingCompanion {
    pub fn notifications(&self) -> Vec<bool> {
        self.notifications.lock().unwrap().clone()
    }
}

impl CompanionSync for RecordingCompanion {
    fn notify_running(&self, is_running: bool) {
        self.notifications.lock().unwrap().push(is_running);
    }
}

/// Record sink that keeps records in memory, or rejects them
#[derive(Default)]
pub struct MemoryRecordSink {
    reject: bool,
    records: Mutex<Vec<RunningRecord>>,
}

impl MemoryRecordSink {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<RunningRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for MemoryRecordSink {
    async fn save_record(&self, record: &RunningRecord) -> Result<(), RecordError> {
        if self.reject {
            return Err(RecordError::Rejected("storage full".to_owned()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
