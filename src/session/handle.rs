// ABOUTME: Public handle to a running session controller and the collaborators it is built from
// ABOUTME: Async lifecycle requests, non-blocking callbacks and watch/broadcast subscriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use chrono::{DateTime, Utc};
use outline_core::models::{
    ActivityType, Coordinate, CourseGuide, EndOutcome, MetricsSnapshot, SensorSample,
    SessionState, WorkoutSession,
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use super::commands::{Command, Reply};
use super::controller::{Publishers, SessionActor};
use crate::clock::{Clock, SystemClock};
use crate::collection::{CollectionService, CollectionSink, CollectionState};
use crate::companion::{CompanionSync, NoopCompanion};
use crate::config::EngineConfig;
use crate::errors::{SessionError, SessionResult};
use crate::observers::{EventStream, ObserverRegistry, SessionEvent, SessionObserver};
use crate::persistence::{DiscardRecords, RecordSink};

/// External collaborators the controller talks to
#[derive(Clone)]
pub struct SessionCollaborators {
    /// Sensor collection service
    pub collection: Arc<dyn CollectionService>,
    /// Companion notifier
    pub companion: Arc<dyn CompanionSync>,
    /// Storage for finished records
    pub records: Arc<dyn RecordSink>,
    /// Time source
    pub clock: Arc<dyn Clock>,
}

impl SessionCollaborators {
    /// Collaborators with no companion, no record storage and the system clock
    #[must_use]
    pub fn new(collection: Arc<dyn CollectionService>) -> Self {
        Self {
            collection,
            companion: Arc::new(NoopCompanion),
            records: Arc::new(DiscardRecords),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `companion` for running-state notifications
    #[must_use]
    pub fn with_companion(mut self, companion: Arc<dyn CompanionSync>) -> Self {
        self.companion = companion;
        self
    }

    /// Hand finished records to `records`
    #[must_use]
    pub fn with_records(mut self, records: Arc<dyn RecordSink>) -> Self {
        self.records = records;
        self
    }

    /// Read time from `clock`
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// An accepted end request whose outcome depends on the collection service
#[derive(Debug)]
pub struct PendingEnd {
    outcome: oneshot::Receiver<SessionResult<EndOutcome>>,
}

impl PendingEnd {
    /// Wait for the acknowledgement and finalize step
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Aborted` if the session was aborted while
    /// ending, or `SessionError::EngineStopped` if the controller went away
    pub async fn outcome(self) -> SessionResult<EndOutcome> {
        self.outcome.await.map_err(|_| SessionError::EngineStopped)?
    }
}

/// Handle to the workout session controller
///
/// The controller runs on its own task and owns the session, the metrics
/// and the course tracker. Handles are cheap to clone; every clone talks to
/// the same controller. The task stops once every handle and collection
/// sink has been dropped.
#[derive(Clone)]
pub struct WorkoutSessionController {
    commands: mpsc::UnboundedSender<Command>,
    metrics: watch::Receiver<MetricsSnapshot>,
    state: watch::Receiver<SessionState>,
    events: EventStream,
}

impl WorkoutSessionController {
    /// Spawn the controller task on the current Tokio runtime
    #[must_use]
    pub fn spawn(config: EngineConfig, collaborators: SessionCollaborators) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (metrics_tx, metrics) = watch::channel(MetricsSnapshot::default());
        let (state_tx, state) = watch::channel(SessionState::NotStarted);

        let events = EventStream::new(config.session.event_buffer);
        let mut observers = ObserverRegistry::default();
        observers.register(Arc::new(events.clone()));

        let actor = SessionActor::new(
            config,
            collaborators,
            observers,
            Publishers {
                metrics: metrics_tx,
                state: state_tx,
            },
            commands.downgrade(),
        );
        tokio::spawn(actor.run(receiver));

        Self {
            commands,
            metrics,
            state,
            events,
        }
    }

    /// Start a session; a guide switches it to guided-course mode
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the controller is `NotStarted`, and
    /// `SessionStart` if the collection service refuses to begin
    pub async fn start(
        &self,
        activity: ActivityType,
        guide: Option<CourseGuide>,
    ) -> SessionResult<WorkoutSession> {
        self.request(|reply| Command::Start {
            activity,
            guide,
            reply,
        })
        .await
    }

    /// Pause an active session
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the session is `Active`
    pub async fn pause(&self) -> SessionResult<()> {
        self.request(|reply| Command::Pause { reply }).await
    }

    /// Resume a paused session
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the session is `Paused`
    pub async fn resume(&self) -> SessionResult<()> {
        self.request(|reply| Command::Resume { reply }).await
    }

    /// Request the end of an active or paused session
    ///
    /// The session moves to `Ending` before this returns. It reaches `Ended`
    /// only when the collection service acknowledges; await
    /// [`PendingEnd::outcome`] for the result. Without a summary the metrics
    /// are zeroed immediately and the session is cleared once acknowledged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the session is `Active` or `Paused`
    pub async fn end(&self, with_summary: bool) -> SessionResult<PendingEnd> {
        let (outcome_tx, outcome) = oneshot::channel();
        self.request(|accepted| Command::End {
            with_summary,
            accepted,
            outcome: outcome_tx,
        })
        .await?;
        Ok(PendingEnd { outcome })
    }

    /// Abandon a started session; a pending end resolves with `Aborted`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the session is `Active`, `Paused` or `Ending`
    pub async fn abort(&self, reason: impl Into<String>) -> SessionResult<()> {
        let reason = reason.into();
        self.request(|reply| Command::Abort { reason, reply }).await
    }

    /// Clear a finished or aborted session and zero the metrics
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while a session is `Active`, `Paused` or `Ending`
    pub async fn reset(&self) -> SessionResult<()> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Current session, if any
    ///
    /// # Errors
    ///
    /// Returns `EngineStopped` if the controller task is gone
    pub async fn session(&self) -> SessionResult<Option<WorkoutSession>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Session { reply })?;
        response.await.map_err(|_| SessionError::EngineStopped)
    }

    /// Live locations accepted so far in the current session
    ///
    /// # Errors
    ///
    /// Returns `EngineStopped` if the controller task is gone
    pub async fn user_path(&self) -> SessionResult<Vec<Coordinate>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::UserPath { reply })?;
        response.await.map_err(|_| SessionError::EngineStopped)
    }

    /// Add an observer; it sees every notification queued after this call
    ///
    /// # Errors
    ///
    /// Returns `EngineStopped` if the controller task is gone
    pub fn register_observer(&self, observer: Arc<dyn SessionObserver>) -> SessionResult<()> {
        self.send(Command::RegisterObserver(observer))
    }

    /// Deliver a sample batch; never blocks
    ///
    /// # Errors
    ///
    /// Returns `EngineStopped` if the controller task is gone
    pub fn deliver_samples(&self, batch: Vec<SensorSample>) -> SessionResult<()> {
        self.send(Command::Samples {
            origin: None,
            batch,
        })
    }

    /// Deliver one live location; never blocks
    ///
    /// # Errors
    ///
    /// Returns `EngineStopped` if the controller task is gone
    pub fn deliver_location(&self, point: Coordinate) -> SessionResult<()> {
        self.send(Command::Location(point))
    }

    /// Report a collection service state change; never blocks
    ///
    /// # Errors
    ///
    /// Returns `EngineStopped` if the controller task is gone
    pub fn collection_state_changed(
        &self,
        state: CollectionState,
        at: DateTime<Utc>,
    ) -> SessionResult<()> {
        self.send(Command::CollectionStateChanged {
            origin: None,
            state,
            at,
        })
    }

    /// Sink for a collection service that was not started by this controller
    ///
    /// Unlike the sink passed to `begin_collection`, it always reports for
    /// whichever session is current.
    #[must_use]
    pub fn collection_sink(&self) -> CollectionSink {
        CollectionSink::new(self.commands.clone(), None)
    }

    /// Latest published metrics
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        *self.metrics.borrow()
    }

    /// Receiver that sees every metrics publish
    #[must_use]
    pub fn subscribe_metrics(&self) -> watch::Receiver<MetricsSnapshot> {
        self.metrics.clone()
    }

    /// Latest committed state
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Receiver that sees every committed state
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Every observer notification, serialized for UI layers
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn send(&self, command: Command) -> SessionResult<()> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::EngineStopped)
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> SessionResult<T> {
        let (reply, response) = oneshot::channel();
        self.send(command(reply))?;
        response.await.map_err(|_| SessionError::EngineStopped)?
    }
}
