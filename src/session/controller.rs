// ABOUTME: Session controller task that owns the workout state machine and live metrics
// ABOUTME: Serializes caller requests and collaborator callbacks onto one mutation path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::future::pending;
use std::time::Duration;

use chrono::{DateTime, Utc};
use outline_core::errors::{CollectionError, FinalizeError};
use outline_core::models::{
    ActivityType, Coordinate, CourseGuide, EndOutcome, FinalizedSession, MetricsSnapshot,
    RunningMode, RunningRecord, SensorSample, SessionOperation, SessionState, SessionSummary,
    WorkoutSession,
};
use outline_intelligence::SensorSampleAggregator;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::commands::{Command, Reply};
use super::handle::SessionCollaborators;
use super::proximity::CourseProximityTracker;
use super::timer::ActiveTimer;
use crate::collection::{CollectionRequest, CollectionSink, CollectionState};
use crate::config::EngineConfig;
use crate::errors::{SessionError, SessionResult};
use crate::logging::SessionLogger;
use crate::observers::ObserverRegistry;

/// End request waiting for the collection service to acknowledge it
struct AwaitingAcknowledgement {
    with_summary: bool,
    outcome: Reply<EndOutcome>,
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

/// Channels the controller publishes on
pub(super) struct Publishers {
    pub metrics: watch::Sender<MetricsSnapshot>,
    pub state: watch::Sender<SessionState>,
}

/// Owns all session state; only ever runs on its own task
pub(super) struct SessionActor {
    config: EngineConfig,
    collaborators: SessionCollaborators,
    observers: ObserverRegistry,
    publishers: Publishers,
    commands: mpsc::WeakUnboundedSender<Command>,
    session: Option<WorkoutSession>,
    tracker: Option<CourseProximityTracker>,
    guide: Option<CourseGuide>,
    aggregator: SensorSampleAggregator,
    timer: ActiveTimer,
    user_path: Vec<Coordinate>,
    pending_end: Option<AwaitingAcknowledgement>,
}

impl SessionActor {
    pub(super) fn new(
        config: EngineConfig,
        collaborators: SessionCollaborators,
        observers: ObserverRegistry,
        publishers: Publishers,
        commands: mpsc::WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            config,
            collaborators,
            observers,
            publishers,
            commands,
            session: None,
            tracker: None,
            guide: None,
            aggregator: SensorSampleAggregator::new(),
            timer: ActiveTimer::default(),
            user_path: Vec::new(),
            pending_end: None,
        }
    }

    /// Process commands until every handle and sink is dropped
    pub(super) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let deadline = self.pending_end.as_ref().and_then(|pending| pending.deadline);
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                () = wait_until(deadline) => self.acknowledgement_timed_out(),
            }
        }
        debug!("Session controller stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Start {
                activity,
                guide,
                reply,
            } => {
                let result = self.start(activity, guide).await;
                let _ = reply.send(result);
            }
            Command::Pause { reply } => {
                let result = self.pause().await;
                let _ = reply.send(result);
            }
            Command::Resume { reply } => {
                let result = self.resume().await;
                let _ = reply.send(result);
            }
            Command::End {
                with_summary,
                accepted,
                outcome,
            } => match self.end(with_summary, outcome).await {
                Ok(()) => {
                    let _ = accepted.send(Ok(()));
                }
                Err((error, outcome)) => {
                    let _ = outcome.send(Err(error.clone()));
                    let _ = accepted.send(Err(error));
                }
            },
            Command::Abort { reason, reply } => {
                let result = self.abort(&reason).await;
                let _ = reply.send(result);
            }
            Command::Reset { reply } => {
                let _ = reply.send(self.reset());
            }
            Command::RegisterObserver(observer) => self.observers.register(observer),
            Command::Session { reply } => {
                let _ = reply.send(self.session.clone());
            }
            Command::UserPath { reply } => {
                let _ = reply.send(self.user_path.clone());
            }
            Command::Samples { origin, batch } => {
                if self.is_current(origin) {
                    self.apply_samples(&batch);
                }
            }
            Command::Location(point) => self.apply_location(point),
            Command::CollectionStateChanged { origin, state, at } => {
                if self.is_current(origin) {
                    self.collection_state_changed(state, at).await;
                }
            }
        }
    }

    fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::NotStarted, WorkoutSession::state)
    }

    fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|session| session.id)
    }

    /// Whether a collection callback bound to `origin` belongs to the current session
    fn is_current(&self, origin: Option<Uuid>) -> bool {
        match origin {
            Some(id) if Some(id) != self.session_id() => {
                debug!(
                    origin = %id,
                    current = ?self.session_id(),
                    "Dropping callback from a previous session"
                );
                false
            }
            _ => true,
        }
    }

    /// Target state for `operation`, or the rejection to return
    fn require(&self, operation: SessionOperation) -> SessionResult<SessionState> {
        let from = self.state();
        from.next(operation).ok_or_else(|| {
            debug!(%from, %operation, "Rejected session operation");
            SessionError::invalid_transition(from, operation)
        })
    }

    /// Commit a transition and notify observers and the companion
    fn commit(&mut self, to: SessionState, at: DateTime<Utc>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let from = session.state();
        session.transition_to(to, at);
        if from == to {
            return;
        }
        SessionLogger::log_state_transition(session.id, from, to);
        self.publishers.state.send_replace(to);
        self.observers.state_changed(from, to);
        self.collaborators.companion.notify_running(to.is_running());
    }

    fn publish_metrics(&self, snapshot: MetricsSnapshot) {
        self.publishers.metrics.send_replace(snapshot);
        self.observers.metrics_updated(&snapshot);
    }

    /// Funnel an asynchronous failure into the error channel
    fn report(&self, collaborator: &str, error: &SessionError) {
        SessionLogger::log_collaborator_failure(self.session_id(), collaborator, &error.to_string());
        self.observers.error(error);
    }

    /// Drop the session and everything derived from it
    fn clear(&mut self) {
        self.session = None;
        self.tracker = None;
        self.guide = None;
        self.user_path.clear();
        self.timer.reset();
        self.aggregator.reset();
        self.pending_end = None;
        self.publishers.state.send_replace(SessionState::NotStarted);
        if !self.publishers.metrics.borrow().is_zeroed() {
            self.publish_metrics(self.aggregator.snapshot());
        }
    }

    async fn start(
        &mut self,
        activity: ActivityType,
        guide: Option<CourseGuide>,
    ) -> SessionResult<WorkoutSession> {
        let to = self.require(SessionOperation::Start)?;
        let commands = self.commands.upgrade().ok_or(SessionError::EngineStopped)?;

        let now = self.collaborators.clock.now();
        let mode = RunningMode::for_guide_present(guide.is_some());
        let session = WorkoutSession::new(activity, mode, now);
        let sink = CollectionSink::new(commands, Some(session.id));
        let request = CollectionRequest {
            session_id: session.id,
            activity_type: activity,
            start_time: now,
        };

        if let Err(error) = self
            .collaborators
            .collection
            .begin_collection(request, sink)
            .await
        {
            warn!(session.id = %session.id, error = %error, "Collection service refused to start");
            return Err(SessionError::session_start(error.to_string()));
        }

        self.aggregator.reset();
        self.user_path.clear();
        self.timer.start(now);
        self.tracker = guide
            .as_ref()
            .and_then(|guide| CourseProximityTracker::new(guide, &self.config.proximity));
        self.guide = guide;
        self.session = Some(session);
        self.commit(to, now);

        let session = self.session.clone().ok_or(SessionError::EngineStopped)?;
        SessionLogger::log_session_started(session.id, activity, mode);
        Ok(session)
    }

    async fn pause(&mut self) -> SessionResult<()> {
        let to = self.require(SessionOperation::Pause)?;
        let now = self.collaborators.clock.now();
        self.timer.pause(now);
        self.commit(to, now);
        self.collaborators.collection.pause_collection().await;
        Ok(())
    }

    async fn resume(&mut self) -> SessionResult<()> {
        let to = self.require(SessionOperation::Resume)?;
        let now = self.collaborators.clock.now();
        self.timer.resume(now);
        self.commit(to, now);
        self.collaborators.collection.resume_collection().await;
        Ok(())
    }

    async fn end(
        &mut self,
        with_summary: bool,
        outcome: Reply<EndOutcome>,
    ) -> Result<(), (SessionError, Reply<EndOutcome>)> {
        let to = match self.require(SessionOperation::End) {
            Ok(to) => to,
            Err(error) => return Err((error, outcome)),
        };
        let now = self.collaborators.clock.now();
        self.timer.pause(now);
        self.commit(to, now);

        if !with_summary {
            self.aggregator.reset();
            self.publish_metrics(self.aggregator.snapshot());
        }

        let timeout = self.config.session.end_ack_timeout;
        self.pending_end = Some(AwaitingAcknowledgement {
            with_summary,
            outcome,
            deadline: timeout.map(|timeout| Instant::now() + timeout),
            timeout,
        });
        self.collaborators.collection.end_collection(now).await;
        Ok(())
    }

    async fn abort(&mut self, reason: &str) -> SessionResult<()> {
        let from = self.state();
        let to = self.require(SessionOperation::Abort)?;
        let now = self.collaborators.clock.now();
        self.abort_to(to, now, reason);
        if from.is_live() {
            self.collaborators.collection.end_collection(now).await;
        }
        Ok(())
    }

    fn abort_to(&mut self, to: SessionState, at: DateTime<Utc>, reason: &str) {
        info!(session.id = ?self.session_id(), reason, "Aborting workout session");
        self.timer.pause(at);
        self.commit(to, at);
        if let Some(pending) = self.pending_end.take() {
            let _ = pending.outcome.send(Err(SessionError::aborted(reason)));
        }
    }

    fn reset(&mut self) -> SessionResult<()> {
        let to = self.require(SessionOperation::Reset)?;
        let now = self.collaborators.clock.now();
        self.commit(to, now);
        self.clear();
        Ok(())
    }

    fn discarding(&self) -> bool {
        self.pending_end
            .as_ref()
            .is_some_and(|pending| !pending.with_summary)
    }

    fn apply_samples(&mut self, batch: &[SensorSample]) {
        if !self.state().accepts_samples() || self.discarding() {
            debug!(
                state = %self.state(),
                samples.count = batch.len(),
                "Dropping sample batch outside a live session"
            );
            return;
        }
        let elapsed = self.timer.elapsed_seconds(self.collaborators.clock.now());
        let snapshot = self.aggregator.apply_batch(batch, elapsed);
        self.publish_metrics(snapshot);
    }

    fn apply_location(&mut self, point: Coordinate) {
        if self.state() != SessionState::Active {
            debug!(state = %self.state(), "Dropping location outside an active session");
            return;
        }
        self.user_path.push(point);

        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };
        let update = tracker.observe(point);
        if let Some(session_id) = self.session_id() {
            for event in &update.events {
                SessionLogger::log_proximity_event(session_id, *event);
            }
        }
        for event in update.events {
            self.observers.proximity_event(event);
        }
        self.observers.course_progress(&update.progress);
    }

    async fn collection_state_changed(&mut self, state: CollectionState, at: DateTime<Utc>) {
        let current = self.state();
        match (state, current) {
            (CollectionState::Paused, SessionState::Active) => {
                info!("Collection paused by the service");
                self.timer.pause(at);
                self.commit(SessionState::Paused, at);
            }
            (CollectionState::Running, SessionState::Paused) => {
                info!("Collection resumed by the service");
                self.timer.resume(at);
                self.commit(SessionState::Active, at);
            }
            (CollectionState::Ended, SessionState::Ending) => self.acknowledge_end(at).await,
            (CollectionState::Ended, SessionState::Active | SessionState::Paused) => {
                let reason = "collection ended before the session was ended";
                self.abort_to(SessionState::Aborted, at, reason);
                self.report("collection", &CollectionError::Failed(reason.to_owned()).into());
            }
            (
                CollectionState::Failed(reason),
                SessionState::Active | SessionState::Paused | SessionState::Ending,
            ) => {
                self.abort_to(SessionState::Aborted, at, &reason);
                self.report("collection", &CollectionError::Failed(reason).into());
            }
            (state, current) => {
                debug!(?state, %current, "Ignoring collection state change");
            }
        }
    }

    async fn acknowledge_end(&mut self, at: DateTime<Utc>) {
        let Some(pending) = self.pending_end.take() else {
            return;
        };
        self.commit(SessionState::Ended, at);

        let active_seconds = self.timer.elapsed_seconds(at);
        let metrics = self.aggregator.snapshot();
        if let Some(session_id) = self.session_id() {
            SessionLogger::log_session_ended(
                session_id,
                active_seconds,
                metrics.distance_meters,
                pending.with_summary,
            );
        }

        let (finalized, finalize_error) = self.finalize().await;

        if !pending.with_summary {
            let now = self.collaborators.clock.now();
            self.commit(SessionState::NotStarted, now);
            self.clear();
            let outcome = EndOutcome::Discarded;
            self.observers.session_finished(&outcome);
            let _ = pending.outcome.send(Ok(outcome));
            return;
        }

        let Some(session) = self.session.clone() else {
            let _ = pending.outcome.send(Err(SessionError::EngineStopped));
            return;
        };
        let mut summary = SessionSummary {
            session,
            metrics,
            course: self.guide.clone(),
            user_path: self.user_path.clone(),
            active_duration_seconds: active_seconds,
            finalized,
            finalize_error,
            recorded: false,
        };
        summary.recorded = self.persist(&summary).await;

        let outcome = EndOutcome::Summary(Box::new(summary));
        self.observers.session_finished(&outcome);
        let _ = pending.outcome.send(Ok(outcome));
    }

    async fn finalize(&self) -> (Option<FinalizedSession>, Option<FinalizeError>) {
        match self.collaborators.collection.finalize().await {
            Ok(finalized) => (Some(finalized), None),
            Err(error) => {
                self.report("collection", &error.clone().into());
                (None, Some(error))
            }
        }
    }

    /// Hand the record to persistence when the session lasted long enough
    async fn persist(&self, summary: &SessionSummary) -> bool {
        let min_seconds = self.config.session.min_record_duration.as_secs_f64();
        if summary.active_duration_seconds < min_seconds {
            info!(
                session.id = %summary.session.id,
                active_seconds = summary.active_duration_seconds,
                "Session too short to record"
            );
            return false;
        }
        let Some(record) = RunningRecord::from_summary(summary) else {
            return false;
        };
        match self.collaborators.records.save_record(&record).await {
            Ok(()) => true,
            Err(error) => {
                self.report("records", &error.into());
                false
            }
        }
    }

    fn acknowledgement_timed_out(&mut self) {
        let Some(pending) = self.pending_end.as_mut() else {
            return;
        };
        pending.deadline = None;
        let waited = pending.timeout.unwrap_or_default();
        warn!(
            session.id = ?self.session_id(),
            waited_secs = waited.as_secs(),
            "End of session still not acknowledged"
        );
        self.report("collection", &SessionError::AcknowledgementTimeout { waited });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending::<()>().await,
    }
}
