// ABOUTME: Replays a scripted workout through the session engine and prints every event as JSON
// ABOUTME: Drives start/pause/resume/end, sample batches and locations on a manual clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Replay a script, printing one JSON event per line
//! outline-replay --script demos/river_loop.json
//!
//! # Only print the final outcome
//! outline-replay --script demos/river_loop.json --summary-only
//! ```
//!
//! Script format:
//! ```json
//! {
//!   "activity": "run",
//!   "guide": { "course_name": "River", "path": [{ "latitude": 37.5, "longitude": 127.0 }] },
//!   "steps": [
//!     { "at_secs": 0, "action": "start" },
//!     { "at_secs": 30, "action": "samples", "samples": [{ "kind": "distance", "cumulative_sum": 95.0 }] },
//!     { "at_secs": 31, "action": "location", "latitude": 37.5, "longitude": 127.0 },
//!     { "at_secs": 600, "action": "end", "with_summary": true }
//!   ]
//! }
//! ```

use std::fs;
use std::mem;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use outline_workout::clock::{Clock, ManualClock};
use outline_workout::collection::{
    CollectionRequest, CollectionService, CollectionSink, CollectionState,
};
use outline_workout::config::EngineConfig;
use outline_workout::errors::{CollectionError, FinalizeError};
use outline_workout::logging::{LogFormat, LoggingConfig};
use outline_workout::models::{
    ActivityType, Coordinate, CourseGuide, EndOutcome, FinalizedSession, SensorSample,
};
use outline_workout::observers::SessionEvent;
use outline_workout::session::{PendingEnd, SessionCollaborators, WorkoutSessionController};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "outline-replay",
    about = "Replay a scripted workout through the Outline session engine",
    long_about = "Feeds a JSON workout script through the live session engine on a manual clock and prints every session event as JSON."
)]
struct Cli {
    /// Path to the JSON workout script
    #[arg(long, short = 's')]
    script: PathBuf,

    /// Print only the final outcome
    #[arg(long)]
    summary_only: bool,

    /// Log level for engine diagnostics (written to stderr)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    activity: ActivityType,
    #[serde(default)]
    guide: Option<CourseGuide>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    at_secs: i64,
    #[serde(flatten)]
    action: Action,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Action {
    Start,
    Pause,
    Resume,
    End {
        #[serde(default = "default_with_summary")]
        with_summary: bool,
    },
    Abort {
        #[serde(default)]
        reason: String,
    },
    Reset,
    Samples {
        samples: Vec<SensorSample>,
    },
    Location {
        latitude: f64,
        longitude: f64,
    },
    /// Collection service reports a state change of its own
    Collection {
        state: CollectionState,
    },
}

const fn default_with_summary() -> bool {
    true
}

/// Collection service that acknowledges every end request immediately
struct ReplayCollection {
    clock: ManualClock,
    sink: Mutex<Option<CollectionSink>>,
    started: Mutex<Option<CollectionRequest>>,
}

impl ReplayCollection {
    fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            sink: Mutex::new(None),
            started: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CollectionService for ReplayCollection {
    async fn begin_collection(
        &self,
        request: CollectionRequest,
        sink: CollectionSink,
    ) -> Result<(), CollectionError> {
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
        *self.started.lock().unwrap_or_else(PoisonError::into_inner) = Some(request);
        Ok(())
    }

    async fn end_collection(&self, end_time: DateTime<Utc>) {
        let sink = self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(sink) = sink {
            if sink.state_changed(CollectionState::Ended, end_time).is_err() {
                warn!("Session engine stopped before the end could be acknowledged");
            }
        }
    }

    async fn finalize(&self) -> Result<FinalizedSession, FinalizeError> {
        let request = self
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| FinalizeError::new("collection was never started"))?;
        Ok(FinalizedSession {
            workout_id: format!("replay-{}", request.session_id),
            start_time: request.start_time,
            end_time: self.clock.now(),
            total_distance_meters: None,
            total_energy_kcal: None,
        })
    }
}

fn print_events(receiver: &mut broadcast::Receiver<SessionEvent>, quiet: bool) -> Result<()> {
    loop {
        match receiver.try_recv() {
            Ok(event) => {
                if !quiet {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Event stream lagged; increase OUTLINE_EVENT_BUFFER");
            }
            Err(_) => return Ok(()),
        }
    }
}

/// Run one step; returns a pending end when the step requested one
async fn apply(
    controller: &WorkoutSessionController,
    script: &Script,
    at: DateTime<Utc>,
    action: Action,
) -> Option<PendingEnd> {
    let outcome = match action {
        Action::Start => controller
            .start(script.activity, script.guide.clone())
            .await
            .map(|_| None),
        Action::Pause => controller.pause().await.map(|()| None),
        Action::Resume => controller.resume().await.map(|()| None),
        Action::End { with_summary } => controller.end(with_summary).await.map(Some),
        Action::Abort { reason } => controller.abort(reason).await.map(|()| None),
        Action::Reset => controller.reset().await.map(|()| None),
        Action::Samples { samples } => controller.deliver_samples(samples).map(|()| None),
        Action::Location {
            latitude,
            longitude,
        } => controller
            .deliver_location(Coordinate::new(latitude, longitude))
            .map(|()| None),
        Action::Collection { state } => controller
            .collection_state_changed(state, at)
            .map(|()| None),
    };
    outcome.unwrap_or_else(|error| {
        // Rejected operations are part of what a script may want to show
        warn!(error = %error, code = ?error.code(), "Step rejected");
        None
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig {
        level: cli.log_level.clone(),
        format: LogFormat::Compact,
        ..LoggingConfig::from_env()
    }
    .init()?;

    let raw = fs::read_to_string(&cli.script)
        .with_context(|| format!("reading script {}", cli.script.display()))?;
    let mut script: Script = serde_json::from_str(&raw)
        .with_context(|| format!("parsing script {}", cli.script.display()))?;
    let config = EngineConfig::from_env()?;

    let epoch = Utc::now();
    let clock = ManualClock::new(epoch);
    let collaborators = SessionCollaborators::new(Arc::new(ReplayCollection::new(clock.clone())))
        .with_clock(Arc::new(clock.clone()));
    let controller = WorkoutSessionController::spawn(config, collaborators);
    let mut events = controller.subscribe_events();

    info!(steps = script.steps.len(), activity = %script.activity, "Replaying workout script");

    let mut last_outcome: Option<EndOutcome> = None;
    let steps = mem::take(&mut script.steps);
    for step in steps {
        let at = epoch + Duration::seconds(step.at_secs);
        clock.set(at);
        let pending = apply(&controller, &script, at, step.action).await;
        if let Some(pending) = pending {
            match pending.outcome().await {
                Ok(outcome) => last_outcome = Some(outcome),
                Err(error) => warn!(error = %error, "End did not complete"),
            }
        }
        // Round trip so fire-and-forget steps are applied before the clock moves
        controller.session().await?;
        print_events(&mut events, cli.summary_only)?;
    }

    match last_outcome {
        Some(EndOutcome::Summary(summary)) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(EndOutcome::Discarded) => println!(r#"{{"outcome":"discarded"}}"#),
        None => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "outcome": "not_ended",
                "state": controller.state(),
                "metrics": controller.metrics(),
            }))?
        ),
    }
    Ok(())
}
