// ABOUTME: Logging configuration and structured logging setup for the session engine
// ABOUTME: Configures log levels, output format and session-scoped structured log events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging built on `tracing`

use std::env;
use std::io;

use anyhow::Result;
use outline_core::constants::service_names;
use outline_core::models::{ActivityType, ProximityEvent, RunningMode, SessionState};
use tracing::{info, warn, Level};
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

use crate::config::Environment;

/// Logging configuration
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)] // Each flag toggles an independent formatter feature
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span information for tracing
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Deployment environment
    pub environment: Environment,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for replays and terminals
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::OUTLINE_WORKOUT.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: Environment::Development,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT")
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let is_production = environment.is_production();

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::OUTLINE_WORKOUT.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Build the level filter, keeping the engine crates at the configured level
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(&self.level),
            |directive| EnvFilter::new(&directive),
        );
        crate_directives(&self.level)
            .into_iter()
            .fold(base, EnvFilter::add_directive)
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);

                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            log.location = self.include_location,
            log.thread = self.include_thread,
            log.spans = self.include_spans,
            "Outline workout engine starting up"
        );
    }
}

/// Per-crate directives pinning the engine crates to `level`
///
/// Empty unless `level` is a bare level name; a full directive list such as
/// `debug,tokio=warn` is left to `EnvFilter` untouched.
fn crate_directives(level: &str) -> Vec<Directive> {
    let Ok(level) = level.trim().parse::<Level>() else {
        return Vec::new();
    };
    ["outline_workout", "outline_intelligence", "outline_core"]
        .into_iter()
        .filter_map(|target| format!("{target}={level}").parse().ok())
        .collect()
}

/// Initialize logging with default configuration
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_default() -> Result<()> {
    LoggingConfig::default().init()
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured log events for the session lifecycle
pub struct SessionLogger;

impl SessionLogger {
    /// Log a newly started session
    pub fn log_session_started(session_id: Uuid, activity: ActivityType, mode: RunningMode) {
        info!(
            session.id = %session_id,
            session.activity = %activity,
            session.mode = ?mode,
            "Workout session started"
        );
    }

    /// Log a committed state transition
    pub fn log_state_transition(session_id: Uuid, from: SessionState, to: SessionState) {
        info!(
            session.id = %session_id,
            session.from = %from,
            session.to = %to,
            "Session state changed"
        );
    }

    /// Log the end of a session once the collection service acknowledged it
    pub fn log_session_ended(
        session_id: Uuid,
        active_seconds: f64,
        distance_meters: f64,
        with_summary: bool,
    ) {
        info!(
            session.id = %session_id,
            session.active_seconds = active_seconds,
            session.distance_meters = distance_meters,
            session.with_summary = with_summary,
            "Workout session ended"
        );
    }

    /// Log a course proximity signal
    pub fn log_proximity_event(session_id: Uuid, event: ProximityEvent) {
        info!(
            session.id = %session_id,
            proximity.event = ?event,
            proximity.remaining_meters = event.remaining_meters(),
            "Course proximity event"
        );
    }

    /// Log a failure reported by an external collaborator
    pub fn log_collaborator_failure(session_id: Option<Uuid>, collaborator: &str, error: &str) {
        warn!(
            session.id = session_id.map(|id| id.to_string()).unwrap_or_default(),
            collaborator = %collaborator,
            error = %error,
            "Collaborator failure"
        );
    }
}
