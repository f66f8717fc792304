// ABOUTME: Environment-based configuration for the workout session engine
// ABOUTME: Proximity thresholds, end acknowledgement timeout and session limits parsed from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use outline_core::constants::{proximity_defaults, session_defaults};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{SessionError, SessionResult};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Shipped builds
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Distances that trigger course proximity events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// `NearEnd` fires when the finish is closer than this, in meters
    pub near_end_meters: f64,
    /// `AtEnd` fires when the finish is closer than this, in meters
    pub at_end_meters: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            near_end_meters: proximity_defaults::NEAR_END_METERS,
            at_end_meters: proximity_defaults::AT_END_METERS,
        }
    }
}

impl ProximityConfig {
    /// Check that both thresholds are positive and `AtEnd` is the stricter one
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` describing the first invalid value
    pub fn validate(&self) -> SessionResult<()> {
        for (name, value) in [
            ("OUTLINE_NEAR_END_METERS", self.near_end_meters),
            ("OUTLINE_AT_END_METERS", self.at_end_meters),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SessionError::config(format!(
                    "{name} must be a positive number of meters, got {value}"
                )));
            }
        }
        if self.at_end_meters >= self.near_end_meters {
            return Err(SessionError::config(format!(
                "OUTLINE_AT_END_METERS ({}) must be smaller than OUTLINE_NEAR_END_METERS ({})",
                self.at_end_meters, self.near_end_meters
            )));
        }
        Ok(())
    }
}

/// Session lifecycle limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long to wait in `Ending` before reporting a missing acknowledgement
    ///
    /// `None` waits forever. The session stays in `Ending` either way; the
    /// timeout only reports the problem on the error channel.
    pub end_ack_timeout: Option<Duration>,
    /// Sessions with less active time are ended without handing a record to persistence
    pub min_record_duration: Duration,
    /// Capacity of the broadcast event stream
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            end_ack_timeout: None,
            min_record_duration: Duration::from_secs(session_defaults::MIN_RECORD_SECONDS),
            event_buffer: session_defaults::EVENT_BUFFER,
        }
    }
}

impl SessionConfig {
    /// Check the limits are usable
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for a zero timeout or an empty event buffer
    pub fn validate(&self) -> SessionResult<()> {
        if self.end_ack_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(SessionError::config(
                "OUTLINE_END_ACK_TIMEOUT_SECS must be greater than zero; unset it to wait forever",
            ));
        }
        if self.event_buffer == 0 {
            return Err(SessionError::config(
                "OUTLINE_EVENT_BUFFER must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Course proximity thresholds
    pub proximity: ProximityConfig,
    /// Session lifecycle limits
    pub session: SessionConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` if a variable cannot be parsed or the
    /// resulting configuration is invalid
    pub fn from_env() -> SessionResult<Self> {
        let environment = env::var("ENVIRONMENT")
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let proximity = ProximityConfig {
            near_end_meters: parse_env_or(
                "OUTLINE_NEAR_END_METERS",
                proximity_defaults::NEAR_END_METERS,
            )?,
            at_end_meters: parse_env_or("OUTLINE_AT_END_METERS", proximity_defaults::AT_END_METERS)?,
        };

        let session = SessionConfig {
            end_ack_timeout: parse_optional_env::<u64>("OUTLINE_END_ACK_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            min_record_duration: Duration::from_secs(parse_env_or(
                "OUTLINE_MIN_RECORD_SECS",
                session_defaults::MIN_RECORD_SECONDS,
            )?),
            event_buffer: parse_env_or("OUTLINE_EVENT_BUFFER", session_defaults::EVENT_BUFFER)?,
        };

        let config = Self {
            environment,
            proximity,
            session,
        };
        config.validate()?;
        info!("Engine configuration loaded: {}", config.summary());
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first `SessionError::Config` found
    pub fn validate(&self) -> SessionResult<()> {
        self.proximity.validate()?;
        self.session.validate()
    }

    /// One-line summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        let timeout = self
            .session
            .end_ack_timeout
            .map_or_else(|| "none".to_owned(), |timeout| format!("{}s", timeout.as_secs()));
        format!(
            "environment={} near_end={}m at_end={}m end_ack_timeout={} min_record={}s event_buffer={}",
            self.environment,
            self.proximity.near_end_meters,
            self.proximity.at_end_meters,
            timeout,
            self.session.min_record_duration.as_secs(),
            self.session.event_buffer,
        )
    }
}

/// Read `key`, treating unset and blank values as absent
fn read_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_optional_env<T>(key: &str) -> SessionResult<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    read_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| SessionError::config(format!("{key}={raw:?} is not valid: {e}")))
        })
        .transpose()
}

fn parse_env_or<T>(key: &str, default: T) -> SessionResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    Ok(parse_optional_env(key)?.unwrap_or(default))
}
