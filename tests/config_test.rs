// ABOUTME: Tests for loading engine configuration from environment variables
// ABOUTME: Defaults, overrides, blank values, parse failures and validation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::time::Duration;

use outline_workout::config::{EngineConfig, Environment, ProximityConfig, SessionConfig};
use outline_workout::errors::{ErrorCode, SessionError};
use serial_test::serial;

const VARS: [&str; 6] = [
    "ENVIRONMENT",
    "OUTLINE_NEAR_END_METERS",
    "OUTLINE_AT_END_METERS",
    "OUTLINE_END_ACK_TIMEOUT_SECS",
    "OUTLINE_MIN_RECORD_SECS",
    "OUTLINE_EVENT_BUFFER",
];

fn clear_env() {
    for key in VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_unset_variables_use_defaults() {
    clear_env();

    let config = EngineConfig::from_env().unwrap();

    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.environment, Environment::Development);
    assert!((config.proximity.near_end_meters - 30.0).abs() < f64::EPSILON);
    assert!((config.proximity.at_end_meters - 5.0).abs() < f64::EPSILON);
    assert_eq!(config.session.end_ack_timeout, None);
    assert_eq!(config.session.min_record_duration, Duration::from_secs(3));
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    clear_env();
    env::set_var("ENVIRONMENT", "production");
    env::set_var("OUTLINE_NEAR_END_METERS", "50");
    env::set_var("OUTLINE_AT_END_METERS", "8.5");
    env::set_var("OUTLINE_END_ACK_TIMEOUT_SECS", "20");
    env::set_var("OUTLINE_MIN_RECORD_SECS", "60");
    env::set_var("OUTLINE_EVENT_BUFFER", "64");

    let config = EngineConfig::from_env().unwrap();
    clear_env();

    assert!(config.environment.is_production());
    assert!((config.proximity.near_end_meters - 50.0).abs() < f64::EPSILON);
    assert!((config.proximity.at_end_meters - 8.5).abs() < f64::EPSILON);
    assert_eq!(
        config.session.end_ack_timeout,
        Some(Duration::from_secs(20))
    );
    assert_eq!(config.session.min_record_duration, Duration::from_secs(60));
    assert_eq!(config.session.event_buffer, 64);
    assert!(config.summary().contains("end_ack_timeout=20s"));
}

#[test]
#[serial]
fn test_blank_values_count_as_unset() {
    clear_env();
    env::set_var("OUTLINE_END_ACK_TIMEOUT_SECS", "  ");
    env::set_var("OUTLINE_NEAR_END_METERS", "");

    let config = EngineConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.session.end_ack_timeout, None);
    assert!((config.proximity.near_end_meters - 30.0).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_unparseable_value_is_a_config_error() {
    clear_env();
    env::set_var("OUTLINE_MIN_RECORD_SECS", "three");

    let error = EngineConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code(), ErrorCode::ConfigInvalid);
    assert!(error.to_string().contains("OUTLINE_MIN_RECORD_SECS"));
}

#[test]
#[serial]
fn test_zero_timeout_is_rejected() {
    clear_env();
    env::set_var("OUTLINE_END_ACK_TIMEOUT_SECS", "0");

    let result = EngineConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(SessionError::Config { .. })));
}

#[test]
#[serial]
fn test_inverted_thresholds_are_rejected() {
    clear_env();
    env::set_var("OUTLINE_NEAR_END_METERS", "10");
    env::set_var("OUTLINE_AT_END_METERS", "25");

    let result = EngineConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(SessionError::Config { .. })));
}

#[test]
fn test_validation_without_environment() {
    let negative = ProximityConfig {
        near_end_meters: -1.0,
        at_end_meters: 0.5,
    };
    assert!(negative.validate().is_err());

    let no_buffer = SessionConfig {
        event_buffer: 0,
        ..SessionConfig::default()
    };
    assert!(no_buffer.validate().is_err());

    assert!(EngineConfig::default().validate().is_ok());
}
