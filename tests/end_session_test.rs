// ABOUTME: Integration tests for ending a session with and without a summary
// ABOUTME: Acknowledgement handling, finalize and persistence failures, timeouts and aborts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use helpers::fakes::{CollectionCall, FakeCollectionService, MemoryRecordSink};
use helpers::{t0, Harness};
use outline_workout::collection::CollectionState;
use outline_workout::config::{EngineConfig, SessionConfig};
use outline_workout::errors::{ErrorCode, SessionError};
use outline_workout::models::{
    ActivityType, EndOutcome, SensorSample, SessionState, SessionSummary,
};
use outline_workout::observers::SessionEvent;
use tokio::time::sleep;

fn into_summary(outcome: EndOutcome) -> SessionSummary {
    match outcome {
        EndOutcome::Summary(summary) => *summary,
        EndOutcome::Discarded => panic!("expected a summary"),
    }
}

async fn run_for(harness: &Harness, seconds: i64, distance: f64) {
    harness.controller.start(ActivityType::Run, None).await.unwrap();
    harness.clock.advance_secs(seconds);
    harness
        .controller
        .deliver_samples(vec![
            SensorSample::distance(distance),
            SensorSample::heart_rate(152.0, 146.0),
            SensorSample::active_energy(distance / 20.0),
        ])
        .unwrap();
}

#[tokio::test]
async fn test_end_with_summary_finalizes_and_records() {
    let harness = Harness::new();
    run_for(&harness, 600, 2000.0).await;

    let summary = into_summary(
        harness
            .controller
            .end(true)
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap(),
    );

    let end_time = t0() + ChronoDuration::seconds(600);
    assert_eq!(summary.session.state(), SessionState::Ended);
    assert_eq!(summary.session.end_time(), Some(end_time));
    assert!((summary.active_duration_seconds - 600.0).abs() < 1e-9);
    assert!((summary.metrics.distance_meters - 2000.0).abs() < 1e-9);
    assert!(!summary.is_incomplete());
    assert!(summary.recorded);
    assert_eq!(
        summary.finalized.as_ref().unwrap().workout_id,
        format!("workout-{}", summary.session.id)
    );

    let records = harness.records.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].session_id, summary.session.id);
    assert!((records[0].health.total_running_distance_meters - 2000.0).abs() < 1e-9);
    assert_eq!(records[0].health.end_date, end_time);

    assert_eq!(harness.controller.state(), SessionState::Ended);
    assert_eq!(
        harness.collection.calls(),
        vec![
            CollectionCall::Begin(ActivityType::Run),
            CollectionCall::End,
            CollectionCall::Finalize,
        ]
    );
    assert!(harness.observer.events().iter().any(|event| matches!(
        event,
        SessionEvent::SessionFinished {
            summary: Some(_),
            incomplete: false,
        }
    )));
}

#[tokio::test]
async fn test_ended_session_needs_reset_before_next_start() {
    let harness = Harness::new();
    run_for(&harness, 60, 150.0).await;
    harness
        .controller
        .end(true)
        .await
        .unwrap()
        .outcome()
        .await
        .unwrap();

    assert!(harness.controller.start(ActivityType::Run, None).await.is_err());
    harness.controller.reset().await.unwrap();
    assert!(harness.controller.metrics().is_zeroed());
    harness.controller.start(ActivityType::Run, None).await.unwrap();
}

#[tokio::test]
async fn test_end_without_summary_zeroes_metrics_and_clears_session() {
    let harness = Harness::with_collection(FakeCollectionService::new());
    run_for(&harness, 300, 900.0).await;

    let pending = harness.controller.end(false).await.unwrap();
    assert_eq!(harness.controller.state(), SessionState::Ending);
    assert!(harness.controller.metrics().is_zeroed());

    // Late samples while discarding must not resurrect metrics
    harness
        .controller
        .deliver_samples(vec![SensorSample::distance(950.0)])
        .unwrap();
    harness.settle().await;
    assert!(harness.controller.metrics().is_zeroed());

    harness.collection.report(CollectionState::Ended, t0());
    assert_eq!(pending.outcome().await.unwrap(), EndOutcome::Discarded);

    assert_eq!(harness.controller.state(), SessionState::NotStarted);
    assert!(harness.controller.session().await.unwrap().is_none());
    assert!(harness.controller.user_path().await.unwrap().is_empty());
    assert!(harness.records.records().is_empty());
    assert_eq!(
        harness.observer.transitions(),
        vec![
            (SessionState::NotStarted, SessionState::Active),
            (SessionState::Active, SessionState::Ending),
            (SessionState::Ending, SessionState::Ended),
            (SessionState::Ended, SessionState::NotStarted),
        ]
    );

    harness.controller.start(ActivityType::Walk, None).await.unwrap();
}

#[tokio::test]
async fn test_short_session_is_not_recorded() {
    let harness = Harness::new();
    run_for(&harness, 2, 5.0).await;

    let summary = into_summary(
        harness
            .controller
            .end(true)
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap(),
    );

    assert!(!summary.recorded);
    assert!(harness.records.records().is_empty());
    assert!(harness.observer.error_codes().is_empty());
}

#[tokio::test]
async fn test_finalize_failure_yields_incomplete_summary() {
    let harness = Harness::with_collection(
        FakeCollectionService::acknowledging().with_finalize_failure("health store locked"),
    );
    run_for(&harness, 120, 400.0).await;

    let summary = into_summary(
        harness
            .controller
            .end(true)
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap(),
    );

    assert!(summary.is_incomplete());
    assert!(summary.finalized.is_none());
    assert_eq!(summary.session.state(), SessionState::Ended);
    assert!((summary.metrics.distance_meters - 400.0).abs() < 1e-9);
    assert_eq!(harness.observer.error_codes(), vec![ErrorCode::FinalizeFailed]);
    assert!(harness.observer.events().iter().any(|event| matches!(
        event,
        SessionEvent::SessionFinished {
            incomplete: true,
            ..
        }
    )));
}

#[tokio::test]
async fn test_persistence_failure_is_reported() {
    let harness = Harness::build(
        EngineConfig::default(),
        FakeCollectionService::acknowledging(),
        MemoryRecordSink::rejecting(),
    );
    run_for(&harness, 600, 1800.0).await;

    let summary = into_summary(
        harness
            .controller
            .end(true)
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap(),
    );

    assert!(!summary.recorded);
    assert_eq!(
        harness.observer.error_codes(),
        vec![ErrorCode::PersistenceFailed]
    );
}

#[tokio::test]
async fn test_session_stays_ending_until_acknowledged() {
    let harness = Harness::with_collection(FakeCollectionService::new());
    run_for(&harness, 240, 700.0).await;

    let pending = harness.controller.end(true).await.unwrap();

    // Samples still arriving while ending are applied
    harness.clock.advance_secs(5);
    harness
        .controller
        .deliver_samples(vec![SensorSample::distance(720.0)])
        .unwrap();
    harness.settle().await;
    assert_eq!(harness.controller.state(), SessionState::Ending);
    assert!((harness.controller.metrics().distance_meters - 720.0).abs() < 1e-9);

    let acknowledged_at = t0() + ChronoDuration::seconds(250);
    harness.clock.set(acknowledged_at);
    harness
        .collection
        .report(CollectionState::Ended, acknowledged_at);

    let summary = into_summary(pending.outcome().await.unwrap());
    assert_eq!(summary.session.end_time(), Some(acknowledged_at));
    assert!((summary.metrics.distance_meters - 720.0).abs() < 1e-9);
    // Active time stopped when end was requested
    assert!((summary.active_duration_seconds - 240.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_acknowledgement_timeout_reports_and_keeps_waiting() {
    let config = EngineConfig {
        session: SessionConfig {
            end_ack_timeout: Some(Duration::from_secs(10)),
            ..SessionConfig::default()
        },
        ..EngineConfig::default()
    };
    let harness = Harness::with(config, FakeCollectionService::new());
    run_for(&harness, 60, 200.0).await;

    let pending = harness.controller.end(true).await.unwrap();
    sleep(Duration::from_secs(11)).await;
    harness.settle().await;

    assert_eq!(harness.controller.state(), SessionState::Ending);
    assert_eq!(
        harness.observer.error_codes(),
        vec![ErrorCode::AcknowledgementTimeout]
    );

    // A late acknowledgement still completes the end
    harness.collection.report(CollectionState::Ended, t0());
    assert!(matches!(
        pending.outcome().await.unwrap(),
        EndOutcome::Summary(_)
    ));
    assert_eq!(harness.controller.state(), SessionState::Ended);
}

#[tokio::test]
async fn test_abort_while_ending_resolves_pending_end() {
    let harness = Harness::with_collection(FakeCollectionService::new());
    run_for(&harness, 30, 90.0).await;

    let pending = harness.controller.end(true).await.unwrap();
    harness.controller.abort("watch removed").await.unwrap();

    let error = pending.outcome().await.unwrap_err();
    assert_eq!(error, SessionError::aborted("watch removed"));
    assert_eq!(harness.controller.state(), SessionState::Aborted);

    // A stale acknowledgement after the abort changes nothing
    harness.collection.report(CollectionState::Ended, t0());
    harness.settle().await;
    assert_eq!(harness.controller.state(), SessionState::Aborted);
    assert!(harness.records.records().is_empty());
}

#[tokio::test]
async fn test_end_rejected_twice() {
    let harness = Harness::with_collection(FakeCollectionService::new());
    run_for(&harness, 30, 90.0).await;

    let _pending = harness.controller.end(true).await.unwrap();
    assert!(matches!(
        harness.controller.end(true).await,
        Err(SessionError::InvalidTransition {
            from: SessionState::Ending,
            ..
        })
    ));
}
