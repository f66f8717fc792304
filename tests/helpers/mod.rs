// ABOUTME: Shared test helpers for session engine integration tests
// ABOUTME: Builds a controller wired to in-memory collaborators on a manual clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod fakes;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use outline_workout::clock::ManualClock;
use outline_workout::config::EngineConfig;
use outline_workout::session::{SessionCollaborators, WorkoutSessionController};

use fakes::{FakeCollectionService, MemoryRecordSink, RecordingCompanion, RecordingObserver};

/// Fixed start instant so assertions on timestamps are exact
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 17, 6, 30, 0).unwrap()
}

/// Controller plus handles on every fake it talks to
pub struct Harness {
    pub controller: WorkoutSessionController,
    pub clock: ManualClock,
    pub collection: Arc<FakeCollectionService>,
    pub observer: Arc<RecordingObserver>,
    pub companion: Arc<RecordingCompanion>,
    pub records: Arc<MemoryRecordSink>,
}

impl Harness {
    /// Default configuration, end acknowledged immediately
    pub fn new() -> Self {
        Self::with(EngineConfig::default(), FakeCollectionService::acknowledging())
    }

    /// Default configuration with a caller-built collection service
    pub fn with_collection(collection: FakeCollectionService) -> Self {
        Self::with(EngineConfig::default(), collection)
    }

    pub fn with(config: EngineConfig, collection: FakeCollectionService) -> Self {
        Self::build(config, collection, MemoryRecordSink::default())
    }

    pub fn build(
        config: EngineConfig,
        collection: FakeCollectionService,
        records: MemoryRecordSink,
    ) -> Self {
        let clock = ManualClock::new(t0());
        let collection = Arc::new(collection);
        let observer = Arc::new(RecordingObserver::default());
        let companion = Arc::new(RecordingCompanion::default());
        let records = Arc::new(records);

        let collaborators = SessionCollaborators::new(collection.clone())
            .with_companion(companion.clone())
            .with_records(records.clone())
            .with_clock(Arc::new(clock.clone()));
        let controller = WorkoutSessionController::spawn(config, collaborators);
        controller.register_observer(observer.clone()).unwrap();

        Self {
            controller,
            clock,
            collection,
            observer,
            companion,
            records,
        }
    }

    /// Wait until every command queued so far has been applied
    pub async fn settle(&self) {
        self.controller.session().await.unwrap();
    }
}
