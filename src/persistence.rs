// ABOUTME: Boundary to the collaborator that stores finished running records
// ABOUTME: RecordSink trait and a sink that drops records for hosts without storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use outline_core::errors::RecordError;
use outline_core::models::RunningRecord;
use tracing::debug;

/// Stores finished running records; the storage format is its own business
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist one finished record
    async fn save_record(&self, record: &RunningRecord) -> Result<(), RecordError>;
}

/// Sink for hosts that do not keep records
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardRecords;

#[async_trait]
impl RecordSink for DiscardRecords {
    async fn save_record(&self, record: &RunningRecord) -> Result<(), RecordError> {
        debug!(record.id = %record.id, "No record storage configured; record dropped");
        Ok(())
    }
}
