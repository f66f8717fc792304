// ABOUTME: Outbound running-state notifications for a paired companion process
// ABOUTME: CompanionSync trait, the JSON message contract and channel/no-op implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Companion sync is one-way and best effort. The controller calls
//! [`CompanionSync::notify_running`] after every committed transition; a
//! failed delivery is logged by the implementation and never retried.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Message sent to the companion process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompanionMessage {
    /// The session moved into or out of `Active`
    RunningStateChanged {
        /// Whether the session is now `Active`
        is_running: bool,
    },
}

impl CompanionMessage {
    /// Wire representation
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a message received from the wire
    ///
    /// # Errors
    ///
    /// Returns an error for unknown message types or malformed JSON
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Best-effort notifier of the running state
pub trait CompanionSync: Send + Sync {
    /// Tell the companion whether the session is running; must not block
    fn notify_running(&self, is_running: bool);
}

/// Companion sync that drops every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompanion;

impl CompanionSync for NoopCompanion {
    fn notify_running(&self, _is_running: bool) {}
}

/// Companion sync that forwards messages to a transport task over a channel
#[derive(Debug, Clone)]
pub struct ChannelCompanion {
    sender: mpsc::UnboundedSender<CompanionMessage>,
}

impl ChannelCompanion {
    /// Create the notifier and the receiver the transport reads from
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CompanionMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl CompanionSync for ChannelCompanion {
    fn notify_running(&self, is_running: bool) {
        if self
            .sender
            .send(CompanionMessage::RunningStateChanged { is_running })
            .is_err()
        {
            debug!(is_running, "Companion transport closed; notification dropped");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let json = CompanionMessage::RunningStateChanged { is_running: true }
            .to_json()
            .unwrap();
        assert_eq!(json, r#"{"type":"running_state_changed","is_running":true}"#);
        assert_eq!(
            CompanionMessage::from_json(&json).unwrap(),
            CompanionMessage::RunningStateChanged { is_running: true }
        );
    }

    #[test]
    fn test_closed_transport_is_ignored() {
        let (companion, receiver) = ChannelCompanion::new();
        drop(receiver);
        companion.notify_running(false);
    }
}
