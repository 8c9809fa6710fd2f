// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the Moodo workspace.

use std::sync::Mutex;

use async_trait::async_trait;
use moodo_core::{
    AdapterType, ChannelAdapter, HealthStatus, InboundMessage, MoodoError, OutboundMessage,
    PluginAdapter,
};

/// Channel fake that records every outbound send and has no inbound side.
///
/// Used to assert the single-send invariant: tests count `sent()` entries
/// per handled message.
pub struct RecordingChannel {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything sent so far, in order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoodoError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for RecordingChannel {
    async fn connect(&mut self) -> Result<(), MoodoError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), MoodoError> {
        self.sent.lock().unwrap().push(msg);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundMessage, MoodoError> {
        Err(MoodoError::Channel {
            message: "recording channel has no inbound side".into(),
            source: None,
        })
    }
}
