// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Moodo crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Telegram chat identifier. Private chats make this equal to the user id.
pub type ChatId = i64;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// An inbound text message received from the messaging channel.
///
/// Anything without a text payload is filtered out before this point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Transport-level update identifier, used for deduplication.
    pub update_id: i64,
    /// Chat (and, for private chats, user) identifier.
    pub chat_id: ChatId,
    /// Raw message text as received.
    pub text: String,
    /// RFC 3339 receive timestamp.
    pub timestamp: String,
}

/// An outbound text message to be delivered via the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
}

impl OutboundMessage {
    /// Convenience constructor for a plain text reply.
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}
