// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging transport.

use async_trait::async_trait;

use crate::error::MoodoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, OutboundMessage};

/// Adapter for a bidirectional messaging channel.
///
/// The dispatcher and the schedulers only ever talk to the messaging
/// platform through this trait, which keeps them testable against an
/// in-memory fake.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes the connection and starts receiving inbound messages.
    async fn connect(&mut self) -> Result<(), MoodoError>;

    /// Sends one text message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<(), MoodoError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, MoodoError>;
}
