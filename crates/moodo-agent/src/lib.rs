// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent loop and message dispatch for the Moodo joy-journal agent.
//!
//! The [`AgentLoop`] is the central coordinator: it receives messages from
//! the channel adapter, routes each through the [`Dispatcher`], and keeps
//! running until cancellation. Per-message failures are logged, never fatal.

pub mod dialog;
pub mod dispatch;
pub mod grammar;
pub mod replies;
pub mod summary;

use std::sync::Arc;

use moodo_core::{ChannelAdapter, MoodoError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub use dispatch::Dispatcher;

/// The main agent loop coordinating channel and dispatcher.
pub struct AgentLoop {
    channel: Arc<dyn ChannelAdapter>,
    dispatcher: Dispatcher,
}

impl AgentLoop {
    pub fn new(channel: Arc<dyn ChannelAdapter>, dispatcher: Dispatcher) -> Self {
        Self { channel, dispatcher }
    }

    /// Runs until the cancellation token fires or the channel closes.
    ///
    /// A failed message is logged and the loop moves on: one user's
    /// trouble must never block anyone else's messages.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), MoodoError> {
        info!("agent loop running");

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => {
                            if let Err(e) = self.dispatcher.handle_message(inbound).await {
                                error!(error = %e, "failed to handle inbound message");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        info!("agent loop stopped");
        Ok(())
    }
}
