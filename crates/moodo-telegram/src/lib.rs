// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Moodo joy-journal agent.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide.
//! Long polling is driven by hand with `getUpdates` so the offset cursor
//! lives in storage: at-least-once delivery from Telegram survives
//! restarts, and the dispatcher's dedup table absorbs redelivery.

pub mod handler;

use std::time::Duration;

use async_trait::async_trait;
use moodo_config::model::TelegramConfig;
use moodo_core::error::MoodoError;
use moodo_core::traits::{ChannelAdapter, PluginAdapter};
use moodo_core::types::{AdapterType, HealthStatus, InboundMessage, OutboundMessage};
use moodo_storage::Database;
use moodo_storage::queries::dedup;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient, UpdateKind};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long to back off after a failed getUpdates call.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects via long polling with a storage-backed offset cursor, filters
/// messages to authorized private-chat text, and sends plain-text replies.
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    db: Database,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig, db: Database) -> Result<Self, MoodoError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            MoodoError::Config("telegram.bot_token is required for the Telegram channel".into())
        })?;

        if token.is_empty() {
            return Err(MoodoError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            db,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodoError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), MoodoError> {
        debug!("Telegram channel shutting down");
        // The polling handle is aborted when TelegramChannel is dropped.
        // For graceful shutdown, the agent loop stops calling receive() first.
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), MoodoError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let db = self.db.clone();
        let tx = self.inbound_tx.clone();
        let allowed_users = self.config.allowed_users.clone();
        let poll_timeout = self.config.poll_timeout_secs;

        let mut offset = dedup::load_cursor(&db).await?.unwrap_or(0);
        info!(offset, "starting Telegram long polling");

        let handle = tokio::spawn(async move {
            loop {
                let request = if offset > 0 {
                    bot.get_updates().offset(offset as i32).timeout(poll_timeout)
                } else {
                    bot.get_updates().timeout(poll_timeout)
                };

                let updates = match request.await {
                    Ok(updates) => updates,
                    Err(e) => {
                        warn!(error = %e, "getUpdates failed, retrying after delay");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                };

                for update in updates {
                    let update_id = i64::from(update.id.0);
                    offset = offset.max(update_id + 1);

                    let UpdateKind::Message(msg) = update.kind else {
                        continue;
                    };
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        continue;
                    }
                    if !handler::is_authorized(msg.chat.id.0, &allowed_users) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        continue;
                    }
                    let Some(inbound) = handler::to_inbound(update_id, &msg) else {
                        debug!(update_id, "ignoring non-text message");
                        continue;
                    };
                    if tx.send(inbound).await.is_err() {
                        warn!("inbound channel closed, stopping polling task");
                        return;
                    }
                }

                // Persist the cursor after each batch so a restart resumes
                // where we left off instead of refetching the backlog.
                if let Err(e) = dedup::store_cursor(&db, offset).await {
                    warn!(error = %e, "failed to persist poll cursor");
                }
            }
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), MoodoError> {
        self.bot
            .send_message(Recipient::Id(ChatId(msg.chat_id)), &msg.text)
            .await
            .map_err(|e| MoodoError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn receive(&self) -> Result<InboundMessage, MoodoError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| MoodoError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}
