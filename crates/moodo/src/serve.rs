// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `moodo serve`: wire storage, channel, dispatcher, and schedulers, then
//! run until ctrl-c.

use std::sync::Arc;

use moodo_agent::{AgentLoop, Dispatcher};
use moodo_config::MoodoConfig;
use moodo_core::{ChannelAdapter, MoodoError, PluginAdapter};
use moodo_cron::Scheduler;
use moodo_storage::{Database, EntryStore};
use moodo_telegram::TelegramChannel;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run(config: MoodoConfig) -> Result<(), MoodoError> {
    info!(agent = config.agent.name.as_str(), "starting moodo");

    let db = Database::open_with_options(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    let store = EntryStore::new(db.clone());

    let mut telegram = TelegramChannel::new(config.telegram.clone(), db.clone())?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let dispatcher = Dispatcher::new(store.clone(), channel.clone(), &config)?;
    let agent = AgentLoop::new(channel.clone(), dispatcher);
    let scheduler = Scheduler::new(store, channel.clone(), config.schedule.clone());

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
                cancel.cancel();
            }
        });
    }

    let scheduler_cancel = cancel.clone();
    let scheduler_handle = tokio::spawn(async move { scheduler.run(scheduler_cancel).await });

    agent.run(cancel.clone()).await?;

    // The agent loop exits on cancellation or a closed channel; either way
    // take the schedulers down with it.
    cancel.cancel();
    match scheduler_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "scheduler exited with error"),
        Err(e) => warn!(error = %e, "scheduler task panicked"),
    }

    channel.shutdown().await?;
    db.close().await?;
    info!("moodo stopped");
    Ok(())
}
