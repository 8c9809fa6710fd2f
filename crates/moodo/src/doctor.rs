// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `moodo doctor`: check configuration, storage, and Telegram
//! connectivity without starting the agent.

use moodo_config::MoodoConfig;
use moodo_core::{HealthStatus, MoodoError, PluginAdapter};
use moodo_storage::Database;
use moodo_telegram::TelegramChannel;

pub async fn run(config: MoodoConfig) -> Result<(), MoodoError> {
    println!("moodo doctor");
    println!("  config:   ok (agent.name = {})", config.agent.name);

    let db = match Database::open_with_options(
        &config.storage.database_path,
        config.storage.wal_mode,
    )
    .await
    {
        Ok(db) => {
            println!("  storage:  ok ({})", config.storage.database_path);
            Some(db)
        }
        Err(e) => {
            println!("  storage:  FAIL ({e})");
            None
        }
    };

    match (config.telegram.bot_token.as_ref(), db) {
        (None, _) => println!("  telegram: disabled (no bot_token)"),
        (Some(_), None) => println!("  telegram: skipped (storage unavailable)"),
        (Some(_), Some(db)) => {
            match TelegramChannel::new(config.telegram.clone(), db.clone()) {
                Ok(channel) => match channel.health_check().await? {
                    HealthStatus::Healthy => println!("  telegram: ok"),
                    HealthStatus::Degraded(reason) => println!("  telegram: degraded ({reason})"),
                    HealthStatus::Unhealthy(reason) => println!("  telegram: FAIL ({reason})"),
                },
                Err(e) => println!("  telegram: FAIL ({e})"),
            }
            db.close().await?;
        }
    }

    Ok(())
}
