// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduler send dedup: insert-or-skip on (user, day, kind).
//!
//! The uniqueness constraint is the concurrency mechanism here -- scheduler
//! tasks never take locks, they race on this insert and the loser skips.

use moodo_core::MoodoError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Try to claim the (user, day, kind) notification.
///
/// Returns `true` if the claim succeeded and the caller should send,
/// `false` if this notification was already sent.
pub async fn try_mark_notified(
    db: &Database,
    chat_id: i64,
    day: &str,
    kind: &str,
) -> Result<bool, MoodoError> {
    let day = day.to_string();
    let kind = kind.to_string();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO notifications_sent (chat_id, day, kind)
                 VALUES (?1, ?2, ?3)",
                params![chat_id, day, kind],
            )?;
            Ok(inserted > 0)
        })
        .await
        .map_err(map_tr_err)
}
