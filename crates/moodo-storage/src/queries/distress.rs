// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Distress event operations. Timestamp-only markers, append-only.

use moodo_core::MoodoError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Append a distress marker. Returns the generated row id.
pub async fn append_distress(
    db: &Database,
    chat_id: i64,
    created_at: &str,
) -> Result<i64, MoodoError> {
    let created_at = created_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO distress_events (chat_id, created_at) VALUES (?1, ?2)",
                params![chat_id, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Count of distress events at or after `cutoff` (RFC 3339 string).
///
/// Used for the trailing-window rate check behind the coping-ritual nudge.
pub async fn count_since(db: &Database, chat_id: i64, cutoff: &str) -> Result<i64, MoodoError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM distress_events
                 WHERE chat_id = ?1 AND created_at >= ?2",
                params![chat_id, cutoff],
                |row| row.get(0),
            )?)
        })
        .await
        .map_err(map_tr_err)
}
