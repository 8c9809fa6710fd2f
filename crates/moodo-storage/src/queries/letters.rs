// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred letter operations: append, scan for due rows, mark sent.
//! Letters are never deleted.

use moodo_core::MoodoError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::DeferredLetter;

/// Create a deferred letter. `send_at` must already be computed by the
/// caller (`created_at + chosen days`); it is never recomputed.
pub async fn create(
    db: &Database,
    chat_id: i64,
    text: &str,
    created_at: &str,
    send_at: &str,
) -> Result<i64, MoodoError> {
    let text = text.to_string();
    let created_at = created_at.to_string();
    let send_at = send_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO deferred_letters (chat_id, text, created_at, send_at, sent)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![chat_id, text, created_at, send_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// All unsent letters whose `send_at` is at or before `now`.
pub async fn due(db: &Database, now: &str) -> Result<Vec<DeferredLetter>, MoodoError> {
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, text, created_at, send_at, sent
                 FROM deferred_letters
                 WHERE sent = 0 AND send_at <= ?1
                 ORDER BY send_at ASC",
            )?;
            let rows = stmt.query_map(params![now], |row| {
                Ok(DeferredLetter {
                    id: row.get(0)?,
                    chat_id: row.get(1)?,
                    text: row.get(2)?,
                    created_at: row.get(3)?,
                    send_at: row.get(4)?,
                    sent: row.get::<_, i64>(5)? != 0,
                })
            })?;
            let mut letters = Vec::new();
            for row in rows {
                letters.push(row?);
            }
            Ok(letters)
        })
        .await
        .map_err(map_tr_err)
}

/// Flip `sent` false -> true for a delivered letter.
pub async fn mark_sent(db: &Database, id: i64) -> Result<(), MoodoError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE deferred_letters SET sent = 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn due_returns_only_unsent_past_letters() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        let early = create(
            &db,
            1,
            "дорогой я",
            "2026-07-01T10:00:00+03:00",
            "2026-07-08T10:00:00+03:00",
        )
        .await
        .unwrap();
        create(
            &db,
            1,
            "еще не пора",
            "2026-08-01T10:00:00+03:00",
            "2026-08-31T10:00:00+03:00",
        )
        .await
        .unwrap();

        let letters = due(&db, "2026-08-06T00:00:00+03:00").await.unwrap();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].id, early);
        assert!(!letters[0].sent);

        mark_sent(&db, early).await.unwrap();
        let letters = due(&db, "2026-08-06T00:00:00+03:00").await.unwrap();
        assert!(letters.is_empty(), "sent letters must not come due again");

        db.close().await.unwrap();
    }
}
