// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialog state slot operations: one row per user, overwritten on every
//! transition, deleted on completion or cancellation.

use moodo_core::MoodoError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::DialogStateRow;

/// Insert or overwrite the dialog slot for a user.
pub async fn upsert(
    db: &Database,
    chat_id: i64,
    state: &str,
    meta: Option<String>,
    updated_at: &str,
) -> Result<(), MoodoError> {
    let state = state.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO dialog_states (chat_id, state, meta, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (chat_id) DO UPDATE SET
                     state = excluded.state,
                     meta = excluded.meta,
                     updated_at = excluded.updated_at",
                params![chat_id, state, meta, updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the dialog slot for a user, if one is open.
pub async fn get(db: &Database, chat_id: i64) -> Result<Option<DialogStateRow>, MoodoError> {
    db.connection()
        .call(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT chat_id, state, meta, updated_at FROM dialog_states
                     WHERE chat_id = ?1",
                    params![chat_id],
                    |row| {
                        Ok(DialogStateRow {
                            chat_id: row.get(0)?,
                            state: row.get(1)?,
                            meta: row.get(2)?,
                            updated_at: row.get(3)?,
                        })
                    },
                )
                .optional()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete the dialog slot for a user. Deleting a missing slot is a no-op.
pub async fn clear(db: &Database, chat_id: i64) -> Result<(), MoodoError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM dialog_states WHERE chat_id = ?1",
                params![chat_id],
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
    async fn upsert_overwrites_single_row() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        upsert(&db, 1, "awaiting_period_choice", None, "2026-08-01T10:00:00+03:00")
            .await
            .unwrap();
        upsert(
            &db,
            1,
            "awaiting_letter_body",
            Some(r#"{"days":7}"#.to_string()),
            "2026-08-01T10:01:00+03:00",
        )
        .await
        .unwrap();

        let row = get(&db, 1).await.unwrap().unwrap();
        assert_eq!(row.state, "awaiting_letter_body");
        assert_eq!(row.meta.as_deref(), Some(r#"{"days":7}"#));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_removes_slot_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        upsert(&db, 1, "awaiting_period_choice", None, "2026-08-01T10:00:00+03:00")
            .await
            .unwrap();
        clear(&db, 1).await.unwrap();
        assert!(get(&db, 1).await.unwrap().is_none());

        // Clearing again must not error.
        clear(&db, 1).await.unwrap();

        db.close().await.unwrap();
    }
}
