// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound-update dedup guard and the durable long-poll cursor.

use moodo_core::MoodoError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

/// Record an update id as processed.
///
/// Returns `true` if the id was newly recorded, `false` if it had been
/// seen before (the caller must then skip all side effects).
pub async fn mark_processed(db: &Database, update_id: i64) -> Result<bool, MoodoError> {
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO processed_updates (update_id) VALUES (?1)",
                params![update_id],
            )?;
            Ok(inserted > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Load the stored long-poll offset, if any.
pub async fn load_cursor(db: &Database) -> Result<Option<i64>, MoodoError> {
    db.connection()
        .call(|conn| {
            Ok(conn
                .query_row("SELECT next_offset FROM poll_cursor WHERE id = 1", [], |row| {
                    row.get(0)
                })
                .optional()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Persist the long-poll offset (single row, overwritten).
pub async fn store_cursor(db: &Database, next_offset: i64) -> Result<(), MoodoError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO poll_cursor (id, next_offset) VALUES (1, ?1)
                 ON CONFLICT (id) DO UPDATE SET next_offset = excluded.next_offset",
                params![next_offset],
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
    async fn mark_processed_is_first_come_only() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        assert!(mark_processed(&db, 1001).await.unwrap());
        assert!(!mark_processed(&db, 1001).await.unwrap());
        assert!(mark_processed(&db, 1002).await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn cursor_round_trip() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(load_cursor(&db).await.unwrap(), None);

        store_cursor(&db, 42).await.unwrap();
        assert_eq!(load_cursor(&db).await.unwrap(), Some(42));

        store_cursor(&db, 43).await.unwrap();
        assert_eq!(load_cursor(&db).await.unwrap(), Some(43));

        db.close().await.unwrap();
    }
}
