// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Joy entry operations. The `joys` table is append-only.

use chrono::NaiveDate;
use moodo_core::MoodoError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::JoyEntry;

/// Append a new joy entry. Returns the generated row id.
pub async fn append_joy(
    db: &Database,
    chat_id: i64,
    text: &str,
    created_at: &str,
) -> Result<i64, MoodoError> {
    let text = text.to_string();
    let created_at = created_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO joys (chat_id, text, created_at) VALUES (?1, ?2, ?3)",
                params![chat_id, text, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Entries for one user on a single calendar date, in chronological order.
pub async fn entries_on(
    db: &Database,
    chat_id: i64,
    date: NaiveDate,
) -> Result<Vec<JoyEntry>, MoodoError> {
    let day = date.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, text, created_at FROM joys
                 WHERE chat_id = ?1 AND substr(created_at, 1, 10) = ?2
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![chat_id, day], row_to_entry)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// Entries for one user between two dates (inclusive), in chronological order.
pub async fn entries_between(
    db: &Database,
    chat_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<JoyEntry>, MoodoError> {
    let start = start.to_string();
    let end = end.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, text, created_at FROM joys
                 WHERE chat_id = ?1
                   AND substr(created_at, 1, 10) >= ?2
                   AND substr(created_at, 1, 10) <= ?3
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![chat_id, start, end], row_to_entry)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// Total number of entries for one user.
pub async fn total_count(db: &Database, chat_id: i64) -> Result<i64, MoodoError> {
    db.connection()
        .call(move |conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM joys WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get(0),
            )?)
        })
        .await
        .map_err(map_tr_err)
}

/// Date of the user's first entry, if any.
pub async fn first_entry_date(
    db: &Database,
    chat_id: i64,
) -> Result<Option<NaiveDate>, MoodoError> {
    let day: Option<String> = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT MIN(substr(created_at, 1, 10)) FROM joys WHERE chat_id = ?1",
            )?;
            Ok(stmt.query_row(params![chat_id], |row| row.get(0))?)
        })
        .await
        .map_err(map_tr_err)?;

    Ok(day.and_then(|d| d.parse().ok()))
}

/// Sorted list of distinct calendar dates with at least one entry.
pub async fn distinct_entry_dates(
    db: &Database,
    chat_id: i64,
) -> Result<Vec<NaiveDate>, MoodoError> {
    let days: Vec<String> = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT substr(created_at, 1, 10) FROM joys
                 WHERE chat_id = ?1 ORDER BY 1 ASC",
            )?;
            let rows = stmt.query_map(params![chat_id], |row| row.get(0))?;
            let mut days = Vec::new();
            for row in rows {
                days.push(row?);
            }
            Ok(days)
        })
        .await
        .map_err(map_tr_err)?;

    Ok(days.into_iter().filter_map(|d| d.parse().ok()).collect())
}

/// Up to `limit` randomly chosen entry texts (the "memory box").
pub async fn random_joys(
    db: &Database,
    chat_id: i64,
    limit: i64,
) -> Result<Vec<String>, MoodoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT text FROM joys WHERE chat_id = ?1 ORDER BY RANDOM() LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![chat_id, limit], |row| row.get(0))?;
            let mut texts = Vec::new();
            for row in rows {
                texts.push(row?);
            }
            Ok(texts)
        })
        .await
        .map_err(map_tr_err)
}

/// All user ids that have at least one entry.
pub async fn all_user_ids(db: &Database) -> Result<Vec<i64>, MoodoError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT chat_id FROM joys ORDER BY chat_id")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut ids = Vec::new();
            for row in rows {
                ids.push(row?);
            }
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<JoyEntry, rusqlite::Error> {
    Ok(JoyEntry {
        id: row.get(0)?,
        chat_id: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn append_and_query_by_day() {
        let (db, _dir) = setup_db().await;

        append_joy(&db, 1, "кофе с подругой", "2026-08-01T10:00:00+03:00")
            .await
            .unwrap();
        append_joy(&db, 1, "прогулка в парке", "2026-08-01T18:30:00+03:00")
            .await
            .unwrap();
        append_joy(&db, 1, "хорошая книга", "2026-08-02T09:00:00+03:00")
            .await
            .unwrap();
        // A different user on the same day must not leak in.
        append_joy(&db, 2, "чужая радость", "2026-08-01T12:00:00+03:00")
            .await
            .unwrap();

        let day: NaiveDate = "2026-08-01".parse().unwrap();
        let entries = entries_on(&db, 1, day).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "кофе с подругой");
        assert_eq!(entries[1].text, "прогулка в парке");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn entries_between_is_inclusive() {
        let (db, _dir) = setup_db().await;

        for (day, text) in [
            ("2026-08-01", "a"),
            ("2026-08-02", "b"),
            ("2026-08-03", "c"),
            ("2026-08-04", "d"),
        ] {
            append_joy(&db, 1, text, &format!("{day}T12:00:00+03:00"))
                .await
                .unwrap();
        }

        let entries = entries_between(
            &db,
            1,
            "2026-08-02".parse().unwrap(),
            "2026-08-03".parse().unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "b");
        assert_eq!(entries[1].text, "c");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn counts_and_dates() {
        let (db, _dir) = setup_db().await;

        append_joy(&db, 1, "a", "2026-08-01T08:00:00+03:00")
            .await
            .unwrap();
        append_joy(&db, 1, "b", "2026-08-01T20:00:00+03:00")
            .await
            .unwrap();
        append_joy(&db, 1, "c", "2026-08-03T10:00:00+03:00")
            .await
            .unwrap();

        assert_eq!(total_count(&db, 1).await.unwrap(), 3);
        assert_eq!(total_count(&db, 99).await.unwrap(), 0);

        assert_eq!(
            first_entry_date(&db, 1).await.unwrap(),
            Some("2026-08-01".parse().unwrap())
        );
        assert_eq!(first_entry_date(&db, 99).await.unwrap(), None);

        let dates = distinct_entry_dates(&db, 1).await.unwrap();
        assert_eq!(
            dates,
            vec![
                "2026-08-01".parse::<NaiveDate>().unwrap(),
                "2026-08-03".parse().unwrap()
            ]
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn random_joys_respects_limit_and_user() {
        let (db, _dir) = setup_db().await;

        for i in 0..5 {
            append_joy(&db, 1, &format!("joy {i}"), "2026-08-01T10:00:00+03:00")
                .await
                .unwrap();
        }
        append_joy(&db, 2, "other", "2026-08-01T10:00:00+03:00")
            .await
            .unwrap();

        let picked = random_joys(&db, 1, 3).await.unwrap();
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|t| t.starts_with("joy ")));

        assert!(random_joys(&db, 99, 3).await.unwrap().is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn all_user_ids_is_distinct() {
        let (db, _dir) = setup_db().await;

        append_joy(&db, 5, "a", "2026-08-01T10:00:00+03:00")
            .await
            .unwrap();
        append_joy(&db, 5, "b", "2026-08-02T10:00:00+03:00")
            .await
            .unwrap();
        append_joy(&db, 3, "c", "2026-08-01T10:00:00+03:00")
            .await
            .unwrap();

        assert_eq!(all_user_ids(&db).await.unwrap(), vec![3, 5]);

        db.close().await.unwrap();
    }
}
