// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `EntryStore` -- the persistence facade the dispatcher and schedulers
//! talk to. Wraps the database handle and stamps write timestamps.

use chrono::{Duration, Local, NaiveDate};
use moodo_core::MoodoError;

use crate::database::Database;
use crate::models::JoyEntry;
use crate::queries;

/// Persistence facade keyed by `chat_id`.
///
/// All reads are point-in-time snapshots through the single connection;
/// no cross-user queries beyond `all_user_ids` are offered.
#[derive(Clone)]
pub struct EntryStore {
    db: Database,
}

impl EntryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Access to the underlying database for the query modules that sit
    /// outside the entry domain (dialog slots, letters, dedup).
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Append a joy entry stamped with the current local time.
    pub async fn append_joy(&self, chat_id: i64, text: &str) -> Result<i64, MoodoError> {
        let now = Local::now().to_rfc3339();
        queries::joys::append_joy(&self.db, chat_id, text, &now).await
    }

    /// Append a distress marker stamped with the current local time.
    pub async fn append_distress(&self, chat_id: i64) -> Result<i64, MoodoError> {
        let now = Local::now().to_rfc3339();
        queries::distress::append_distress(&self.db, chat_id, &now).await
    }

    pub async fn entries_on(
        &self,
        chat_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<JoyEntry>, MoodoError> {
        queries::joys::entries_on(&self.db, chat_id, date).await
    }

    pub async fn entries_between(
        &self,
        chat_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<JoyEntry>, MoodoError> {
        queries::joys::entries_between(&self.db, chat_id, start, end).await
    }

    pub async fn has_entry_on(&self, chat_id: i64, date: NaiveDate) -> Result<bool, MoodoError> {
        Ok(!self.entries_on(chat_id, date).await?.is_empty())
    }

    pub async fn total_count(&self, chat_id: i64) -> Result<i64, MoodoError> {
        queries::joys::total_count(&self.db, chat_id).await
    }

    pub async fn first_entry_date(&self, chat_id: i64) -> Result<Option<NaiveDate>, MoodoError> {
        queries::joys::first_entry_date(&self.db, chat_id).await
    }

    pub async fn distinct_entry_dates(&self, chat_id: i64) -> Result<Vec<NaiveDate>, MoodoError> {
        queries::joys::distinct_entry_dates(&self.db, chat_id).await
    }

    /// Consecutive days with at least one entry, counted back from the most
    /// recent entry date. Zero if the most recent entry is older than
    /// yesterday relative to `today`.
    pub async fn current_streak(&self, chat_id: i64, today: NaiveDate) -> Result<u32, MoodoError> {
        let dates = self.distinct_entry_dates(chat_id).await?;
        let Some(&latest) = dates.last() else {
            return Ok(0);
        };
        if latest < today - Duration::days(1) {
            return Ok(0);
        }

        let mut streak = 0u32;
        let mut expected = latest;
        for &date in dates.iter().rev() {
            if date == expected {
                streak += 1;
                expected = expected - Duration::days(1);
            } else {
                break;
            }
        }
        Ok(streak)
    }

    /// Distress events within the trailing `days`-day window ending now.
    pub async fn distress_count_since(&self, chat_id: i64, days: i64) -> Result<i64, MoodoError> {
        let cutoff = (Local::now() - Duration::days(days)).to_rfc3339();
        queries::distress::count_since(&self.db, chat_id, &cutoff).await
    }

    pub async fn all_user_ids(&self) -> Result<Vec<i64>, MoodoError> {
        queries::joys::all_user_ids(&self.db).await
    }

    /// Up to `limit` randomly chosen stored joys (the "memory box").
    pub async fn random_joys(&self, chat_id: i64, limit: i64) -> Result<Vec<String>, MoodoError> {
        queries::joys::random_joys(&self.db, chat_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_store() -> (EntryStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();
        (EntryStore::new(db), dir)
    }

    async fn joy_on(store: &EntryStore, chat_id: i64, day: &str) {
        queries::joys::append_joy(
            store.database(),
            chat_id,
            "радость",
            &format!("{day}T12:00:00+03:00"),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn streak_of_three_consecutive_days_ending_today() {
        let (store, _dir) = setup_store().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&store, 1, "2026-08-04").await;
        joy_on(&store, 1, "2026-08-05").await;
        joy_on(&store, 1, "2026-08-06").await;

        assert_eq!(store.current_streak(1, today).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn streak_counts_when_latest_entry_is_yesterday() {
        let (store, _dir) = setup_store().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&store, 1, "2026-08-04").await;
        joy_on(&store, 1, "2026-08-05").await;

        assert_eq!(store.current_streak(1, today).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn stale_entry_yields_zero_streak() {
        let (store, _dir) = setup_store().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&store, 1, "2026-08-01").await;

        assert_eq!(store.current_streak(1, today).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn gap_breaks_the_streak() {
        let (store, _dir) = setup_store().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&store, 1, "2026-08-02").await;
        // 2026-08-03 missing
        joy_on(&store, 1, "2026-08-04").await;
        joy_on(&store, 1, "2026-08-05").await;
        joy_on(&store, 1, "2026-08-06").await;

        assert_eq!(store.current_streak(1, today).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn empty_store_has_zero_streak() {
        let (store, _dir) = setup_store().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();
        assert_eq!(store.current_streak(1, today).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn multiple_entries_per_day_count_once_for_streak() {
        let (store, _dir) = setup_store().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&store, 1, "2026-08-05").await;
        joy_on(&store, 1, "2026-08-05").await;
        joy_on(&store, 1, "2026-08-06").await;

        assert_eq!(store.current_streak(1, today).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn has_entry_on_reflects_appends() {
        let (store, _dir) = setup_store().await;
        let day: NaiveDate = "2026-08-06".parse().unwrap();

        assert!(!store.has_entry_on(1, day).await.unwrap());
        joy_on(&store, 1, "2026-08-06").await;
        assert!(store.has_entry_on(1, day).await.unwrap());
    }

    #[tokio::test]
    async fn append_joy_stamps_current_time() {
        let (store, _dir) = setup_store().await;

        store.append_joy(1, "сегодняшняя радость").await.unwrap();
        let today = Local::now().date_naive();
        assert!(store.has_entry_on(1, today).await.unwrap());
        assert_eq!(store.total_count(1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn distress_count_window() {
        let (store, _dir) = setup_store().await;

        store.append_distress(1).await.unwrap();
        store.append_distress(1).await.unwrap();

        assert_eq!(store.distress_count_since(1, 7).await.unwrap(), 2);
        assert_eq!(store.distress_count_since(2, 7).await.unwrap(), 0);
    }
}
