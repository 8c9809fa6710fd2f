// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background schedulers: daily reminder, end-of-day report, weekly and
//! monthly digests, and deferred-letter delivery.
//!
//! Jobs only read the entry store and write outbound sends. Duplicate
//! protection is the insert-or-skip claim on (user, day, kind) -- no
//! locking, so overlapping fires and restarts are harmless. A failed send
//! for one user never blocks the rest.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use croner::Cron;
use moodo_agent::summary;
use moodo_config::model::ScheduleConfig;
use moodo_core::{ChannelAdapter, MoodoError, OutboundMessage};
use moodo_storage::EntryStore;
use moodo_storage::queries::{letters, notifications};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const REMINDER_TEXT: &str = "Как прошёл твой день? Если была хоть маленькая радость — \
напиши мне, я сохраню ✨";

const DAILY_HEADER: &str = "Вот что радовало тебя сегодня:";
const WEEKLY_HEADER: &str = "Посмотри, как много чудесного произошло за эту неделю:";
const WEEKLY_FALLBACK: &str =
    "На этой неделе записей не было. Новая неделя — новые радости ✨";
const MONTHLY_HEADER: &str = "Вот твои радости за этот месяц:";
const MONTHLY_FALLBACK: &str = "В этом месяце записей не было. Впереди новый месяц ✨";

const LETTER_PREFIX: &str = "Письмо от тебя из прошлого 💌\n\n";

/// The scheduled notification kinds, used as dedup keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobKind {
    Reminder,
    DailyReport,
    WeeklyDigest,
    MonthlyDigest,
}

impl JobKind {
    fn key(self) -> &'static str {
        match self {
            JobKind::Reminder => "reminder",
            JobKind::DailyReport => "daily_report",
            JobKind::WeeklyDigest => "weekly_digest",
            JobKind::MonthlyDigest => "monthly_digest",
        }
    }
}

struct CronJob {
    kind: JobKind,
    cron: Cron,
    next: DateTime<Local>,
}

/// Periodic job runner over the entry store and the outbound channel.
pub struct Scheduler {
    store: EntryStore,
    channel: Arc<dyn ChannelAdapter>,
    config: ScheduleConfig,
}

impl Scheduler {
    pub fn new(
        store: EntryStore,
        channel: Arc<dyn ChannelAdapter>,
        config: ScheduleConfig,
    ) -> Self {
        Self {
            store,
            channel,
            config,
        }
    }

    /// Runs all scheduled jobs until cancellation.
    ///
    /// One ticker drives everything: each tick scans for due letters and
    /// fires any cron job whose next occurrence has passed.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), MoodoError> {
        let mut jobs = self.build_jobs()?;
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(self.config.letter_scan_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(jobs = jobs.len(), "scheduler running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Local::now();

                    if let Err(e) = self.deliver_due_letters(&now.to_rfc3339()).await {
                        warn!(error = %e, "letter delivery scan failed");
                    }

                    for job in &mut jobs {
                        if now < job.next {
                            continue;
                        }
                        let today = now.date_naive();
                        if let Err(e) = self.run_job(job.kind, today).await {
                            warn!(kind = job.kind.key(), error = %e, "scheduled job failed");
                        }
                        job.next = next_occurrence(&job.cron, now);
                    }
                }
                _ = cancel.cancelled() => {
                    info!("scheduler stopped");
                    return Ok(());
                }
            }
        }
    }

    fn build_jobs(&self) -> Result<Vec<CronJob>, MoodoError> {
        let now = Local::now();
        let specs = [
            (JobKind::Reminder, &self.config.reminder_cron),
            (JobKind::DailyReport, &self.config.report_cron),
            (JobKind::WeeklyDigest, &self.config.weekly_cron),
            (JobKind::MonthlyDigest, &self.config.monthly_cron),
        ];

        let mut jobs = Vec::with_capacity(specs.len());
        for (kind, pattern) in specs {
            let cron = Cron::new(pattern).parse().map_err(|e| {
                MoodoError::Config(format!("invalid cron pattern `{pattern}`: {e}"))
            })?;
            let next = next_occurrence(&cron, now);
            debug!(kind = kind.key(), pattern = %pattern, %next, "job scheduled");
            jobs.push(CronJob { kind, cron, next });
        }
        Ok(jobs)
    }

    async fn run_job(&self, kind: JobKind, today: NaiveDate) -> Result<(), MoodoError> {
        match kind {
            JobKind::Reminder => self.run_reminder(today).await,
            JobKind::DailyReport => self.run_daily_report(today).await,
            JobKind::WeeklyDigest => self.run_weekly_digest(today).await,
            JobKind::MonthlyDigest => self.run_monthly_digest(today).await,
        }
    }

    /// Nudge every known user who has no entry yet today.
    pub async fn run_reminder(&self, today: NaiveDate) -> Result<(), MoodoError> {
        for chat_id in self.store.all_user_ids().await? {
            if self.store.has_entry_on(chat_id, today).await? {
                continue;
            }
            self.claim_and_send(chat_id, today, JobKind::Reminder, REMINDER_TEXT.to_string())
                .await;
        }
        Ok(())
    }

    /// End-of-day report for users who recorded something today.
    pub async fn run_daily_report(&self, today: NaiveDate) -> Result<(), MoodoError> {
        for chat_id in self.store.all_user_ids().await? {
            let entries = self.store.entries_on(chat_id, today).await?;
            if entries.is_empty() {
                continue;
            }
            let digest = summary::build_digest(&entries, DAILY_HEADER, "");
            if digest.is_empty() {
                // Every entry was a placeholder; nothing worth reporting.
                continue;
            }
            self.claim_and_send(chat_id, today, JobKind::DailyReport, digest)
                .await;
        }
        Ok(())
    }

    /// Weekly digest, Monday through today.
    pub async fn run_weekly_digest(&self, today: NaiveDate) -> Result<(), MoodoError> {
        let week_start =
            today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        for chat_id in self.store.all_user_ids().await? {
            let entries = self.store.entries_between(chat_id, week_start, today).await?;
            let digest = summary::build_digest(&entries, WEEKLY_HEADER, WEEKLY_FALLBACK);
            self.claim_and_send(chat_id, today, JobKind::WeeklyDigest, digest)
                .await;
        }
        Ok(())
    }

    /// Monthly digest, first of the month through today.
    pub async fn run_monthly_digest(&self, today: NaiveDate) -> Result<(), MoodoError> {
        let month_start = today.with_day(1).unwrap_or(today);
        for chat_id in self.store.all_user_ids().await? {
            let entries = self
                .store
                .entries_between(chat_id, month_start, today)
                .await?;
            let digest = summary::build_digest(&entries, MONTHLY_HEADER, MONTHLY_FALLBACK);
            self.claim_and_send(chat_id, today, JobKind::MonthlyDigest, digest)
                .await;
        }
        Ok(())
    }

    /// Deliver every due letter, marking each sent only after a successful
    /// send so a failed delivery is retried on the next scan.
    pub async fn deliver_due_letters(&self, now: &str) -> Result<(), MoodoError> {
        let due = letters::due(self.store.database(), now).await?;
        for letter in due {
            let out = OutboundMessage::new(
                letter.chat_id,
                format!("{LETTER_PREFIX}{}", letter.text),
            );
            match self.channel.send(out).await {
                Ok(()) => {
                    letters::mark_sent(self.store.database(), letter.id).await?;
                    info!(chat_id = letter.chat_id, letter_id = letter.id, "letter delivered");
                }
                Err(e) => {
                    warn!(
                        chat_id = letter.chat_id,
                        letter_id = letter.id,
                        error = %e,
                        "letter delivery failed, will retry"
                    );
                }
            }
        }
        Ok(())
    }

    /// Claim the (user, day, kind) slot; send only on a fresh claim.
    async fn claim_and_send(&self, chat_id: i64, day: NaiveDate, kind: JobKind, text: String) {
        let claimed = match notifications::try_mark_notified(
            self.store.database(),
            chat_id,
            &day.to_string(),
            kind.key(),
        )
        .await
        {
            Ok(claimed) => claimed,
            Err(e) => {
                warn!(chat_id, kind = kind.key(), error = %e, "notification claim failed");
                return;
            }
        };
        if !claimed {
            debug!(chat_id, kind = kind.key(), "already notified today");
            return;
        }

        if let Err(e) = self.channel.send(OutboundMessage::new(chat_id, text)).await {
            warn!(chat_id, kind = kind.key(), error = %e, "scheduled send failed");
        }
    }
}

/// Next fire time for a cron pattern, with a one-minute fallback if the
/// pattern cannot produce one (croner treats that as an error).
fn next_occurrence(cron: &Cron, now: DateTime<Local>) -> DateTime<Local> {
    match cron.find_next_occurrence(&now, false) {
        Ok(next) => next,
        Err(e) => {
            warn!(error = %e, "no next cron occurrence, retrying in a minute");
            now + Duration::minutes(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodo_storage::Database;
    use moodo_storage::queries::joys;
    use moodo_test_utils::RecordingChannel;

    struct Harness {
        scheduler: Scheduler,
        channel: Arc<RecordingChannel>,
        store: EntryStore,
        _dir: tempfile::TempDir,
    }

    async fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();
        let store = EntryStore::new(db);
        let channel = Arc::new(RecordingChannel::new());
        let scheduler = Scheduler::new(
            store.clone(),
            channel.clone() as Arc<dyn ChannelAdapter>,
            ScheduleConfig::default(),
        );
        Harness {
            scheduler,
            channel,
            store,
            _dir: dir,
        }
    }

    async fn joy_on(store: &EntryStore, chat_id: i64, day: &str, text: &str) {
        joys::append_joy(
            store.database(),
            chat_id,
            text,
            &format!("{day}T12:00:00+03:00"),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn reminder_targets_only_users_without_entry_today() {
        let h = harness().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&h.store, 1, "2026-08-06", "уже записала").await;
        joy_on(&h.store, 2, "2026-08-05", "вчерашняя радость").await;

        h.scheduler.run_reminder(today).await.unwrap();

        let sent = h.channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, 2);
        assert_eq!(sent[0].text, REMINDER_TEXT);
    }

    #[tokio::test]
    async fn reminder_is_sent_once_per_day() {
        let h = harness().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&h.store, 1, "2026-08-01", "старая запись").await;

        h.scheduler.run_reminder(today).await.unwrap();
        h.scheduler.run_reminder(today).await.unwrap();

        assert_eq!(h.channel.sent().len(), 1, "second fire must be deduped");
    }

    #[tokio::test]
    async fn daily_report_lists_todays_entries() {
        let h = harness().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&h.store, 1, "2026-08-06", "кофе на балконе").await;
        joy_on(&h.store, 1, "2026-08-06", "звонок от мамы").await;
        joy_on(&h.store, 2, "2026-08-05", "не сегодня").await;

        h.scheduler.run_daily_report(today).await.unwrap();

        let sent = h.channel.sent();
        assert_eq!(sent.len(), 1, "user 2 had nothing today");
        assert_eq!(sent[0].chat_id, 1);
        assert!(sent[0].text.contains("кофе на балконе"));
        assert!(sent[0].text.contains("звонок от мамы"));
    }

    #[tokio::test]
    async fn weekly_digest_sends_fallback_for_quiet_week() {
        let h = harness().await;
        // Thursday; the user's only entry is from long ago.
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&h.store, 1, "2026-07-01", "давняя радость").await;

        h.scheduler.run_weekly_digest(today).await.unwrap();

        let sent = h.channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, WEEKLY_FALLBACK);
    }

    #[tokio::test]
    async fn weekly_digest_covers_monday_through_today() {
        let h = harness().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap(); // Thursday

        joy_on(&h.store, 1, "2026-08-02", "воскресенье — прошлая неделя").await;
        joy_on(&h.store, 1, "2026-08-03", "понедельник").await;
        joy_on(&h.store, 1, "2026-08-06", "четверг").await;

        h.scheduler.run_weekly_digest(today).await.unwrap();

        let sent = h.channel.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("понедельник"));
        assert!(sent[0].text.contains("четверг"));
        assert!(!sent[0].text.contains("прошлая неделя"));
    }

    #[tokio::test]
    async fn monthly_digest_covers_current_month() {
        let h = harness().await;
        let today: NaiveDate = "2026-08-06".parse().unwrap();

        joy_on(&h.store, 1, "2026-07-31", "июль").await;
        joy_on(&h.store, 1, "2026-08-01", "первое августа").await;

        h.scheduler.run_monthly_digest(today).await.unwrap();

        let sent = h.channel.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("первое августа"));
        assert!(!sent[0].text.contains("июль"));
    }

    #[tokio::test]
    async fn due_letters_are_delivered_and_marked() {
        let h = harness().await;

        letters::create(
            h.store.database(),
            7,
            "привет из прошлого",
            "2026-07-01T10:00:00+03:00",
            "2026-07-08T10:00:00+03:00",
        )
        .await
        .unwrap();

        h.scheduler
            .deliver_due_letters("2026-08-06T00:00:00+03:00")
            .await
            .unwrap();

        let sent = h.channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, 7);
        assert!(sent[0].text.contains("привет из прошлого"));

        // Second scan: already marked sent, nothing to deliver.
        h.scheduler
            .deliver_due_letters("2026-08-06T00:01:00+03:00")
            .await
            .unwrap();
        assert_eq!(h.channel.sent().len(), 1);
    }

    #[tokio::test]
    async fn future_letters_stay_put() {
        let h = harness().await;

        letters::create(
            h.store.database(),
            7,
            "ещё рано",
            "2026-08-01T10:00:00+03:00",
            "2026-08-31T10:00:00+03:00",
        )
        .await
        .unwrap();

        h.scheduler
            .deliver_due_letters("2026-08-06T00:00:00+03:00")
            .await
            .unwrap();
        assert!(h.channel.sent().is_empty());
    }

    #[test]
    fn default_cron_patterns_parse() {
        let config = ScheduleConfig::default();
        for pattern in [
            &config.reminder_cron,
            &config.report_cron,
            &config.weekly_cron,
            &config.monthly_cron,
        ] {
            assert!(
                Cron::new(pattern).parse().is_ok(),
                "default pattern `{pattern}` must parse"
            );
        }
    }
}
