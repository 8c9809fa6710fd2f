// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dialog state machine: a single-slot "what do we expect next from
//! this user" register.
//!
//! The only flow today is letter-to-future-self:
//! `None -> AwaitingPeriodChoice -> AwaitingLetterBody -> None`.
//! Completion writes a `DeferredLetter` and clears the slot; `/cancel`
//! clears the slot at any point with no write. Additional flows can be
//! added without changing this contract -- the slot is generic.

use chrono::{Duration, Local};
use moodo_core::MoodoError;
use moodo_storage::Database;
use moodo_storage::queries::{dialog, letters};
use tracing::info;

/// Accepted deferral periods, in days.
pub const DEFERRAL_CHOICES: &[i64] = &[7, 14, 30];

const STATE_AWAITING_PERIOD: &str = "awaiting_period_choice";
const STATE_AWAITING_BODY: &str = "awaiting_letter_body";

pub const PERIOD_PROMPT: &str =
    "Давай напишем письмо себе в будущее 💌 Через сколько дней его доставить — 7, 14 или 30?";
const PERIOD_REPROMPT: &str = "Пожалуйста, выбери один из сроков: 7, 14 или 30 дней.";
const BODY_REPROMPT: &str = "Письмо не может быть пустым. Напиши пару тёплых слов себе 🙂";

/// A parsed pending interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    AwaitingPeriodChoice,
    AwaitingLetterBody { days: i64 },
}

/// Per-user dialog slot, persisted in the `dialog_states` table.
#[derive(Clone)]
pub struct DialogStateMachine {
    db: Database,
}

impl DialogStateMachine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The open dialog for a user, if any.
    ///
    /// A stored state that no longer parses (e.g. after a downgrade) is
    /// dropped rather than wedging the user's slot forever.
    pub async fn open(&self, chat_id: i64) -> Result<Option<DialogState>, MoodoError> {
        let Some(row) = dialog::get(&self.db, chat_id).await? else {
            return Ok(None);
        };

        let parsed = match row.state.as_str() {
            STATE_AWAITING_PERIOD => Some(DialogState::AwaitingPeriodChoice),
            STATE_AWAITING_BODY => row
                .meta
                .as_deref()
                .and_then(|m| serde_json::from_str::<serde_json::Value>(m).ok())
                .and_then(|v| v.get("days").and_then(|d| d.as_i64()))
                .map(|days| DialogState::AwaitingLetterBody { days }),
            _ => None,
        };

        if parsed.is_none() {
            tracing::warn!(chat_id, state = %row.state, "dropping unparseable dialog slot");
            dialog::clear(&self.db, chat_id).await?;
        }
        Ok(parsed)
    }

    /// Enter the letter flow. Overwrites any previously open dialog.
    pub async fn start_letter(&self, chat_id: i64) -> Result<String, MoodoError> {
        let now = Local::now().to_rfc3339();
        dialog::upsert(&self.db, chat_id, STATE_AWAITING_PERIOD, None, &now).await?;
        Ok(PERIOD_PROMPT.to_string())
    }

    /// Route text to the open dialog's expected next step.
    ///
    /// Invalid input re-prompts without a state change.
    pub async fn advance(
        &self,
        chat_id: i64,
        state: DialogState,
        text: &str,
    ) -> Result<String, MoodoError> {
        match state {
            DialogState::AwaitingPeriodChoice => self.accept_period(chat_id, text).await,
            DialogState::AwaitingLetterBody { days } => {
                self.accept_body(chat_id, days, text).await
            }
        }
    }

    /// Clear the slot. Returns whether a dialog was actually open.
    pub async fn cancel(&self, chat_id: i64) -> Result<bool, MoodoError> {
        let was_open = dialog::get(&self.db, chat_id).await?.is_some();
        dialog::clear(&self.db, chat_id).await?;
        Ok(was_open)
    }

    async fn accept_period(&self, chat_id: i64, text: &str) -> Result<String, MoodoError> {
        let choice = text.trim().parse::<i64>().ok();
        let Some(days) = choice.filter(|d| DEFERRAL_CHOICES.contains(d)) else {
            return Ok(PERIOD_REPROMPT.to_string());
        };

        let now = Local::now().to_rfc3339();
        let meta = serde_json::json!({ "days": days }).to_string();
        dialog::upsert(&self.db, chat_id, STATE_AWAITING_BODY, Some(meta), &now).await?;

        Ok(format!(
            "Хорошо, доставлю через {days} дней! Теперь напиши сам текст письма 💌"
        ))
    }

    async fn accept_body(
        &self,
        chat_id: i64,
        days: i64,
        text: &str,
    ) -> Result<String, MoodoError> {
        let body = text.trim();
        if body.is_empty() {
            return Ok(BODY_REPROMPT.to_string());
        }

        // send_at is computed exactly once, here.
        let created_at = Local::now();
        let send_at = created_at + Duration::days(days);
        letters::create(
            &self.db,
            chat_id,
            body,
            &created_at.to_rfc3339(),
            &send_at.to_rfc3339(),
        )
        .await?;
        dialog::clear(&self.db, chat_id).await?;

        info!(chat_id, days, "deferred letter scheduled");
        Ok(format!(
            "Готово! Я сохранила письмо и пришлю его тебе {} 💌",
            send_at.format("%d.%m.%Y")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup() -> (DialogStateMachine, Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();
        (DialogStateMachine::new(db.clone()), db, dir)
    }

    #[tokio::test]
    async fn full_letter_flow_writes_letter_and_clears_slot() {
        let (machine, db, _dir) = setup().await;

        machine.start_letter(1).await.unwrap();
        assert_eq!(
            machine.open(1).await.unwrap(),
            Some(DialogState::AwaitingPeriodChoice)
        );

        let reply = machine
            .advance(1, DialogState::AwaitingPeriodChoice, "7")
            .await
            .unwrap();
        assert!(reply.contains('7'));
        assert_eq!(
            machine.open(1).await.unwrap(),
            Some(DialogState::AwaitingLetterBody { days: 7 })
        );

        machine
            .advance(
                1,
                DialogState::AwaitingLetterBody { days: 7 },
                "Дорогой я, не забывай радоваться мелочам",
            )
            .await
            .unwrap();

        // Slot cleared, one letter written with send_at = created_at + 7d.
        assert_eq!(machine.open(1).await.unwrap(), None);
        let due = letters::due(&db, "2999-01-01T00:00:00+00:00").await.unwrap();
        assert_eq!(due.len(), 1);
        let letter = &due[0];
        assert!(!letter.sent);
        let created = chrono::DateTime::parse_from_rfc3339(&letter.created_at).unwrap();
        let send_at = chrono::DateTime::parse_from_rfc3339(&letter.send_at).unwrap();
        assert_eq!(send_at - created, Duration::days(7));
    }

    #[tokio::test]
    async fn invalid_period_reprompts_without_transition() {
        let (machine, _db, _dir) = setup().await;

        machine.start_letter(1).await.unwrap();
        let reply = machine
            .advance(1, DialogState::AwaitingPeriodChoice, "12")
            .await
            .unwrap();
        assert!(reply.contains("7, 14 или 30"));
        assert_eq!(
            machine.open(1).await.unwrap(),
            Some(DialogState::AwaitingPeriodChoice)
        );

        let reply = machine
            .advance(1, DialogState::AwaitingPeriodChoice, "скоро")
            .await
            .unwrap();
        assert!(reply.contains("7, 14 или 30"));
    }

    #[tokio::test]
    async fn empty_body_reprompts_without_writing() {
        let (machine, db, _dir) = setup().await;

        machine.start_letter(1).await.unwrap();
        machine
            .advance(1, DialogState::AwaitingPeriodChoice, "14")
            .await
            .unwrap();
        machine
            .advance(1, DialogState::AwaitingLetterBody { days: 14 }, "   ")
            .await
            .unwrap();

        assert_eq!(
            machine.open(1).await.unwrap(),
            Some(DialogState::AwaitingLetterBody { days: 14 })
        );
        assert!(
            letters::due(&db, "2999-01-01T00:00:00+00:00")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn cancel_clears_mid_flow_without_writing() {
        let (machine, db, _dir) = setup().await;

        machine.start_letter(1).await.unwrap();
        machine
            .advance(1, DialogState::AwaitingPeriodChoice, "30")
            .await
            .unwrap();

        assert!(machine.cancel(1).await.unwrap());
        assert_eq!(machine.open(1).await.unwrap(), None);
        assert!(
            letters::due(&db, "2999-01-01T00:00:00+00:00")
                .await
                .unwrap()
                .is_empty()
        );

        // Nothing left to cancel.
        assert!(!machine.cancel(1).await.unwrap());
    }
}
