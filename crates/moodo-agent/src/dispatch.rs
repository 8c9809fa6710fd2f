// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatcher: one inbound message in, exactly one outbound send out.
//!
//! Control flow per message: dedup guard -> command -> dialog continuation
//! -> profanity -> classifier -> side effect (persist and/or respond) ->
//! one `send`. A storage failure propagates before the send, so the user
//! never receives a success acknowledgment for a write that did not happen.

use std::sync::Arc;

use chrono::{Datelike, Duration, Local};
use moodo_classify::{BotCommand, Intent, IntentClassifier, ProfanityMasker, normalize};
use moodo_config::MoodoConfig;
use moodo_core::{ChannelAdapter, InboundMessage, MoodoError, OutboundMessage};
use moodo_storage::EntryStore;
use moodo_storage::queries::dedup;
use tracing::{debug, info, warn};

use crate::dialog::{DialogState, DialogStateMachine};
use crate::grammar::{self, GrammarCorrector};
use crate::replies::{RITUAL_NUDGE, ResponseSelector};
use crate::summary;

/// Trailing window for the coping-ritual nudge, in days.
const RITUAL_WINDOW_DAYS: i64 = 7;
/// Distress events within the window before the nudge is offered.
const RITUAL_THRESHOLD: i64 = 3;

/// How many stored joys the memory box recalls at once.
const MEMORIES_COUNT: i64 = 3;

const ONBOARDING: &str = "Привет! Я Moodo — дневник маленьких радостей ✨\n\n\
Присылай мне одну маленькую радость в день, а я буду бережно её хранить. \
В воскресенье вечером пришлю итог недели.\n\n\
Команды:\n\
/stats — твоя статистика\n\
/week — радости этой недели\n\
/memories — случайные воспоминания\n\
/letter — письмо себе в будущее\n\
/cancel — отменить начатое";

const UNKNOWN_COMMAND: &str = "Я не знаю такой команды 🙂 Вот что я умею: \
/start, /stats, /week, /memories, /letter, /cancel";

const NOTHING_SAVED: &str =
    "Хм, из этого сообщения я не смогла ничего сохранить. Попробуй рассказать словами 🙂";

/// Routes one inbound message through classification to side effects and
/// exactly one outbound send.
pub struct Dispatcher {
    store: EntryStore,
    channel: Arc<dyn ChannelAdapter>,
    classifier: IntentClassifier,
    selector: ResponseSelector,
    dialogs: DialogStateMachine,
    grammar: Arc<dyn GrammarCorrector>,
}

impl Dispatcher {
    pub fn new(
        store: EntryStore,
        channel: Arc<dyn ChannelAdapter>,
        config: &MoodoConfig,
    ) -> Result<Self, MoodoError> {
        let masker = ProfanityMasker::with_extra_roots(&config.lexicon.extra_profanity);
        let dialogs = DialogStateMachine::new(store.database().clone());
        Ok(Self {
            store,
            channel,
            classifier: IntentClassifier::new(masker),
            selector: ResponseSelector::new(),
            dialogs,
            grammar: grammar::corrector_from_config(&config.grammar)?,
        })
    }

    /// Handle one inbound message end to end.
    ///
    /// Duplicate deliveries are absorbed silently. Every processed message
    /// produces exactly one send; at most one of {joy entry, distress
    /// event} is written, never both.
    pub async fn handle_message(&self, inbound: InboundMessage) -> Result<(), MoodoError> {
        let chat_id = inbound.chat_id;

        // Dedup before any side effect: at-least-once delivery from the
        // transport must not become at-least-twice processing.
        if !dedup::mark_processed(self.store.database(), inbound.update_id).await? {
            debug!(update_id = inbound.update_id, "duplicate update, skipping");
            return Ok(());
        }

        let open_dialog = self.dialogs.open(chat_id).await?;
        let intent = self.classifier.classify(&inbound.text, open_dialog.is_some());
        debug!(chat_id, update_id = inbound.update_id, ?intent, "dispatching");

        let reply = match intent {
            Intent::Command(cmd) => self.handle_command(cmd, chat_id, open_dialog).await?,
            Intent::DialogContinuation => {
                let state = open_dialog.ok_or_else(|| {
                    MoodoError::Internal("dialog continuation without an open dialog".into())
                })?;
                self.dialogs.advance(chat_id, state, &inbound.text).await?
            }
            Intent::Profanity => self.selector.select(intent, chat_id),
            Intent::SevereDistress | Intent::Anxiety | Intent::Fatigue | Intent::Sadness => {
                self.handle_distress(intent, chat_id).await?
            }
            Intent::Greeting | Intent::NoContent => self.selector.select(intent, chat_id),
            Intent::Joy => self.handle_joy(chat_id, &inbound.text).await?,
        };

        self.channel.send(OutboundMessage::new(chat_id, reply)).await
    }

    /// Record the distress marker and pick the category reply. Milder
    /// categories additionally get the ritual nudge once the trailing
    /// window fills up; severe distress keeps its dedicated reply as is.
    async fn handle_distress(&self, intent: Intent, chat_id: i64) -> Result<String, MoodoError> {
        self.store.append_distress(chat_id).await?;
        let mut reply = self.selector.select(intent, chat_id);

        if intent != Intent::SevereDistress {
            let recent = self
                .store
                .distress_count_since(chat_id, RITUAL_WINDOW_DAYS)
                .await?;
            if recent >= RITUAL_THRESHOLD {
                reply.push_str(RITUAL_NUDGE);
            }
        }
        Ok(reply)
    }

    /// Mask, optionally correct, and persist an accepted joy.
    async fn handle_joy(&self, chat_id: i64, raw: &str) -> Result<String, MoodoError> {
        // Defense in depth: the profanity gate ran first, but masking the
        // text about to be persisted catches any residue.
        let masked = self.classifier.masker().mask(raw.trim());

        let corrected = match self.grammar.correct(&masked).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "grammar correction failed, storing uncorrected text");
                masked
            }
        };

        let text = corrected.trim();
        if normalize(text).is_empty() {
            return Ok(NOTHING_SAVED.to_string());
        }

        self.store.append_joy(chat_id, text).await?;
        info!(chat_id, "joy entry recorded");
        Ok(self.selector.select(Intent::Joy, chat_id))
    }

    async fn handle_command(
        &self,
        cmd: BotCommand,
        chat_id: i64,
        open_dialog: Option<DialogState>,
    ) -> Result<String, MoodoError> {
        match cmd {
            BotCommand::Start => Ok(ONBOARDING.to_string()),
            BotCommand::Stats => self.build_stats(chat_id).await,
            BotCommand::Week => self.build_week_digest(chat_id).await,
            BotCommand::Memories => self.build_memories(chat_id).await,
            BotCommand::Letter => self.dialogs.start_letter(chat_id).await,
            BotCommand::Cancel => {
                let was_open = open_dialog.is_some();
                self.dialogs.cancel(chat_id).await?;
                Ok(if was_open {
                    "Хорошо, отменила 🙂 Если захочешь — начнём заново.".to_string()
                } else {
                    "Нечего отменять 🙂 Просто пришли мне свою сегодняшнюю радость ✨".to_string()
                })
            }
            BotCommand::Unknown => Ok(UNKNOWN_COMMAND.to_string()),
        }
    }

    async fn build_stats(&self, chat_id: i64) -> Result<String, MoodoError> {
        let total = self.store.total_count(chat_id).await?;
        if total == 0 {
            return Ok("Записей пока нет. Пришли мне свою первую радость ✨".to_string());
        }

        let today = Local::now().date_naive();
        let streak = self.store.current_streak(chat_id, today).await?;
        let first = self.store.first_entry_date(chat_id).await?;

        let mut stats = format!("Всего радостей: {total}\nДней подряд с записями: {streak}");
        if let Some(first) = first {
            stats.push_str(&format!("\nПервая запись: {}", first.format("%d.%m.%Y")));
        }
        Ok(stats)
    }

    async fn build_week_digest(&self, chat_id: i64) -> Result<String, MoodoError> {
        let today = Local::now().date_naive();
        let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let entries = self.store.entries_between(chat_id, week_start, today).await?;

        Ok(summary::build_digest(
            &entries,
            "Посмотри, как много чудесного произошло за эту неделю:",
            "Пока нет записей за эту неделю. Самое время поделиться радостью ✨",
        ))
    }

    async fn build_memories(&self, chat_id: i64) -> Result<String, MoodoError> {
        let memories = self.store.random_joys(chat_id, MEMORIES_COUNT).await?;
        if memories.is_empty() {
            return Ok("Твоя коробочка воспоминаний пока пуста. Давай наполнять её \
                       радостными моментами каждый день! 😊"
                .to_string());
        }

        let lines: Vec<String> = memories.iter().map(|m| format!("✨ {m}")).collect();
        Ok(format!(
            "Посмотри, какие чудесные воспоминания хранятся в твоей коробочке:\n\n{}",
            lines.join("\n")
        ))
    }
}
