// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply pools and the response selector.
//!
//! Each response-bearing intent has a curated pool. Picks are uniformly
//! random; for accepted joys the selector additionally never repeats the
//! previous reply shown to the same user (bounded retry, so a pool of
//! size one can never loop forever).

use std::collections::HashMap;
use std::sync::Mutex;

use moodo_classify::Intent;
use rand::Rng;

pub const JOY_REPLIES: &[&str] = &[
    "Записала твою радость ✨ Спасибо!",
    "Какая чудесная радость! Сохранила 💛",
    "Спасибо, что поделилась! Это уже в твоём дневнике ✨",
    "Как здорово! Добавила в твою копилку радостей 🌿",
];

pub const GREETING_REPLIES: &[&str] = &[
    "Привет! Расскажи, что хорошего случилось сегодня? ✨",
    "Привет-привет! Какая радость была у тебя сегодня?",
];

pub const NO_CONTENT_REPLIES: &[&str] = &[
    "Ничего страшного 🙂 Иногда радость прячется в мелочах — вкусный чай, тёплое солнце, добрая улыбка. Вспомнишь — напиши!",
    "Это нормально, бывают и такие дни. Если вспомнишь что-то хорошее — я рядом 💛",
];

pub const FATIGUE_REPLIES: &[&str] = &[
    "Слышу, как ты устала 💛 Отдых — это тоже забота о себе. Может, сегодня лечь пораньше?",
    "Усталость накапливается незаметно. Побереги себя, пожалуйста 🌿",
];

pub const SADNESS_REPLIES: &[&str] = &[
    "Мне жаль, что тебе грустно 💙 Я рядом. Если захочешь, расскажи мне потом о какой-нибудь маленькой радости.",
    "Грусть приходит и уходит, а я остаюсь рядом. Обними себя за меня 💛",
];

pub const ANXIETY_REPLIES: &[&str] = &[
    "Похоже, тебе тревожно. Попробуй несколько медленных вдохов: вдох на четыре счёта, выдох на шесть 🌬",
    "Тревога — это тяжело. Поставь ноги на пол, почувствуй опору и сделай глубокий вдох 💙",
];

/// Severe distress gets one fixed, resource-pointing reply -- no random
/// pick, the wording here matters too much.
pub const SEVERE_REPLY: &str = "Мне очень жаль, что тебе сейчас так тяжело 💙 Ты не одна. \
Пожалуйста, поговори с близким человеком или позвони на бесплатную линию поддержки \
8-800-2000-122 — там выслушают и помогут. Я тоже рядом и всегда готова тебя выслушать.";

pub const PROFANITY_REPLIES: &[&str] = &[
    "Давай без крепких слов 🙂 Расскажи лучше, что хорошего случилось сегодня?",
    "Я записываю только добрые слова ✨ Попробуешь сказать это помягче?",
];

/// Appended to a distress reply when the trailing-window event count
/// crosses the nudge threshold.
pub const RITUAL_NUDGE: &str = "\n\nПоследние дни были непростыми. Может, попробуем маленький \
ритуал заботы о себе — тёплый чай, плед и пять минут тишины? 🫖";

/// How many re-picks to attempt before accepting a repeat.
const ANTI_REPEAT_ATTEMPTS: usize = 4;

/// Picks replies for response-bearing intents.
///
/// The last-joy-reply memo is session-scoped by design: it is cosmetic,
/// so losing it on restart is fine.
pub struct ResponseSelector {
    last_joy_reply: Mutex<HashMap<i64, usize>>,
}

impl ResponseSelector {
    pub fn new() -> Self {
        Self {
            last_joy_reply: Mutex::new(HashMap::new()),
        }
    }

    /// Select a reply for the given intent and user.
    ///
    /// Only intents with a reply pool are valid here; the dispatcher
    /// handles commands and dialog continuations before reaching this.
    pub fn select(&self, intent: Intent, chat_id: i64) -> String {
        match intent {
            Intent::Joy => self.select_joy(chat_id),
            Intent::Greeting => pick(GREETING_REPLIES),
            Intent::NoContent => pick(NO_CONTENT_REPLIES),
            Intent::Fatigue => pick(FATIGUE_REPLIES),
            Intent::Sadness => pick(SADNESS_REPLIES),
            Intent::Anxiety => pick(ANXIETY_REPLIES),
            Intent::SevereDistress => SEVERE_REPLY.to_string(),
            Intent::Profanity => pick(PROFANITY_REPLIES),
            Intent::Command(_) | Intent::DialogContinuation => {
                // Not pool-driven; a stable fallback beats a panic.
                pick(NO_CONTENT_REPLIES)
            }
        }
    }

    /// Joy pick with the anti-repeat rule.
    fn select_joy(&self, chat_id: i64) -> String {
        let mut memo = self.last_joy_reply.lock().unwrap_or_else(|e| e.into_inner());
        let last = memo.get(&chat_id).copied();

        let mut rng = rand::thread_rng();
        let mut index = rng.gen_range(0..JOY_REPLIES.len());
        for _ in 0..ANTI_REPEAT_ATTEMPTS {
            if Some(index) != last {
                break;
            }
            index = rng.gen_range(0..JOY_REPLIES.len());
        }
        // A pool of one can legitimately repeat; anything larger gets a
        // deterministic nudge off the previous reply.
        if Some(index) == last && JOY_REPLIES.len() > 1 {
            index = (index + 1) % JOY_REPLIES.len();
        }

        memo.insert(chat_id, index);
        JOY_REPLIES[index].to_string()
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(pool: &[&str]) -> String {
    let index = rand::thread_rng().gen_range(0..pool.len());
    pool[index].to_string()
}
