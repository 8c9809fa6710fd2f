// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phrase tables driving the intent rules.
//!
//! Every phrase is written in normalized form (lowercase, `е` for `ё`,
//! no punctuation) -- the classifier only ever matches against
//! [`crate::normalize`] output. Phrase sets are disjoint by construction;
//! overlap between emotional categories is resolved purely by rule order.

/// Obscene roots masked wherever they appear, including obfuscated
/// spellings. Extended at runtime via `lexicon.extra_profanity`.
pub const PROFANITY_ROOTS: &[&str] = &[
    "хуй", "хуи", "хуе", "хер", "пизд", "ебат", "ебан", "сука", "бляд", "бля",
];

/// Self-harm / severe-despair phrases. Highest-priority emotional set.
pub const SEVERE_PHRASES: &[&str] = &[
    "не хочу жить",
    "жить не хочется",
    "нет смысла жить",
    "не вижу смысла жить",
    "покончить с собой",
    "не могу так больше жить",
    "лучше бы меня не было",
];

pub const ANXIETY_PHRASES: &[&str] = &[
    "тревожно",
    "тревога",
    "тревожусь",
    "паника",
    "паникую",
    "страшно",
    "боюсь",
    "не нахожу себе места",
    "сердце колотится",
];

pub const FATIGUE_PHRASES: &[&str] = &[
    "устал",
    "устала",
    "сил нет",
    "нет сил",
    "без сил",
    "выгорел",
    "выгорела",
    "выгорание",
    "вымотан",
    "вымотана",
    "измотан",
    "измотана",
];

pub const SADNESS_PHRASES: &[&str] = &[
    "грустно",
    "грусть",
    "печально",
    "печаль",
    "тоска",
    "тоскливо",
    "плачу",
    "плохо на душе",
    "одиноко",
    "уныло",
];

/// Greeting phrases, matched exactly or as a prefix of a short message.
pub const GREETING_PHRASES: &[&str] = &[
    "привет",
    "приветик",
    "здравствуй",
    "здравствуйте",
    "добрый день",
    "добрый вечер",
    "доброе утро",
    "хай",
    "hello",
    "hi",
];

/// "Don't know what to write" phrases -- acknowledged, never stored.
pub const NO_CONTENT_PHRASES: &[&str] = &[
    "не знаю что написать",
    "не знаю что писать",
    "нечего написать",
    "нечего писать",
    "ничего не произошло",
    "ничего хорошего не было",
    "нет радости сегодня",
    "радости не было",
];

/// Normalized text triggers equivalent to the /memories command.
pub const MEMORIES_TRIGGERS: &[&str] = &[
    "напомнить о всем хорошем",
    "напомни о всем хорошем",
];

/// Latin and digit lookalikes folded to their Cyrillic base before
/// profanity matching, so `cyка` and `сuка` hit the same root.
pub const HOMOGLYPHS: &[(char, char)] = &[
    ('a', 'а'),
    ('c', 'с'),
    ('e', 'е'),
    ('k', 'к'),
    ('m', 'м'),
    ('o', 'о'),
    ('p', 'р'),
    ('t', 'т'),
    ('x', 'х'),
    ('y', 'у'),
    ('@', 'а'),
    ('0', 'о'),
    ('3', 'з'),
    ('6', 'б'),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    /// Phrase tables only work if each phrase is already in normalized form.
    #[test]
    fn all_phrases_are_normalized() {
        let sets: &[&[&str]] = &[
            SEVERE_PHRASES,
            ANXIETY_PHRASES,
            FATIGUE_PHRASES,
            SADNESS_PHRASES,
            GREETING_PHRASES,
            NO_CONTENT_PHRASES,
            MEMORIES_TRIGGERS,
            PROFANITY_ROOTS,
        ];
        for set in sets {
            for phrase in *set {
                assert_eq!(
                    &normalize(phrase),
                    phrase,
                    "phrase `{phrase}` is not in normalized form"
                );
            }
        }
    }

    /// Emotional sets must stay disjoint: ties are resolved by rule order
    /// alone, never by a phrase living in two tables.
    #[test]
    fn emotional_phrase_sets_are_disjoint() {
        let sets: &[(&str, &[&str])] = &[
            ("severe", SEVERE_PHRASES),
            ("anxiety", ANXIETY_PHRASES),
            ("fatigue", FATIGUE_PHRASES),
            ("sadness", SADNESS_PHRASES),
        ];
        for (i, (name_a, set_a)) in sets.iter().enumerate() {
            for (name_b, set_b) in &sets[i + 1..] {
                for phrase in *set_a {
                    assert!(
                        !set_b.contains(phrase),
                        "`{phrase}` appears in both {name_a} and {name_b}"
                    );
                }
            }
        }
    }
}
