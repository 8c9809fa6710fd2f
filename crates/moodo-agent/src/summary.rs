// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Digest composition for daily, weekly, and monthly summaries.
//!
//! Applies the same "empty/no-content placeholder" filter used at
//! ingestion, so a phrase that ever slipped through as literal stored
//! text never shows up in a digest.

use chrono::DateTime;
use moodo_classify::{lexicon, normalize};
use moodo_storage::JoyEntry;

/// Naive keyword-to-theme table for the closing digest sentence.
/// Keywords are matched as substrings of normalized entry text.
const THEMES: &[(&[&str], &str)] = &[
    (
        &["кофе", "чай", "еда", "вкусн", "пирог", "шоколад", "завтрак", "ужин"],
        "вкусные моменты",
    ),
    (
        &["подруг", "друг", "семь", "мама", "папа", "сестр", "брат", "близк"],
        "близкие люди",
    ),
    (
        &["прогул", "парк", "природ", "солнц", "закат", "небо", "лес", "море", "дожд"],
        "прогулки и природа",
    ),
    (
        &["книг", "фильм", "музык", "песн", "сериал", "концерт", "рисов"],
        "книги, музыка и кино",
    ),
    (
        &["работ", "проект", "успе", "получилось", "справил", "сдал"],
        "маленькие победы",
    ),
];

/// Minimum keyword hits before we dare name a theme.
const THEME_MIN_HITS: usize = 2;

/// Whether stored text is itself an empty/no-content placeholder.
pub fn is_placeholder(text: &str) -> bool {
    let normalized = normalize(text);
    normalized.is_empty()
        || lexicon::NO_CONTENT_PHRASES
            .iter()
            .any(|p| normalized.contains(p))
}

/// Compose a digest: header, one line per surviving entry, optional theme
/// sentence. Returns `fallback` when nothing survives the filter.
pub fn build_digest(entries: &[JoyEntry], header: &str, fallback: &str) -> String {
    let surviving: Vec<&JoyEntry> = entries
        .iter()
        .filter(|e| !is_placeholder(&e.text))
        .collect();

    if surviving.is_empty() {
        return fallback.to_string();
    }

    let mut lines = Vec::with_capacity(surviving.len());
    for entry in &surviving {
        lines.push(format!("✨ {} — {}", format_stamp(&entry.created_at), entry.text));
    }

    let mut digest = format!("{header}\n\n{}", lines.join("\n"));
    if let Some(sentence) = theme_sentence(&surviving) {
        digest.push_str("\n\n");
        digest.push_str(&sentence);
    }
    digest
}

/// One human-readable "you were mostly cheered by X" sentence, if any
/// theme collects enough keyword hits.
fn theme_sentence(entries: &[&JoyEntry]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;

    for (keywords, label) in THEMES {
        let hits: usize = entries
            .iter()
            .map(|e| {
                let normalized = normalize(&e.text);
                keywords
                    .iter()
                    .filter(|k| normalized.contains(*k))
                    .count()
            })
            .sum();
        if hits >= THEME_MIN_HITS && best.map(|(_, b)| hits > b).unwrap_or(true) {
            best = Some((label, hits));
        }
    }

    best.map(|(label, _)| format!("Похоже, чаще всего тебя радовали {label} 💛"))
}

/// Short local stamp for one digest line; falls back to the raw date
/// prefix when the stored timestamp fails to parse.
fn format_stamp(created_at: &str) -> String {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(dt) => dt.format("%d.%m %H:%M").to_string(),
        Err(_) => created_at.chars().take(10).collect(),
    }
}
