// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profanity detection and masking.
//!
//! Works word by word: each whitespace-delimited word is folded (lowercase,
//! `ё`->`е`, homoglyphs mapped, punctuation dropped) and searched for the
//! configured obscene roots. A word whose folded form contains a root is
//! replaced by asterisks of equal character length, preserving all
//! surrounding text and spacing exactly.
//!
//! Masking is idempotent: an already-masked word folds to the empty string
//! and can never match a root again.

use crate::lexicon::{HOMOGLYPHS, PROFANITY_ROOTS};
use crate::normalize::normalize;

/// Detects and masks obscene-root substrings, including lightly
/// obfuscated spellings (inserted punctuation, Latin/digit homoglyphs).
#[derive(Debug, Clone)]
pub struct ProfanityMasker {
    roots: Vec<String>,
}

impl ProfanityMasker {
    /// Masker with the built-in root list.
    pub fn new() -> Self {
        Self::with_extra_roots(&[])
    }

    /// Masker with the built-in roots plus configured extras.
    ///
    /// Extra roots are normalized on the way in so the config may carry
    /// any spelling.
    pub fn with_extra_roots(extra: &[String]) -> Self {
        let mut roots: Vec<String> = PROFANITY_ROOTS.iter().map(|r| r.to_string()).collect();
        for root in extra {
            let folded = normalize(root);
            if !folded.is_empty() && !roots.contains(&folded) {
                roots.push(folded);
            }
        }
        Self { roots }
    }

    /// Whether any word of `text` contains an obscene root.
    pub fn contains_profanity(&self, text: &str) -> bool {
        text.split_whitespace()
            .any(|word| self.word_is_profane(word))
    }

    /// Replace each profane word with `*` repeated to the word's length.
    pub fn mask(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut word = String::new();

        for c in text.chars() {
            if c.is_whitespace() {
                self.flush_word(&mut out, &mut word);
                out.push(c);
            } else {
                word.push(c);
            }
        }
        self.flush_word(&mut out, &mut word);
        out
    }

    fn flush_word(&self, out: &mut String, word: &mut String) {
        if word.is_empty() {
            return;
        }
        if self.word_is_profane(word) {
            out.extend(std::iter::repeat_n('*', word.chars().count()));
        } else {
            out.push_str(word);
        }
        word.clear();
    }

    fn word_is_profane(&self, word: &str) -> bool {
        let folded = fold_word(word);
        if folded.is_empty() {
            return false;
        }
        self.roots.iter().any(|root| folded.contains(root.as_str()))
    }
}

impl Default for ProfanityMasker {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold one word for root matching: lowercase, `ё`->`е`, homoglyphs mapped
/// to their Cyrillic base, everything non-alphanumeric dropped.
fn fold_word(word: &str) -> String {
    let mut folded = String::with_capacity(word.len());
    for c in word.chars() {
        for lc in c.to_lowercase() {
            let lc = if lc == 'ё' { 'е' } else { lc };
            let lc = HOMOGLYPHS
                .iter()
                .find(|(from, _)| *from == lc)
                .map(|(_, to)| *to)
                .unwrap_or(lc);
            if lc.is_alphanumeric() {
                folded.push(lc);
            }
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_obscenity_is_masked_with_equal_length() {
        let m = ProfanityMasker::new();
        assert_eq!(m.mask("ну и сука денёк"), "ну и **** денёк");
    }

    #[test]
    fn punctuation_obfuscation_is_caught() {
        let m = ProfanityMasker::new();
        assert!(m.contains_profanity("с.у.к.а такая"));
        assert_eq!(m.mask("с.у.к.а такая"), "******* такая");
    }

    #[test]
    fn homoglyph_obfuscation_is_caught() {
        let m = ProfanityMasker::new();
        // Latin 'c', 'y', 'k', 'a' standing in for Cyrillic.
        assert!(m.contains_profanity("cyka"));
        assert!(m.contains_profanity("сук@"));
    }

    #[test]
    fn embedded_root_masks_whole_word() {
        let m = ProfanityMasker::new();
        assert_eq!(m.mask("охуенно"), "*******");
        assert_eq!(m.mask("заебато"), "*******");
    }

    #[test]
    fn clean_text_is_unchanged() {
        let m = ProfanityMasker::new();
        let text = "сегодня пила вкусный кофе с подругой";
        assert!(!m.contains_profanity(text));
        assert_eq!(m.mask(text), text);
    }

    #[test]
    fn spacing_is_preserved_exactly() {
        let m = ProfanityMasker::new();
        assert_eq!(m.mask("  сука \n денёк "), "  **** \n денёк ");
    }

    #[test]
    fn extra_roots_from_config_are_matched() {
        let m = ProfanityMasker::with_extra_roots(&["Дурак".to_string()]);
        assert!(m.contains_profanity("ну ты и дурак"));
        assert_eq!(m.mask("дурак!"), "******");
    }

    #[test]
    fn masked_text_is_not_flagged() {
        let m = ProfanityMasker::new();
        assert!(!m.contains_profanity("ну и **** денёк"));
    }

    proptest! {
        #[test]
        fn masking_is_idempotent(s in "\\PC*") {
            let m = ProfanityMasker::new();
            let once = m.mask(&s);
            prop_assert_eq!(m.mask(&once), once);
        }

        #[test]
        fn masking_preserves_char_count(s in "\\PC*") {
            let m = ProfanityMasker::new();
            prop_assert_eq!(m.mask(&s).chars().count(), s.chars().count());
        }
    }
}
