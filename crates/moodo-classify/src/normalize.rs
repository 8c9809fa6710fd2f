// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization: the single canonical form every phrase table is
//! written against.

/// Normalize raw message text.
///
/// Lower-cases, folds `ё` to `е`, replaces every character outside
/// {letter, digit, whitespace} with a space, then collapses whitespace
/// runs and trims. Pure, deterministic, and idempotent:
/// `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    for c in input.chars() {
        for lc in c.to_lowercase() {
            let lc = if lc == 'ё' { 'е' } else { lc };
            if lc.is_alphanumeric() {
                cleaned.push(lc);
            } else {
                cleaned.push(' ');
            }
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lowercases_and_folds_yo() {
        assert_eq!(normalize("ВесЁлый ДенЁк"), "веселый денек");
    }

    #[test]
    fn strips_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("  ну,   и -- денёк!!! "), "ну и денек");
    }

    #[test]
    fn only_punctuation_normalizes_to_empty() {
        assert_eq!(normalize("?!... - ..."), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn digits_are_kept() {
        assert_eq!(normalize("7 дней"), "7 дней");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalized_has_no_leading_or_double_spaces(s in "\\PC*") {
            let n = normalize(&s);
            prop_assert!(!n.starts_with(' '));
            prop_assert!(!n.ends_with(' '));
            prop_assert!(!n.contains("  "));
        }
    }
}
