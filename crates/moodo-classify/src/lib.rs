// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Moodo decision core: text normalization, profanity masking, and
//! priority-ordered intent classification.
//!
//! This crate is pure -- no I/O, no async -- so every rule and tie-break
//! is unit-testable in isolation. The dispatcher in `moodo-agent` wires
//! the classifier output to storage side effects and replies.

pub mod intent;
pub mod lexicon;
pub mod normalize;
pub mod profanity;

pub use intent::{BotCommand, Intent, IntentClassifier, parse_command};
pub use normalize::normalize;
pub use profanity::ProfanityMasker;
