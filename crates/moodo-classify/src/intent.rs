// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intent classifier: a priority-ordered rule evaluator.
//!
//! Every inbound message resolves to exactly one [`Intent`]. The rules run
//! in the fixed order of [`RULES`]; the first match wins. That ordering is
//! the load-bearing design decision -- the phrase sets overlap in spirit
//! (a message can sound both tired and sad), and ties are resolved purely
//! by position in the table, which keeps the priority auditable and
//! testable in isolation from any I/O.

use crate::lexicon;
use crate::normalize::normalize;
use crate::profanity::ProfanityMasker;

/// A recognized slash command (or text alias).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// `/start` and `/help`: onboarding message.
    Start,
    /// `/stats`: total count, streak, first entry date.
    Stats,
    /// `/week`: on-demand digest of the current week.
    Week,
    /// `/memories` (or the "напомни о всем хорошем" alias): random recall.
    Memories,
    /// `/letter`: enter the letter-to-future-self dialog.
    Letter,
    /// `/cancel`: clear any open dialog. Global, works mid-dialog.
    Cancel,
    /// Leading slash but not a known command.
    Unknown,
}

/// The single classification label assigned to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Command(BotCommand),
    /// A dialog is open; the text belongs to its next step.
    DialogContinuation,
    Profanity,
    SevereDistress,
    Anxiety,
    Fatigue,
    Sadness,
    Greeting,
    /// Empty after normalization, or a "don't know what to write" phrase.
    NoContent,
    /// The fallback: an acceptable joy entry.
    Joy,
}

/// Greeting matching only applies to short messages; a long entry that
/// happens to open with "привет" is still a joy entry.
const GREETING_MAX_CHARS: usize = 32;

/// Inputs shared by every rule.
pub struct RuleInput<'a> {
    raw: &'a str,
    normalized: &'a str,
    has_open_dialog: bool,
}

type RuleFn = fn(&IntentClassifier, &RuleInput<'_>) -> Option<Intent>;

struct Rule {
    name: &'static str,
    eval: RuleFn,
}

/// The priority table. Order is semantics -- do not reorder without
/// revisiting every tie-break test.
const RULES: &[Rule] = &[
    Rule { name: "command", eval: rule_command },
    Rule { name: "dialog_continuation", eval: rule_dialog },
    Rule { name: "profanity", eval: rule_profanity },
    Rule { name: "severe_distress", eval: rule_severe },
    Rule { name: "anxiety", eval: rule_anxiety },
    Rule { name: "fatigue", eval: rule_fatigue },
    Rule { name: "sadness", eval: rule_sadness },
    Rule { name: "greeting", eval: rule_greeting },
    Rule { name: "no_content", eval: rule_no_content },
    Rule { name: "joy", eval: rule_joy },
];

/// Maps `(text, has_open_dialog)` to exactly one [`Intent`].
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    masker: ProfanityMasker,
}

impl IntentClassifier {
    pub fn new(masker: ProfanityMasker) -> Self {
        Self { masker }
    }

    /// Classify one inbound message.
    pub fn classify(&self, raw: &str, has_open_dialog: bool) -> Intent {
        let normalized = normalize(raw);
        let input = RuleInput {
            raw,
            normalized: &normalized,
            has_open_dialog,
        };

        for rule in RULES {
            if let Some(intent) = (rule.eval)(self, &input) {
                tracing::debug!(rule = rule.name, ?intent, "message classified");
                return intent;
            }
        }
        // The last rule is a catch-all; this is unreachable by construction.
        Intent::Joy
    }

    /// The masker used by the profanity gate, shared with the dispatcher's
    /// pre-persist sanitizing pass.
    pub fn masker(&self) -> &ProfanityMasker {
        &self.masker
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(ProfanityMasker::new())
    }
}

/// Parse a slash command or text alias. Returns `None` for ordinary text.
pub fn parse_command(text: &str) -> Option<BotCommand> {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        let word = rest.split_whitespace().next().unwrap_or("");
        // Strip the @BotName suffix Telegram appends in some clients.
        let word = word.split('@').next().unwrap_or(word);
        let command = match word.to_lowercase().as_str() {
            "start" | "help" => BotCommand::Start,
            "stats" => BotCommand::Stats,
            "week" => BotCommand::Week,
            "memories" => BotCommand::Memories,
            "letter" => BotCommand::Letter,
            "cancel" => BotCommand::Cancel,
            _ => BotCommand::Unknown,
        };
        return Some(command);
    }

    let normalized = normalize(trimmed);
    if lexicon::MEMORIES_TRIGGERS.contains(&normalized.as_str()) {
        return Some(BotCommand::Memories);
    }
    None
}

fn contains_phrase(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| normalized.contains(p))
}

fn rule_command(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    parse_command(input.raw).map(Intent::Command)
}

fn rule_dialog(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    input.has_open_dialog.then_some(Intent::DialogContinuation)
}

fn rule_profanity(c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    c.masker
        .contains_profanity(input.raw)
        .then_some(Intent::Profanity)
}

fn rule_severe(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    contains_phrase(input.normalized, lexicon::SEVERE_PHRASES).then_some(Intent::SevereDistress)
}

fn rule_anxiety(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    contains_phrase(input.normalized, lexicon::ANXIETY_PHRASES).then_some(Intent::Anxiety)
}

fn rule_fatigue(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    contains_phrase(input.normalized, lexicon::FATIGUE_PHRASES).then_some(Intent::Fatigue)
}

fn rule_sadness(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    contains_phrase(input.normalized, lexicon::SADNESS_PHRASES).then_some(Intent::Sadness)
}

fn rule_greeting(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    let n = input.normalized;
    if n.chars().count() > GREETING_MAX_CHARS {
        return None;
    }
    let is_greeting = lexicon::GREETING_PHRASES
        .iter()
        .any(|g| n == *g || n.starts_with(&format!("{g} ")));
    is_greeting.then_some(Intent::Greeting)
}

fn rule_no_content(_c: &IntentClassifier, input: &RuleInput<'_>) -> Option<Intent> {
    if input.normalized.is_empty()
        || contains_phrase(input.normalized, lexicon::NO_CONTENT_PHRASES)
    {
        return Some(Intent::NoContent);
    }
    None
}

fn rule_joy(_c: &IntentClassifier, _input: &RuleInput<'_>) -> Option<Intent> {
    Some(Intent::Joy)
}
