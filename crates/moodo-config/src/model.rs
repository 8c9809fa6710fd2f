// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Moodo agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Moodo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MoodoConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Scheduler settings (reminders, reports, digests, letter delivery).
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Optional grammar-correction pass-through settings.
    #[serde(default)]
    pub grammar: GrammarConfig,

    /// Lexicon extensions (extra profanity roots).
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "moodo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram channel.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// List of allowed Telegram user IDs. Empty means every private chat
    /// is accepted (the journal is open to anyone who finds the bot).
    #[serde(default)]
    pub allowed_users: Vec<i64>,

    /// Long-poll timeout passed to getUpdates, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            allowed_users: Vec::new(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

fn default_poll_timeout_secs() -> u32 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("moodo").join("moodo.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("moodo.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Scheduler configuration.
///
/// Cron patterns are five-field (minute granularity), evaluated in local time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// When to nudge users who have no entry yet today.
    #[serde(default = "default_reminder_cron")]
    pub reminder_cron: String,

    /// When to send the end-of-day report.
    #[serde(default = "default_report_cron")]
    pub report_cron: String,

    /// When to send the weekly digest.
    #[serde(default = "default_weekly_cron")]
    pub weekly_cron: String,

    /// When to send the monthly digest.
    #[serde(default = "default_monthly_cron")]
    pub monthly_cron: String,

    /// How often to scan for due deferred letters, in seconds.
    #[serde(default = "default_letter_scan_secs")]
    pub letter_scan_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            reminder_cron: default_reminder_cron(),
            report_cron: default_report_cron(),
            weekly_cron: default_weekly_cron(),
            monthly_cron: default_monthly_cron(),
            letter_scan_secs: default_letter_scan_secs(),
        }
    }
}

fn default_reminder_cron() -> String {
    "0 19 * * *".to_string()
}

fn default_report_cron() -> String {
    "0 21 * * *".to_string()
}

// Sunday evening, matching the onboarding promise.
fn default_weekly_cron() -> String {
    "0 19 * * 0".to_string()
}

fn default_monthly_cron() -> String {
    "0 10 1 * *".to_string()
}

fn default_letter_scan_secs() -> u64 {
    30
}

/// Optional grammar-correction configuration (LanguageTool HTTP API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarConfig {
    /// Enable the correction pass. Disabled by default; requires network.
    #[serde(default)]
    pub enabled: bool,

    /// LanguageTool check endpoint.
    #[serde(default = "default_grammar_endpoint")]
    pub endpoint: String,

    /// Language code sent with each check request.
    #[serde(default = "default_grammar_language")]
    pub language: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_grammar_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_grammar_endpoint(),
            language: default_grammar_language(),
            timeout_secs: default_grammar_timeout_secs(),
        }
    }
}

fn default_grammar_endpoint() -> String {
    "https://api.languagetool.org/v2/check".to_string()
}

fn default_grammar_language() -> String {
    "ru-RU".to_string()
}

fn default_grammar_timeout_secs() -> u64 {
    10
}

/// Lexicon extensions.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LexiconConfig {
    /// Extra profanity roots masked in addition to the built-in list.
    #[serde(default)]
    pub extra_profanity: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_deny_unknown_fields() {
        let toml_str = r#"
[schedule]
reminder_cron = "0 19 * * *"
snooze_cron = "0 20 * * *"
"#;
        let result = toml::from_str::<MoodoConfig>(toml_str);
        assert!(result.is_err(), "unknown schedule key must be rejected");
    }

    #[test]
    fn defaults_are_complete() {
        let config: MoodoConfig = toml::from_str("").unwrap();
        assert_eq!(config.agent.name, "moodo");
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert!(config.storage.wal_mode);
        assert_eq!(config.schedule.letter_scan_secs, 30);
        assert_eq!(config.grammar.language, "ru-RU");
    }
}
