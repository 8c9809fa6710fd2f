// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and sane scheduler intervals.

use crate::diagnostic::ConfigError;
use crate::model::MoodoConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MoodoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.telegram.poll_timeout_secs == 0 || config.telegram.poll_timeout_secs > 300 {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.poll_timeout_secs must be in 1..=300, got {}",
                config.telegram.poll_timeout_secs
            ),
        });
    }

    if let Some(ref token) = config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    for (name, pattern) in [
        ("schedule.reminder_cron", &config.schedule.reminder_cron),
        ("schedule.report_cron", &config.schedule.report_cron),
        ("schedule.weekly_cron", &config.schedule.weekly_cron),
        ("schedule.monthly_cron", &config.schedule.monthly_cron),
    ] {
        if pattern.split_whitespace().count() != 5 {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be a five-field cron pattern, got `{pattern}`"),
            });
        }
    }

    if config.schedule.letter_scan_secs < 5 {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.letter_scan_secs must be at least 5, got {}",
                config.schedule.letter_scan_secs
            ),
        });
    }

    if config.grammar.enabled && config.grammar.endpoint.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "grammar.endpoint must not be empty when grammar.enabled = true".to_string(),
        });
    }

    for (i, root) in config.lexicon.extra_profanity.iter().enumerate() {
        if root.trim().len() < 3 {
            errors.push(ConfigError::Validation {
                message: format!(
                    "lexicon.extra_profanity[{i}] must be at least 3 characters, got `{root}`"
                ),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
