// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./moodo.toml` > `~/.config/moodo/moodo.toml` >
//! `/etc/moodo/moodo.toml` with environment variable overrides via the
//! `MOODO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MoodoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/moodo/moodo.toml` (system-wide)
/// 3. `~/.config/moodo/moodo.toml` (user XDG config)
/// 4. `./moodo.toml` (local directory)
/// 5. `MOODO_*` environment variables
pub fn load_config() -> Result<MoodoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MoodoConfig::default()))
        .merge(Toml::file("/etc/moodo/moodo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("moodo/moodo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("moodo.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MoodoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MoodoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MoodoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MoodoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MOODO_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("MOODO_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("schedule_", "schedule.", 1)
            .replacen("grammar_", "grammar.", 1)
            .replacen("lexicon_", "lexicon.", 1);
        mapped.into()
    })
}
