// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moodo - a Telegram joy-journal agent.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Moodo - a Telegram joy-journal agent.
#[derive(Parser, Debug)]
#[command(name = "moodo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Moodo agent: long polling plus schedulers.
    Serve,
    /// Check configuration, storage, and Telegram connectivity.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match moodo_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            moodo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Some(Commands::Serve) | None => serve::run(config).await,
        Some(Commands::Doctor) => doctor::run(config).await,
    };

    if let Err(e) = result {
        eprintln!("moodo: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn default_config_is_valid() {
        let config = moodo_config::MoodoConfig::default();
        assert_eq!(config.agent.name, "moodo");
        assert!(moodo_config::validation::validate_config(&config).is_ok());
    }
}
