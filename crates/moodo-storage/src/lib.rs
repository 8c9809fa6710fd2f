// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Moodo joy-journal agent.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, typed query
//! modules, and the [`EntryStore`] facade used by the dispatcher and the
//! schedulers.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use database::Database;
pub use models::*;
pub use store::EntryStore;
