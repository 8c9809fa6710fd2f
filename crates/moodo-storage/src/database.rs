// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use moodo_core::MoodoError;
use tracing::debug;

use crate::migrations;

/// Handle to the Moodo SQLite database.
///
/// Cheap to clone; all clones share the single writer connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, MoodoError> {
        Self::open_with_options(path, true).await
    }

    /// Open with explicit WAL-mode choice (from `storage.wal_mode`).
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, MoodoError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| MoodoError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| MoodoError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            migrations::run_migrations(conn)
                .map_err(|e| rusqlite::Error::ModuleError(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the shared tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), MoodoError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the crate error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> MoodoError {
    MoodoError::Storage {
        source: Box::new(e),
    }
}
