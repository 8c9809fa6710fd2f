// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.

/// A recorded joy entry. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoyEntry {
    pub id: i64,
    pub chat_id: i64,
    /// Post-mask, trimmed, non-empty text.
    pub text: String,
    /// RFC 3339 local timestamp.
    pub created_at: String,
}

/// A timestamp-only marker for a message classified as distressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistressEvent {
    pub id: i64,
    pub chat_id: i64,
    pub created_at: String,
}

/// The single pending-interaction slot for a user, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogStateRow {
    pub chat_id: i64,
    /// Symbolic state name, e.g. `awaiting_period_choice`.
    pub state: String,
    /// Optional structured payload (e.g. the chosen deferral in days).
    pub meta: Option<String>,
    pub updated_at: String,
}

/// A letter to one's future self, scheduled for later delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredLetter {
    pub id: i64,
    pub chat_id: i64,
    pub text: String,
    pub created_at: String,
    /// Always `created_at + chosen days`, computed once at creation.
    pub send_at: String,
    pub sent: bool,
}
