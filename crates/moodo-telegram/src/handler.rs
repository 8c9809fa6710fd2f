// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message filtering and mapping.
//!
//! Decides whether an incoming Telegram message should be processed (text,
//! private chat, authorized sender) and maps it into the channel-agnostic
//! [`InboundMessage`].

use moodo_core::InboundMessage;
use teloxide::types::{ChatKind, Message};

/// Checks whether the message sender is authorized.
///
/// An empty `allowed_users` list accepts everyone -- the journal is open
/// to whoever finds the bot. A non-empty list restricts to those chat ids.
pub fn is_authorized(chat_id: i64, allowed_users: &[i64]) -> bool {
    allowed_users.is_empty() || allowed_users.contains(&chat_id)
}

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Maps a Telegram message into an [`InboundMessage`].
///
/// Returns `None` for anything without a text payload (stickers, photos,
/// voice, ...) -- the journal only accepts text.
pub fn to_inbound(update_id: i64, msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    Some(InboundMessage {
        update_id,
        chat_id: msg.chat.id.0,
        text: text.to_string(),
        timestamp: msg.date.to_rfc3339(),
    })
}
