// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Moodo joy-journal agent.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Moodo workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MoodoError;
pub use types::{AdapterType, ChatId, HealthStatus, InboundMessage, OutboundMessage};

pub use traits::{ChannelAdapter, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moodo_error_has_all_variants() {
        let _config = MoodoError::Config("test".into());
        let _storage = MoodoError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = MoodoError::Channel {
            message: "test".into(),
            source: None,
        };
        let _grammar = MoodoError::Grammar {
            message: "test".into(),
            source: None,
        };
        let _internal = MoodoError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Storage] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn outbound_message_constructor() {
        let out = OutboundMessage::new(42, "hello");
        assert_eq!(out.chat_id, 42);
        assert_eq!(out.text, "hello");
    }
}
