// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.

pub mod adapter;
pub mod channel;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
