// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Chat tutorial on chatdds
//!
//! Two roles share a chat room:
//!
//! ```text
//! ┌───────────┐   Chat_NameService  (reliable, transient)   ┌──────────────┐
//! │  Chatter  │ ──────────────────────────────────────────▶ │ MessageBoard │
//! │ (writers) │   Chat_ChatMessage  (reliable writer,       │  (readers)   │
//! │           │                      best-effort reader)    │              │
//! └───────────┘ ──────────────────────────────────────────▶ └──────────────┘
//!                       partition "ChatRoom"
//! ```
//!
//! A [`Chatter`] announces its name, sends a greeting and ten numbered
//! messages, then withdraws. A [`MessageBoard`] prints whatever arrives
//! until a message from sender [`TERMINATION_MESSAGE`] closes it.
//!
//! The executables `chatter` and `messageboard` are thin wrappers around
//! these sessions; the sessions themselves write to any `io::Write` so the
//! whole exchange can run inside one test process.

pub mod chatter;
pub mod check;
pub mod config;
pub mod error;
pub mod messageboard;
pub mod qos_print;
pub mod types;

pub use chatter::{Chatter, ChatterReport, NUM_MSG};
pub use config::ChatSettings;
pub use error::{ChatError, ChatResult};
pub use messageboard::{BoardOutcome, BoardReport, MessageBoard};
pub use types::{ChatMessage, NameService};

/// Sender id reserved for the message that closes the board.
pub const TERMINATION_MESSAGE: i32 = -1;

/// Partition shared by every chat publisher and subscriber.
pub const CHAT_ROOM: &str = "ChatRoom";

/// Topic carrying chat messages.
pub const CHAT_MESSAGE_TOPIC: &str = "Chat_ChatMessage";

/// Topic carrying the name of each connected chatter.
pub const NAME_SERVICE_TOPIC: &str = "Chat_NameService";
