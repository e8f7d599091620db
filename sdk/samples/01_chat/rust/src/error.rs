// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chat session errors.
//!
//! Every middleware failure carries the name of the DDS operation that
//! failed so the fatal-check helper can report it.

use thiserror::Error;

/// Chat session error.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A chatdds call returned an error.
    #[error("{operation} failed: {source}")]
    Middleware {
        operation: &'static str,
        #[source]
        source: chatdds::Error,
    },

    /// An operation produced no entity or value where one was required.
    #[error("{operation} returned a null handle")]
    NullHandle { operation: &'static str },

    /// Invalid settings (environment or command line).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Console output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for chat sessions.
pub type ChatResult<T> = Result<T, ChatError>;

/// Attach the failing operation name to a chatdds result.
pub trait OpExt<T> {
    fn op(self, operation: &'static str) -> ChatResult<T>;
}

impl<T> OpExt<T> for chatdds::Result<T> {
    fn op(self, operation: &'static str) -> ChatResult<T> {
        self.map_err(|source| ChatError::Middleware { operation, source })
    }
}

impl<T> OpExt<T> for Option<T> {
    fn op(self, operation: &'static str) -> ChatResult<T> {
        self.ok_or(ChatError::NullHandle { operation })
    }
}
