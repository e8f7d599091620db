// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chat session settings.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `CHAT_DOMAIN_ID` | DDS domain (default 0) |
//! | `CHAT_TRANSPORT` | `udp` (default) or `intra` |
//! | `CHAT_PARTITION` | Partition name (default `ChatRoom`) |
//!
//! Command-line flags override the environment.

use crate::error::{ChatError, ChatResult};
use crate::CHAT_ROOM;
use chatdds::config::MAX_DOMAIN_ID;
use chatdds::TransportMode;
use std::time::Duration;

/// Pause between two chatter messages.
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on one message board wait.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Settings shared by both chat roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub domain_id: u32,
    pub transport: TransportMode,
    pub partition: String,
    pub send_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            domain_id: 0,
            transport: TransportMode::UdpMulticast,
            partition: CHAT_ROOM.to_string(),
            send_interval: DEFAULT_SEND_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ChatSettings {
    /// Defaults overlaid with `CHAT_*` environment variables.
    pub fn from_env() -> ChatResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ChatSettings::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ChatResult<Self> {
        let mut settings = Self::default();
        if let Some(raw) = lookup("CHAT_DOMAIN_ID") {
            settings.domain_id = parse_domain_id(&raw)?;
        }
        if let Some(raw) = lookup("CHAT_TRANSPORT") {
            settings.transport = parse_transport(&raw)?;
        }
        if let Some(raw) = lookup("CHAT_PARTITION") {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(ChatError::Config("CHAT_PARTITION is empty".into()));
            }
            settings.partition = raw.to_string();
        }
        Ok(settings)
    }

    #[must_use]
    pub fn with_domain_id(mut self, domain_id: u32) -> Self {
        self.domain_id = domain_id;
        self
    }

    #[must_use]
    pub fn with_transport(mut self, transport: TransportMode) -> Self {
        self.transport = transport;
        self
    }

    #[must_use]
    pub fn with_partition(mut self, partition: &str) -> Self {
        self.partition = partition.to_string();
        self
    }

    #[must_use]
    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = interval;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Reject settings the middleware would refuse later.
    pub fn validate(&self) -> ChatResult<()> {
        if self.domain_id > MAX_DOMAIN_ID {
            return Err(ChatError::Config(format!(
                "domain {} out of range (0-{})",
                self.domain_id, MAX_DOMAIN_ID
            )));
        }
        if self.partition.is_empty() {
            return Err(ChatError::Config("partition name is empty".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(ChatError::Config("poll interval must be positive".into()));
        }
        Ok(())
    }
}

/// Parse a domain id (`0..=232`).
pub fn parse_domain_id(raw: &str) -> ChatResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(id) if id <= MAX_DOMAIN_ID => Ok(id),
        _ => Err(ChatError::Config(format!(
            "CHAT_DOMAIN_ID='{}' is not a domain id (0-{})",
            raw, MAX_DOMAIN_ID
        ))),
    }
}

/// Parse a transport name: `udp` or `intra`.
pub fn parse_transport(raw: &str) -> ChatResult<TransportMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "udp" | "multicast" => Ok(TransportMode::UdpMulticast),
        "intra" | "intraprocess" | "local" => Ok(TransportMode::IntraProcess),
        other => Err(ChatError::Config(format!(
            "CHAT_TRANSPORT='{}' (expected udp or intra)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let settings = ChatSettings::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(settings, ChatSettings::default());
        assert_eq!(settings.partition, "ChatRoom");
        assert_eq!(settings.transport, TransportMode::UdpMulticast);
        settings.validate().expect("defaults are valid");
    }

    #[test]
    fn test_environment_overrides() {
        let settings = ChatSettings::from_lookup(lookup(&[
            ("CHAT_DOMAIN_ID", "7"),
            ("CHAT_TRANSPORT", "INTRA"),
            ("CHAT_PARTITION", " Lobby "),
        ]))
        .expect("valid environment");
        assert_eq!(settings.domain_id, 7);
        assert_eq!(settings.transport, TransportMode::IntraProcess);
        assert_eq!(settings.partition, "Lobby");
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        for vars in [
            [("CHAT_DOMAIN_ID", "233")],
            [("CHAT_DOMAIN_ID", "-1")],
            [("CHAT_TRANSPORT", "carrier-pigeon")],
            [("CHAT_PARTITION", "  ")],
        ] {
            assert!(matches!(
                ChatSettings::from_lookup(lookup(&vars)),
                Err(ChatError::Config(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let settings = ChatSettings::default().with_poll_interval(Duration::ZERO);
        assert!(settings.validate().is_err());
        let settings = ChatSettings::default().with_domain_id(500);
        assert!(settings.validate().is_err());
    }
}
