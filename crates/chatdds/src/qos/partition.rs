// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! PARTITION QoS policy (DDS v1.4 Sec.2.2.3.13)
//!
//! Writers and readers communicate only if their partitions intersect.
//! An empty list is the default partition and only matches other empty
//! lists or an explicit `""` entry.

/// PARTITION QoS policy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition {
    /// Partition names (case-sensitive). Empty = default partition.
    pub names: Vec<String>,
}

impl Partition {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn single(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
        }
    }

    pub fn is_default(&self) -> bool {
        self.names.is_empty()
    }

    /// Names with the default partition spelled as `""`.
    fn effective(&self) -> Vec<&str> {
        if self.names.is_empty() {
            vec![""]
        } else {
            self.names.iter().map(String::as_str).collect()
        }
    }

    pub fn is_compatible_with(&self, other: &Partition) -> bool {
        let mine = self.effective();
        other.effective().iter().any(|name| mine.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_default() {
        assert!(Partition::default().is_compatible_with(&Partition::default()));
    }

    #[test]
    fn test_named_does_not_match_default() {
        assert!(!Partition::single("ChatRoom").is_compatible_with(&Partition::default()));
    }

    #[test]
    fn test_explicit_empty_name_matches_default() {
        assert!(Partition::single("").is_compatible_with(&Partition::default()));
    }

    #[test]
    fn test_intersection() {
        let writer = Partition::new(vec!["a".into(), "ChatRoom".into()]);
        assert!(writer.is_compatible_with(&Partition::single("ChatRoom")));
        assert!(!writer.is_compatible_with(&Partition::single("Lobby")));
    }
}
