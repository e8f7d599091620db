// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chat data types.
//!
//! ```idl
//! module Chat {
//!     struct ChatMessage {
//!         long userID;      // @key
//!         long index;
//!         string content;
//!     };
//!     struct NameService {
//!         long userID;      // @key
//!         string name;
//!     };
//! };
//! ```

use chatdds::core::ser::{key_hash, Cursor, CursorMut};
use chatdds::{Result, DDS};

/// One line of chat. `user_id` is the instance key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_id: i32,
    pub index: i32,
    pub content: String,
}

impl ChatMessage {
    pub fn new(user_id: i32, index: i32, content: impl Into<String>) -> Self {
        Self {
            user_id,
            index,
            content: content.into(),
        }
    }
}

impl DDS for ChatMessage {
    fn type_name() -> &'static str {
        "Chat::ChatMessage"
    }

    fn encode_cdr2(&self, buf: &mut [u8]) -> Result<usize> {
        let mut cursor = CursorMut::new(buf);
        cursor.write_i32_le(self.user_id)?;
        cursor.write_i32_le(self.index)?;
        cursor.write_string(&self.content)?;
        Ok(cursor.offset())
    }

    fn decode_cdr2(buf: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(buf);
        let user_id = cursor.read_i32_le()?;
        let index = cursor.read_i32_le()?;
        let content = cursor.read_string()?;
        Ok(Self {
            user_id,
            index,
            content,
        })
    }

    fn compute_key(&self) -> [u8; 16] {
        key_hash(&self.user_id.to_be_bytes())
    }

    fn has_key() -> bool {
        true
    }
}

/// Display name announced by a chatter. `user_id` is the instance key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameService {
    pub user_id: i32,
    pub name: String,
}

impl NameService {
    pub fn new(user_id: i32, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

impl DDS for NameService {
    fn type_name() -> &'static str {
        "Chat::NameService"
    }

    fn encode_cdr2(&self, buf: &mut [u8]) -> Result<usize> {
        let mut cursor = CursorMut::new(buf);
        cursor.write_i32_le(self.user_id)?;
        cursor.write_string(&self.name)?;
        Ok(cursor.offset())
    }

    fn decode_cdr2(buf: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(buf);
        let user_id = cursor.read_i32_le()?;
        let name = cursor.read_string()?;
        Ok(Self { user_id, name })
    }

    fn compute_key(&self) -> [u8; 16] {
        key_hash(&self.user_id.to_be_bytes())
    }

    fn has_key() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_wire_layout() {
        let msg = ChatMessage::new(5, 2, "hi");
        let mut buf = [0u8; 64];
        let len = msg.encode_cdr2(&mut buf).expect("encode should succeed");
        assert_eq!(
            &buf[..len],
            &[5, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, b'h', b'i', 0]
        );
        let decoded = ChatMessage::decode_cdr2(&buf[..len]).expect("decode should succeed");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_key_depends_on_user_id_only() {
        let a = ChatMessage::new(7, 1, "one");
        let b = ChatMessage::new(7, 9, "two");
        let c = ChatMessage::new(-1, 1, "one");
        assert_eq!(a.compute_key(), b.compute_key());
        assert_ne!(a.compute_key(), c.compute_key());
        assert_eq!(
            NameService::new(7, "Alice").compute_key(),
            a.compute_key()
        );
    }

    #[test]
    fn test_truncated_name_record_is_rejected() {
        let record = NameService::new(3, "Bob");
        let mut buf = [0u8; 32];
        let len = record.encode_cdr2(&mut buf).expect("encode should succeed");
        assert!(NameService::decode_cdr2(&buf[..len - 2]).is_err());
    }

    #[test]
    fn test_encode_into_small_buffer_fails() {
        let msg = ChatMessage::new(1, 0, "a rather long line of chat");
        let mut buf = [0u8; 12];
        assert!(msg.encode_cdr2(&mut buf).is_err());
    }
}
