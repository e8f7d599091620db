// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for CDR2 buffer manipulation.
//!
//! Alignment is relative to the start of the buffer, so a cursor must be
//! created on the first byte of the CDR body.

use super::{SerError, SerResult};

/// Generate write methods for primitive types.
macro_rules! impl_write_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> SerResult<()> {
            self.write_bytes(&value.to_le_bytes())
        }
    };
}

/// Generate read methods for primitive types.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> SerResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Mutable cursor for writing (bounds-checked).
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_write_le!(write_u16_le, u16, 2);
    impl_write_le!(write_u32_le, u32, 4);
    impl_write_le!(write_u64_le, u64, 8);
    impl_write_le!(write_i32_le, i32, 4);
    impl_write_le!(write_i64_le, i64, 8);

    pub fn write_u8(&mut self, value: u8) -> SerResult<()> {
        self.write_bytes(&[value])
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> SerResult<()> {
        if self.offset + data.len() > self.buffer.len() {
            return Err(SerError::WriteFailed {
                offset: self.offset,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Write a CDR string: u32 length (including NUL), bytes, NUL.
    pub fn write_string(&mut self, value: &str) -> SerResult<()> {
        self.align(4)?;
        let len = u32::try_from(value.len() + 1).map_err(|_| SerError::WriteFailed {
            offset: self.offset,
            reason: "string longer than u32::MAX".into(),
        })?;
        self.write_u32_le(len)?;
        self.write_bytes(value.as_bytes())?;
        self.write_u8(0)
    }

    /// Write a length-prefixed opaque octet sequence.
    pub fn write_octets(&mut self, data: &[u8]) -> SerResult<()> {
        self.align(4)?;
        let len = u32::try_from(data.len()).map_err(|_| SerError::WriteFailed {
            offset: self.offset,
            reason: "sequence longer than u32::MAX".into(),
        })?;
        self.write_u32_le(len)?;
        self.write_bytes(data)
    }

    /// Advance to the next multiple of `alignment`, zeroing the padding.
    pub fn align(&mut self, alignment: u8) -> SerResult<()> {
        if alignment <= 1 {
            return Ok(());
        }
        let mask = (alignment as usize) - 1;
        let aligned = (self.offset + mask) & !mask;
        if aligned > self.buffer.len() {
            return Err(SerError::WriteFailed {
                offset: aligned,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..aligned].fill(0);
        self.offset = aligned;
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy).
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_read_le!(read_u16_le, u16, 2);
    impl_read_le!(read_u32_le, u32, 4);
    impl_read_le!(read_u64_le, u64, 8);
    impl_read_le!(read_i32_le, i32, 4);
    impl_read_le!(read_i64_le, i64, 8);

    pub fn read_u8(&mut self) -> SerResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_bytes(&mut self, len: usize) -> SerResult<&'a [u8]> {
        let end = self.offset.checked_add(len).ok_or(SerError::ReadFailed {
            offset: self.offset,
            reason: "length overflow".into(),
        })?;
        if end > self.buffer.len() {
            return Err(SerError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Read a CDR string written by [`CursorMut::write_string`].
    pub fn read_string(&mut self) -> SerResult<String> {
        self.align(4)?;
        let len = self.read_u32_le()? as usize;
        if len == 0 {
            return Err(SerError::InvalidData {
                reason: "string length 0 (missing NUL terminator)".into(),
            });
        }
        let raw = self.read_bytes(len)?;
        let (body, nul) = raw.split_at(len - 1);
        if nul != [0] {
            return Err(SerError::InvalidData {
                reason: "string not NUL terminated".into(),
            });
        }
        String::from_utf8(body.to_vec()).map_err(|e| SerError::InvalidData {
            reason: format!("string is not UTF-8: {}", e),
        })
    }

    /// Read an octet sequence written by [`CursorMut::write_octets`].
    pub fn read_octets(&mut self) -> SerResult<&'a [u8]> {
        self.align(4)?;
        let len = self.read_u32_le()? as usize;
        self.read_bytes(len)
    }

    pub fn align(&mut self, alignment: u8) -> SerResult<()> {
        if alignment <= 1 {
            return Ok(());
        }
        let mask = (alignment as usize) - 1;
        let aligned = (self.offset + mask) & !mask;
        if aligned > self.buffer.len() {
            return Err(SerError::ReadFailed {
                offset: aligned,
                reason: "unexpected end of buffer".into(),
            });
        }
        self.offset = aligned;
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_mut_write_overflow_reports_offset() {
        let mut buffer = [0u8; 2];
        let mut cursor = CursorMut::new(&mut buffer);
        cursor.write_u16_le(0xABCD).expect("Write u16 should succeed");

        let err = cursor.write_u8(0xFF).unwrap_err();
        match err {
            SerError::WriteFailed { offset, reason } => {
                assert_eq!(offset, 2);
                assert_eq!(reason, "buffer too small");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_cursor_read_overflow_reports_offset() {
        let buffer = [0u8; 1];
        let mut cursor = Cursor::new(&buffer);
        assert_eq!(cursor.read_u8().expect("Read u8 should succeed"), 0);

        let err = cursor.read_u8().unwrap_err();
        assert!(matches!(err, SerError::ReadFailed { offset: 1, .. }));
    }

    #[test]
    fn test_cursor_align_zeroes_padding() {
        let mut buffer = [0xEEu8; 8];
        let mut cursor = CursorMut::new(&mut buffer);
        cursor.write_u8(1).expect("Write u8 should succeed");
        cursor.align(4).expect("Align should succeed");
        assert_eq!(cursor.offset(), 4);
        assert_eq!(&buffer[..4], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_string_layout_matches_cdr() {
        let mut buffer = [0u8; 16];
        let mut cursor = CursorMut::new(&mut buffer);
        cursor.write_u8(9).expect("Write u8 should succeed");
        cursor.write_string("hi").expect("Write string should succeed");
        assert_eq!(cursor.offset(), 11);
        // u8, 3 bytes padding, len=3, 'h' 'i' NUL
        assert_eq!(&buffer[..11], &[9, 0, 0, 0, 3, 0, 0, 0, b'h', b'i', 0]);

        let mut reader = Cursor::new(&buffer[..11]);
        assert_eq!(reader.read_u8().expect("Read u8 should succeed"), 9);
        assert_eq!(reader.read_string().expect("Read string should succeed"), "hi");
        assert!(reader.is_eof());
    }

    #[test]
    fn test_read_string_rejects_missing_nul() {
        let buffer = [2u8, 0, 0, 0, b'a', b'b'];
        let mut reader = Cursor::new(&buffer);
        assert!(matches!(
            reader.read_string(),
            Err(SerError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_read_string_rejects_zero_length() {
        let buffer = [0u8; 4];
        let mut reader = Cursor::new(&buffer);
        assert!(reader.read_string().is_err());
    }

    #[test]
    fn test_read_octets_truncated() {
        let buffer = [10u8, 0, 0, 0, 1, 2];
        let mut reader = Cursor::new(&buffer);
        assert!(matches!(
            reader.read_octets(),
            Err(SerError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_signed_values() {
        let mut buffer = [0u8; 16];
        {
            let mut writer = CursorMut::new(&mut buffer);
            writer.write_i32_le(-1).expect("Write i32 should succeed");
            writer.align(8).expect("Align should succeed");
            writer.write_i64_le(-42).expect("Write i64 should succeed");
        }
        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_i32_le().expect("Read i32 should succeed"), -1);
        reader.align(8).expect("Align should succeed");
        assert_eq!(reader.read_i64_le().expect("Read i64 should succeed"), -42);
    }
}
