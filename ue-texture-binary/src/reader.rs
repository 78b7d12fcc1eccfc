//! Binary data reader for cooked package streams
//!
//! Cooked Unreal data is always little endian.

use crate::error::{Result, TextureError};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// Binary reader over an in-memory stream
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    /// Create a new binary reader from byte slice
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Create a reader positioned at `pos`
    pub fn at(data: &'a [u8], pos: u64) -> Self {
        let mut reader = Self::new(data);
        reader.set_position(pos);
        reader
    }

    /// Get current position in the stream
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Set position in the stream
    pub fn set_position(&mut self, pos: u64) {
        self.cursor.set_position(pos);
    }

    /// Get remaining bytes from current position
    pub fn remaining(&self) -> usize {
        self.cursor
            .get_ref()
            .len()
            .saturating_sub(self.position() as usize)
    }

    /// Check if we have at least `count` bytes remaining
    pub fn has_bytes(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    fn ensure(&self, count: usize) -> Result<()> {
        if !self.has_bytes(count) {
            return Err(TextureError::not_enough_data(
                self.position(),
                count,
                self.remaining(),
            ));
        }
        Ok(())
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    /// Read an unsigned 16-bit integer
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    /// Read an unsigned 32-bit integer
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    /// Read a signed 32-bit integer
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    /// Read an unsigned 64-bit integer
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    /// Read a signed 64-bit integer
    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.cursor.read_i64::<LittleEndian>()?)
    }

    /// Read a fixed number of bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.ensure(count)?;
        let mut buffer = vec![0u8; count];
        self.cursor.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a fixed-size byte array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut buffer = [0u8; N];
        self.cursor.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read an engine string (`FString`)
    ///
    /// A positive length counts bytes of a null-terminated narrow string, a
    /// negative length counts UTF-16 code units. Zero is the empty string.
    pub fn read_fstring(&mut self) -> Result<String> {
        let start = self.position();
        let length = self.read_i32()?;
        if length == 0 {
            return Ok(String::new());
        }

        if length < 0 {
            let count = length.unsigned_abs() as usize;
            self.ensure(count * 2)?;
            let mut units = Vec::with_capacity(count);
            for _ in 0..count {
                units.push(self.read_u16()?);
            }
            if units.pop() != Some(0) {
                return Err(TextureError::invalid_string(start, "missing null terminator"));
            }
            String::from_utf16(&units)
                .map_err(|e| TextureError::invalid_string(start, e.to_string()))
        } else {
            let mut bytes = self.read_bytes(length as usize)?;
            if bytes.pop() != Some(0) {
                return Err(TextureError::invalid_string(start, "missing null terminator"));
            }
            String::from_utf8(bytes).map_err(|e| TextureError::invalid_string(start, e.to_string()))
        }
    }
}
