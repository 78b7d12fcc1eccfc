//! Binary data writer for cooked package streams

use crate::error::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Seek, SeekFrom, Write};

/// Little-endian writer over a seekable stream
///
/// Fields whose value is only known later (skip offsets, bulk data offsets)
/// are written as placeholders and patched in place.
pub struct BinaryWriter<W: Write + Seek> {
    inner: W,
}

impl<W: Write + Seek> BinaryWriter<W> {
    /// Wrap a stream; writing starts at its current position
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Get current position in the stream
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write an unsigned 32-bit integer
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    /// Write a signed 32-bit integer
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.inner.write_i32::<LittleEndian>(value)?)
    }

    /// Write an unsigned 64-bit integer
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        Ok(self.inner.write_u64::<LittleEndian>(value)?)
    }

    /// Write a signed 64-bit integer
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        Ok(self.inner.write_i64::<LittleEndian>(value)?)
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.inner.write_all(bytes)?)
    }

    /// Write an engine string (`FString`)
    pub fn write_fstring(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.write_u32(0);
        }

        if value.is_ascii() {
            self.write_i32(value.len() as i32 + 1)?;
            self.write_bytes(value.as_bytes())?;
            self.write_bytes(&[0])
        } else {
            let units: Vec<u16> = value.encode_utf16().collect();
            self.write_i32(-(units.len() as i32 + 1))?;
            for unit in units {
                self.inner.write_u16::<LittleEndian>(unit)?;
            }
            self.write_bytes(&[0, 0])
        }
    }

    /// Overwrite a 32-bit value at `pos`, keeping the current position
    pub fn patch_u32(&mut self, pos: u64, value: u32) -> Result<()> {
        self.patch(pos, |w| w.write_u32(value))
    }

    /// Overwrite a signed 64-bit value at `pos`, keeping the current position
    pub fn patch_i64(&mut self, pos: u64, value: i64) -> Result<()> {
        self.patch(pos, |w| w.write_i64(value))
    }

    fn patch(&mut self, pos: u64, write: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let current = self.position()?;
        self.inner.seek(SeekFrom::Start(pos))?;
        write(self)?;
        self.inner.seek(SeekFrom::Start(current))?;
        Ok(())
    }
}
