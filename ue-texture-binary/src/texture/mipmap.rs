//! Mipmap records
//!
//! Each mip is serialized as `FTexture2DMipMap`: a cooked flag, a bulk data
//! header describing where the payload lives, the inline payload (if any) and
//! the mip dimensions.

use crate::error::Result;
use crate::reader::BinaryReader;
use crate::writer::BinaryWriter;
use std::io::{Seek, Write};
use ue_texture_core::EngineVersion;

const BULKDATA_PAYLOAD_AT_END_OF_FILE: u32 = 0x1;
const BULKDATA_SINGLE_USE: u32 = 0x8;
const BULKDATA_UNUSED: u32 = 0x20;
const BULKDATA_FORCE_INLINE_PAYLOAD: u32 = 0x40;
const BULKDATA_PAYLOAD_IN_SEPARATE_FILE: u32 = 0x100;
const BULKDATA_FORCE_NOT_INLINE_PAYLOAD: u32 = 0x400;
const BULKDATA_NO_OFFSET_FIX_UP: u32 = 0x10000;

/// Stream a mip payload is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipPlacement {
    /// Stored in the export data stream (`.uexp`)
    Primary,
    /// Stored in the bulk data stream (`.ubulk`) at `offset`
    Secondary { offset: i64 },
}

impl MipPlacement {
    /// Check if the payload lives in the primary stream
    pub fn is_primary(&self) -> bool {
        matches!(self, MipPlacement::Primary)
    }
}

/// How a record's bulk data is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkStorage {
    /// Payload follows the bulk data header
    Inline,
    /// Payload is in the secondary stream
    Separate,
    /// Payload is part of the fork's combined mip; header only
    Combined,
}

impl BulkStorage {
    /// Classify serialized bulk data flags
    pub fn from_flags(flags: u32) -> Self {
        if flags & BULKDATA_PAYLOAD_IN_SEPARATE_FILE != 0 {
            BulkStorage::Separate
        } else if flags & BULKDATA_UNUSED != 0 {
            BulkStorage::Combined
        } else {
            BulkStorage::Inline
        }
    }

    /// Bulk data flags written for this storage
    pub fn flags(&self, version: EngineVersion) -> u32 {
        match self {
            BulkStorage::Inline => BULKDATA_FORCE_INLINE_PAYLOAD | BULKDATA_SINGLE_USE,
            BulkStorage::Separate => {
                let flags = BULKDATA_PAYLOAD_AT_END_OF_FILE
                    | BULKDATA_PAYLOAD_IN_SEPARATE_FILE
                    | BULKDATA_FORCE_NOT_INLINE_PAYLOAD;
                if version.at_least(4, 26) && !version.is_fork() {
                    flags | BULKDATA_NO_OFFSET_FIX_UP
                } else {
                    flags
                }
            }
            BulkStorage::Combined => BULKDATA_UNUSED,
        }
    }
}

/// A single mipmap level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipRecord {
    pub width: u32,
    pub height: u32,
    /// Serialized from 4.20 on
    pub depth: u32,
    /// Payload bytes; never interpreted
    pub data: Vec<u8>,
    pub placement: MipPlacement,
    offset_location: Option<u64>,
}

/// A record as read, before payloads stored elsewhere are attached
#[derive(Debug)]
pub struct MipHeader {
    pub record: MipRecord,
    pub storage: BulkStorage,
    /// Declared payload length
    pub data_size: usize,
}

impl MipRecord {
    /// Create a mip holding `data`
    pub fn new(data: Vec<u8>, width: u32, height: u32, placement: MipPlacement) -> Self {
        Self {
            width,
            height,
            depth: 1,
            data,
            placement,
            offset_location: None,
        }
    }

    /// Number of pixels in one slice
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Dimensions as a tuple
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Position of the serialized offset field, once written
    pub fn offset_location(&self) -> Option<u64> {
        self.offset_location
    }

    /// Read one record from the primary stream
    ///
    /// Inline payloads are read immediately; the caller attaches secondary
    /// and combined payloads afterwards.
    pub fn read(reader: &mut BinaryReader<'_>, version: EngineVersion) -> Result<MipHeader> {
        let _cooked = reader.read_u32()?;
        let flags = reader.read_u32()?;
        let storage = BulkStorage::from_flags(flags);
        let _element_count = reader.read_u32()?;
        let data_size = reader.read_u32()? as usize;
        let offset = reader.read_i64()?;

        let data = match storage {
            BulkStorage::Inline => reader.read_bytes(data_size)?,
            BulkStorage::Separate | BulkStorage::Combined => Vec::new(),
        };

        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let depth = if version.at_least(4, 20) {
            reader.read_u32()?
        } else {
            1
        };

        let placement = match storage {
            BulkStorage::Separate => MipPlacement::Secondary { offset },
            BulkStorage::Inline | BulkStorage::Combined => MipPlacement::Primary,
        };

        Ok(MipHeader {
            record: MipRecord {
                width,
                height,
                depth,
                data,
                placement,
                offset_location: None,
            },
            storage,
            data_size,
        })
    }

    /// Write this record to the primary stream
    ///
    /// Inline payload offsets are absolute offsets in the split package, so
    /// they include the size of the package header.
    pub fn write<W: Write + Seek>(
        &mut self,
        writer: &mut BinaryWriter<W>,
        version: EngineVersion,
        storage: BulkStorage,
        header_size: u64,
    ) -> Result<()> {
        let size = match storage {
            BulkStorage::Combined => 0,
            BulkStorage::Inline | BulkStorage::Separate => self.data.len() as u32,
        };

        writer.write_u32(1)?;
        writer.write_u32(storage.flags(version))?;
        writer.write_u32(size)?;
        writer.write_u32(size)?;

        let location = writer.position()?;
        let offset = match (storage, self.placement) {
            (BulkStorage::Separate, MipPlacement::Secondary { offset }) => offset,
            _ => (header_size + location + 8) as i64,
        };
        writer.write_i64(offset)?;
        self.offset_location = Some(location);

        if storage == BulkStorage::Inline {
            writer.write_bytes(&self.data)?;
        }

        writer.write_u32(self.width)?;
        writer.write_u32(self.height)?;
        if version.at_least(4, 20) {
            writer.write_u32(self.depth)?;
        }
        Ok(())
    }

    /// Offset a legacy secondary mip must carry once the primary stream is final
    pub fn fixed_up_offset(stored_offset: i64, header_size: u64, primary_size: u64) -> i64 {
        -((header_size + primary_size) as i64) + stored_offset
    }

    /// Patch the serialized offset of a secondary mip in place
    pub fn rewrite_offset<W: Write + Seek>(
        &self,
        writer: &mut BinaryWriter<W>,
        header_size: u64,
        primary_size: u64,
    ) -> Result<()> {
        if let (MipPlacement::Secondary { offset }, Some(location)) =
            (self.placement, self.offset_location)
        {
            let fixed = Self::fixed_up_offset(offset, header_size, primary_size);
            writer.patch_i64(location, fixed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_record(
        mip: &mut MipRecord,
        version: EngineVersion,
        storage: BulkStorage,
        header_size: u64,
    ) -> Vec<u8> {
        let mut writer = BinaryWriter::new(Cursor::new(Vec::new()));
        mip.write(&mut writer, version, storage, header_size).unwrap();
        writer.into_inner().into_inner()
    }

    #[test]
    fn test_storage_flags() {
        let v425 = EngineVersion::new(4, 25);
        let v426 = EngineVersion::new(4, 26);
        assert_eq!(BulkStorage::Inline.flags(v425), 0x48);
        assert_eq!(BulkStorage::Separate.flags(v425), 0x501);
        assert_eq!(BulkStorage::Separate.flags(v426), 0x10501);
        assert_eq!(BulkStorage::Separate.flags(EngineVersion::FF7R), 0x501);
        assert_eq!(BulkStorage::Combined.flags(v426), 0x20);

        assert_eq!(BulkStorage::from_flags(0x48), BulkStorage::Inline);
        assert_eq!(BulkStorage::from_flags(0x10501), BulkStorage::Separate);
        assert_eq!(BulkStorage::from_flags(0x20), BulkStorage::Combined);
    }

    #[test]
    fn test_inline_layout() {
        let version = EngineVersion::new(4, 20);
        let mut mip = MipRecord::new(vec![0xaa; 4], 1, 1, MipPlacement::Primary);
        let data = write_record(&mut mip, version, BulkStorage::Inline, 100);

        // cooked, flags, count, size, offset, payload, width, height, depth
        assert_eq!(data.len(), 4 * 4 + 8 + 4 + 4 * 3);
        assert_eq!(mip.offset_location(), Some(16));

        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_u32().unwrap(), 1);
        assert_eq!(reader.read_u32().unwrap(), 0x48);
        assert_eq!(reader.read_u32().unwrap(), 4);
        assert_eq!(reader.read_u32().unwrap(), 4);
        assert_eq!(reader.read_i64().unwrap(), 100 + 24);

        let header = MipRecord::read(&mut BinaryReader::new(&data), version).unwrap();
        assert_eq!(header.storage, BulkStorage::Inline);
        assert_eq!(header.record.data, vec![0xaa; 4]);
        assert_eq!(header.record.size(), (1, 1));
        assert_eq!(header.record.depth, 1);
    }

    #[test]
    fn test_secondary_record_has_no_payload() {
        let version = EngineVersion::new(4, 27);
        let mut mip = MipRecord::new(
            vec![0x11; 64],
            4,
            4,
            MipPlacement::Secondary { offset: 32 },
        );
        let data = write_record(&mut mip, version, BulkStorage::Separate, 100);
        assert_eq!(data.len(), 4 * 4 + 8 + 4 * 3);

        let header = MipRecord::read(&mut BinaryReader::new(&data), version).unwrap();
        assert_eq!(header.storage, BulkStorage::Separate);
        assert_eq!(header.data_size, 64);
        assert!(header.record.data.is_empty());
        assert_eq!(
            header.record.placement,
            MipPlacement::Secondary { offset: 32 }
        );
    }

    #[test]
    fn test_depth_absent_before_4_20() {
        let version = EngineVersion::new(4, 19);
        let mut mip = MipRecord::new(vec![1, 2], 2, 1, MipPlacement::Primary);
        let data = write_record(&mut mip, version, BulkStorage::Inline, 0);
        assert_eq!(data.len(), 4 * 4 + 8 + 2 + 4 * 2);
    }

    #[test]
    fn test_offset_fix_up_formula() {
        assert_eq!(MipRecord::fixed_up_offset(0, 500, 1200), -1700);
        assert_eq!(MipRecord::fixed_up_offset(4096, 500, 1200), 2396);
    }

    #[test]
    fn test_rewrite_offset_patches_field() {
        let version = EngineVersion::new(4, 22);
        let mut mip = MipRecord::new(
            vec![0; 16],
            2,
            2,
            MipPlacement::Secondary { offset: 64 },
        );
        let mut writer = BinaryWriter::new(Cursor::new(Vec::new()));
        mip.write(&mut writer, version, BulkStorage::Separate, 10).unwrap();
        mip.rewrite_offset(&mut writer, 10, 200).unwrap();

        let data = writer.into_inner().into_inner();
        let mut reader = BinaryReader::at(&data, 16);
        assert_eq!(reader.read_i64().unwrap(), -(10 + 200) + 64);
    }
}
