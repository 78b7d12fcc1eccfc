//! Cooked texture platform data
//!
//! `PlatformData` is the part of a cooked `UTexture2D`/`UTextureCube` export
//! that holds the pixel format and the mip chain. Everything before the header
//! anchor is kept as an opaque blob and replayed on save, so only the fields
//! this crate understands are ever rewritten.

use super::anchor::find_anchor;
use super::formats::PixelFormat;
use super::layout::{Field, GateContext, PLATFORM_DATA_LAYOUT};
use super::mipmap::{BulkStorage, MipHeader, MipPlacement, MipRecord};
use super::options::{LoadOptions, SaveOptions};
use super::packed::PackedData;
use crate::asset::AssetContainer;
use crate::error::{Result, TextureError};
use crate::reader::BinaryReader;
use crate::writer::BinaryWriter;
use serde::{Deserialize, Serialize};
use std::io::{Seek, Write};
use tracing::{debug, info, instrument, warn};
use ue_texture_core::{EngineVersion, NameTable};

/// Pixel format, size and mip chain of a cooked texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformData {
    version: EngineVersion,
    is_light_map: bool,
    /// Tagged properties and strip flags up to the end of the anchor
    prefix: Vec<u8>,
    pixel_format_name_id: u64,
    placeholder: [u8; 16],
    pub original_width: u32,
    pub original_height: u32,
    packed: PackedData,
    pixel_format: String,
    format: Option<PixelFormat>,
    pub first_mip_to_serialize: u32,
    mipmaps: Vec<MipRecord>,
    none_name_id: u64,
    light_map_flags: u32,
    skip_offset: u32,
    skip_offset_location: u64,
}

/// Mip headers read from the primary stream, waiting for their payloads
#[derive(Debug, Default)]
struct PendingMips {
    mip_count: u32,
    headers: Vec<MipHeader>,
    combined: Option<Vec<u8>>,
}

/// Serializable overview of a texture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSummary {
    pub width: u32,
    pub height: u32,
    pub pixel_format: String,
    pub dxgi_format: Option<String>,
    pub mip_count: usize,
    pub primary_mips: usize,
    pub secondary_mips: usize,
    pub is_cube: bool,
    pub num_slices: u32,
}

impl PlatformData {
    fn empty(options: &LoadOptions) -> Self {
        Self {
            version: options.version,
            is_light_map: options.is_light_map,
            prefix: Vec::new(),
            pixel_format_name_id: 0,
            placeholder: [0; 16],
            original_width: 0,
            original_height: 0,
            packed: PackedData::default(),
            pixel_format: String::new(),
            format: None,
            first_mip_to_serialize: 0,
            mipmaps: Vec::new(),
            none_name_id: 0,
            light_map_flags: 0,
            skip_offset: 0,
            skip_offset_location: 0,
        }
    }

    /// Read platform data starting at the primary stream's cursor
    ///
    /// On success the primary cursor is left at the end of the object and the
    /// secondary cursor past the last payload read from it.
    #[instrument(skip(asset), fields(version = %options.version))]
    pub fn load(asset: &mut AssetContainer, options: &LoadOptions) -> Result<Self> {
        let mut data = Self::empty(options);
        let start = asset.primary.position() as usize;

        let (pending, end) = {
            let buffer = asset.primary.get_ref().as_slice();
            let body = find_anchor(buffer, start, options.version)?;
            data.prefix = buffer[start..body].to_vec();
            debug!(prefix_len = data.prefix.len(), "Found texture header");

            let mut reader = BinaryReader::at(buffer, body as u64);
            let mut pending = PendingMips::default();
            for (gate, field) in PLATFORM_DATA_LAYOUT {
                if gate.is_open(&data.gate_context()) {
                    data.read_field(*field, &mut reader, &asset.names, &mut pending)?;
                }
            }
            (pending, reader.position())
        };
        asset.primary.set_position(end);

        data.attach_payloads(asset, pending)?;

        if data
            .mipmaps
            .windows(2)
            .any(|pair| pair[1].pixel_count() > pair[0].pixel_count())
        {
            warn!("Mipmaps are not ordered from largest to smallest");
        }

        let (primary, secondary) = data.mip_counts();
        debug!(
            pixel_format = %data.pixel_format,
            primary,
            secondary,
            size = ?data.max_size(),
            "Loaded texture platform data"
        );
        Ok(data)
    }

    fn read_field(
        &mut self,
        field: Field,
        reader: &mut BinaryReader<'_>,
        names: &impl NameTable,
        pending: &mut PendingMips,
    ) -> Result<()> {
        match field {
            Field::PixelFormatName => {
                let offset = reader.position();
                let id = reader.read_u64()?;
                if names.lookup(id).is_none() {
                    return Err(TextureError::NameTableLookupFailure {
                        id,
                        offset,
                        version: self.version,
                    });
                }
                self.pixel_format_name_id = id;
            }
            Field::SkipOffset => {
                self.skip_offset_location = reader.position();
                self.skip_offset = reader.read_u32()?;
            }
            Field::ReservedZero => self.expect_u32(reader, 0, None)?,
            Field::Placeholder => self.placeholder = reader.read_array::<16>()?,
            Field::OriginalSize => {
                self.original_width = reader.read_u32()?;
                self.original_height = reader.read_u32()?;
            }
            Field::PackedData => self.packed = PackedData::decode(reader.read_u32()?),
            Field::PixelFormatString => {
                let name = reader.read_fstring()?;
                self.set_pixel_format(name);
            }
            Field::MipTail => {
                self.expect_u32(reader, 0, None)?;
                self.expect_u32(reader, 0, None)?;
                let _mips_in_tail = reader.read_u32()?;
            }
            Field::MipCounts => {
                self.first_mip_to_serialize = reader.read_u32()?;
                pending.mip_count = reader.read_u32()?;
            }
            Field::CombinedMip => {
                let combined = MipRecord::read(reader, self.version)?;
                pending.combined = Some(combined.record.data);
                self.expect_u32(reader, self.packed.num_slices, Some("slice count"))?;
                let _primary_mips = reader.read_u32()?;
            }
            Field::Mips => {
                for _ in 0..pending.mip_count {
                    pending.headers.push(MipRecord::read(reader, self.version)?);
                }
            }
            Field::VirtualTextureFlag => {
                self.expect_u32(reader, 0, Some("Virtual texture is unsupported"))?
            }
            Field::Sentinel => self.none_name_id = reader.read_u64()?,
            Field::LightMapFlags => self.light_map_flags = reader.read_u32()?,
        }
        Ok(())
    }

    fn expect_u32(
        &self,
        reader: &mut BinaryReader<'_>,
        expected: u32,
        message: Option<&str>,
    ) -> Result<()> {
        let offset = reader.position();
        let actual = reader.read_u32()?;
        if actual != expected {
            return Err(TextureError::UnexpectedReservedValue {
                offset,
                expected: expected as u64,
                actual: actual as u64,
                message: message.map(str::to_string),
                version: self.version,
            });
        }
        Ok(())
    }

    /// Fill in payloads stored outside the mip records
    fn attach_payloads(&mut self, asset: &mut AssetContainer, pending: PendingMips) -> Result<()> {
        let PendingMips {
            headers, combined, ..
        } = pending;

        let mut mipmaps = Vec::with_capacity(headers.len());
        let end = {
            let buffer = asset.secondary.get_ref().as_slice();
            let mut reader = BinaryReader::at(buffer, asset.secondary.position());
            for header in headers {
                let mut record = header.record;
                if header.storage == BulkStorage::Separate {
                    record.data = reader.read_bytes(header.data_size)?;
                }
                mipmaps.push(record);
            }
            reader.position()
        };
        asset.secondary.set_position(end);

        if let Some(blob) = combined {
            self.split_combined(&mut mipmaps, blob)?;
        }
        self.mipmaps = mipmaps;
        Ok(())
    }

    /// Distribute the fork's combined payload over the primary mips
    fn split_combined(&self, mipmaps: &mut [MipRecord], blob: Vec<u8>) -> Result<()> {
        let Some(format) = self.format else {
            warn!(
                pixel_format = %self.pixel_format,
                "Combined mip data left unsplit for unsupported pixel format"
            );
            if let Some(first) = mipmaps.iter_mut().find(|mip| mip.placement.is_primary()) {
                first.data = blob;
            }
            return Ok(());
        };

        let slices = self.packed.num_slices as u64;
        let mut consumed = 0usize;
        for mip in mipmaps.iter_mut().filter(|mip| mip.placement.is_primary()) {
            let size = format.bytes_for_pixels(mip.pixel_count(), slices) as usize;
            let end = consumed + size;
            if end > blob.len() {
                return Err(TextureError::MipSplitMismatch {
                    consumed: end,
                    available: blob.len(),
                    version: self.version,
                });
            }
            mip.data = blob[consumed..end].to_vec();
            consumed = end;
        }

        if consumed != blob.len() {
            return Err(TextureError::MipSplitMismatch {
                consumed,
                available: blob.len(),
                version: self.version,
            });
        }
        Ok(())
    }

    /// Write platform data at the primary stream's cursor
    ///
    /// Secondary payloads are appended at the secondary stream's cursor, and
    /// secondary mip offsets are assigned sequentially from there.
    #[instrument(skip(self, asset), fields(version = %self.version))]
    pub fn save(&mut self, asset: &mut AssetContainer, options: &SaveOptions) -> Result<()> {
        if !options.preserve_declared_size {
            (self.original_width, self.original_height) = self.max_size();
        }

        let mut offset = asset.secondary.position() as i64;
        for mip in self.mipmaps.iter_mut() {
            if let MipPlacement::Secondary { offset: slot } = &mut mip.placement {
                *slot = offset;
                offset += mip.data.len() as i64;
            }
        }

        let header_size = asset.header_size;
        let mut writer = BinaryWriter::new(&mut asset.primary);
        writer.write_bytes(&self.prefix)?;
        for (gate, field) in PLATFORM_DATA_LAYOUT {
            if gate.is_open(&self.gate_context()) {
                self.write_field(*field, &mut writer, header_size)?;
            }
        }

        let mut bulk = BinaryWriter::new(&mut asset.secondary);
        for mip in self.mipmaps.iter().filter(|mip| !mip.placement.is_primary()) {
            bulk.write_bytes(&mip.data)?;
        }

        debug!(
            skip_offset = self.skip_offset,
            mips = self.mipmaps.len(),
            "Saved texture platform data"
        );
        Ok(())
    }

    fn write_field<W: Write + Seek>(
        &mut self,
        field: Field,
        writer: &mut BinaryWriter<W>,
        header_size: u64,
    ) -> Result<()> {
        let version = self.version;
        match field {
            Field::PixelFormatName => writer.write_u64(self.pixel_format_name_id)?,
            Field::SkipOffset => {
                self.skip_offset_location = writer.position()?;
                writer.write_u32(0)?;
            }
            Field::ReservedZero | Field::VirtualTextureFlag => writer.write_u32(0)?,
            Field::Placeholder => writer.write_bytes(&self.placeholder)?,
            Field::OriginalSize => {
                writer.write_u32(self.original_width)?;
                writer.write_u32(self.original_height)?;
            }
            Field::PackedData => writer.write_u32(self.packed.encode())?,
            Field::PixelFormatString => writer.write_fstring(&self.pixel_format)?,
            Field::MipTail => {
                let (_, secondary) = self.mip_counts();
                writer.write_u32(0)?;
                writer.write_u32(0)?;
                writer.write_u32(secondary as u32 + self.first_mip_to_serialize)?;
            }
            Field::MipCounts => {
                writer.write_u32(self.first_mip_to_serialize)?;
                writer.write_u32(self.mipmaps.len() as u32)?;
            }
            Field::CombinedMip => {
                let blob: Vec<u8> = self
                    .mipmaps
                    .iter()
                    .filter(|mip| mip.placement.is_primary())
                    .flat_map(|mip| mip.data.iter().copied())
                    .collect();
                let (width, height) = self.max_primary_size();
                let mut combined = MipRecord::new(blob, width, height, MipPlacement::Primary);
                combined.write(writer, version, BulkStorage::Inline, header_size)?;

                let (primary, _) = self.mip_counts();
                writer.write_u32(self.packed.num_slices)?;
                writer.write_u32(primary as u32)?;
            }
            Field::Mips => {
                for mip in self.mipmaps.iter_mut() {
                    let storage = match mip.placement {
                        MipPlacement::Secondary { .. } => BulkStorage::Separate,
                        MipPlacement::Primary if version.is_fork() => BulkStorage::Combined,
                        MipPlacement::Primary => BulkStorage::Inline,
                    };
                    mip.write(writer, version, storage, header_size)?;
                }
            }
            Field::Sentinel => {
                let end = writer.position()?;
                self.skip_offset = if version.at_least(5, 0) {
                    (end - self.skip_offset_location) as u32
                } else {
                    (end + header_size) as u32
                };
                writer.patch_u32(self.skip_offset_location, self.skip_offset)?;
                writer.write_u64(self.none_name_id)?;
            }
            Field::LightMapFlags => writer.write_u32(self.light_map_flags)?,
        }
        Ok(())
    }

    /// Patch legacy secondary mip offsets once the primary stream is complete
    ///
    /// Versions after 4.15 and before 4.26 store secondary offsets relative to
    /// the end of the split package. This must run after everything following
    /// the texture has been written to the primary stream.
    pub fn rewrite_offset_data(&self, asset: &mut AssetContainer) -> Result<()> {
        if !self.needs_offset_fix_up() {
            return Ok(());
        }

        let header_size = asset.header_size;
        let primary_size = asset.primary_size();
        let mut writer = BinaryWriter::new(&mut asset.primary);
        for mip in &self.mipmaps {
            mip.rewrite_offset(&mut writer, header_size, primary_size)?;
        }
        debug!(header_size, primary_size, "Rewrote secondary mip offsets");
        Ok(())
    }

    /// Check if secondary offsets use the legacy end-relative convention
    pub fn needs_offset_fix_up(&self) -> bool {
        self.version.at_least(4, 16) && self.version.older_than(4, 26) && !self.version.is_fork()
    }

    fn gate_context(&self) -> GateContext {
        GateContext {
            version: self.version,
            is_light_map: self.is_light_map,
            has_opt_data: self.packed.has_opt_data,
        }
    }

    fn set_pixel_format(&mut self, name: String) {
        self.format = PixelFormat::from_name(&name);
        if self.format.is_none() {
            warn!(pixel_format = %name, "Unsupported pixel format");
        }
        self.pixel_format = name;
    }

    /// Change the pixel format and intern its name
    ///
    /// Mip payloads are left untouched; callers are expected to import data in
    /// the new format afterwards.
    pub fn change_pixel_format(&mut self, names: &mut impl NameTable, name: &str) {
        if self.pixel_format != name {
            info!(from = %self.pixel_format, to = name, "Changed pixel format");
        }
        self.set_pixel_format(name.to_string());
        self.pixel_format_name_id = names.intern(name);
    }

    /// Switch a block-compressed format to its uncompressed counterpart
    ///
    /// Returns the new format, or `None` when the format was left as is.
    pub fn to_uncompressed(&mut self, names: &mut impl NameTable) -> Option<PixelFormat> {
        let target = PixelFormat::uncompressed_for_name(&self.pixel_format)?;
        self.change_pixel_format(names, target.name());
        Some(target)
    }

    /// Drop every mip but the largest and move it to the primary stream
    pub fn strip_to_single_mip(&mut self) {
        let old_count = self.mipmaps.len();
        if old_count <= 1 {
            return;
        }

        self.mipmaps.truncate(1);
        self.mipmaps[0].placement = MipPlacement::Primary;
        info!(from = old_count, to = 1, "Mipmaps have been removed");
    }

    pub fn version(&self) -> EngineVersion {
        self.version
    }

    pub fn is_light_map(&self) -> bool {
        self.is_light_map
    }

    /// Bytes preceding the recognized fields
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub fn pixel_format_name_id(&self) -> u64 {
        self.pixel_format_name_id
    }

    /// Pixel format name as serialized, e.g. `PF_DXT5`
    pub fn pixel_format(&self) -> &str {
        &self.pixel_format
    }

    /// Resolved pixel format, if supported
    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    pub fn packed(&self) -> PackedData {
        self.packed
    }

    pub fn is_cube(&self) -> bool {
        self.packed.is_cube
    }

    pub fn mipmaps(&self) -> &[MipRecord] {
        &self.mipmaps
    }

    /// Skip offset as last read or written
    pub fn skip_offset(&self) -> u32 {
        self.skip_offset
    }

    /// Position of the skip offset field in the primary stream
    pub fn skip_offset_location(&self) -> u64 {
        self.skip_offset_location
    }

    /// Check if any mip payload lives in the secondary stream
    pub fn has_secondary(&self) -> bool {
        self.mipmaps.iter().any(|mip| !mip.placement.is_primary())
    }

    pub fn has_supported_format(&self) -> bool {
        self.format.is_some()
    }

    /// Resolved format, or an error naming the serialized one
    pub(crate) fn require_format(&self) -> Result<PixelFormat> {
        self.format
            .ok_or_else(|| TextureError::unsupported_format(self.pixel_format.as_str()))
    }

    /// Size of the largest mip
    pub fn max_size(&self) -> (u32, u32) {
        self.mipmaps.first().map(MipRecord::size).unwrap_or_default()
    }

    /// Size of the largest primary mip, or of the last mip if none is primary
    pub fn max_primary_size(&self) -> (u32, u32) {
        self.mipmaps
            .iter()
            .find(|mip| mip.placement.is_primary())
            .or(self.mipmaps.last())
            .map(MipRecord::size)
            .unwrap_or_default()
    }

    /// Number of primary and secondary mips
    pub fn mip_counts(&self) -> (usize, usize) {
        let primary = self
            .mipmaps
            .iter()
            .filter(|mip| mip.placement.is_primary())
            .count();
        (primary, self.mipmaps.len() - primary)
    }

    /// `"Cube"` for cubemaps, `"2D"` otherwise
    pub fn texture_type(&self) -> &'static str {
        if self.packed.is_cube { "Cube" } else { "2D" }
    }

    pub fn summary(&self) -> TextureSummary {
        let (width, height) = self.max_size();
        let (primary_mips, secondary_mips) = self.mip_counts();
        TextureSummary {
            width,
            height,
            pixel_format: self.pixel_format.clone(),
            dxgi_format: self
                .format
                .map(|format| format!("{:?}", format.dxgi_format())),
            mip_count: self.mipmaps.len(),
            primary_mips,
            secondary_mips,
            is_cube: self.packed.is_cube,
            num_slices: self.packed.num_slices,
        }
    }

    pub(crate) fn replace_mipmaps(&mut self, mipmaps: Vec<MipRecord>) {
        self.first_mip_to_serialize = 0;
        self.mipmaps = mipmaps;
    }

    pub(crate) fn set_has_opt_data(&mut self, has_opt_data: bool) {
        self.packed.has_opt_data = has_opt_data;
    }
}
