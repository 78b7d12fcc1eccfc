//! Hand-assembled cooked texture fixtures
//!
//! Fixtures are written field by field with `BinaryWriter` rather than through
//! `PlatformData::save`, so round-trip tests compare against an independent
//! encoding of the layout.

#![allow(dead_code)]

use std::io::Cursor;
use ue_texture_binary::{AssetContainer, BinaryWriter};
use ue_texture_core::{EngineVersion, NameMap};

pub const ANCHOR: [u8; 8] = [0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00];
pub const HEADER_SIZE: u64 = 0x2c5;
pub const LIGHT_MAP_FLAGS: u32 = 0x1;

/// A mip in a fixture
#[derive(Debug, Clone)]
pub struct FixtureMip {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub secondary: bool,
}

impl FixtureMip {
    /// Square mip with `bytes_per_pixel` bytes per pixel of patterned data
    pub fn new(size: u32, bytes_per_pixel: usize, secondary: bool) -> Self {
        let len = (size * size) as usize * bytes_per_pixel;
        Self {
            width: size,
            height: size,
            data: (0..len).map(|i| (i as u32 * 7 + size) as u8).collect(),
            secondary,
        }
    }
}

/// Description of a cooked texture export
#[derive(Debug, Clone)]
pub struct Fixture {
    pub version: EngineVersion,
    pub pixel_format: String,
    pub mips: Vec<FixtureMip>,
    pub is_cube: bool,
    pub has_opt_data: bool,
    pub num_slices: u32,
    pub first_mip: u32,
    pub is_light_map: bool,
    /// Declared original size; defaults to the largest mip
    pub declared_size: Option<(u32, u32)>,
    /// Tagged properties preceding the anchor
    pub properties: Vec<u8>,
    /// Bytes following the texture in the export data
    pub trailer: Vec<u8>,
    pub virtual_flag: u32,
    /// Extra bytes appended to the fork's combined mip
    pub combined_padding: usize,
    /// Overrides the slice count repeated after the combined mip
    pub combined_slices: Option<u32>,
}

/// Streams produced from a fixture
#[derive(Debug, Clone)]
pub struct Built {
    pub primary: Vec<u8>,
    pub secondary: Vec<u8>,
    pub names: NameMap,
    /// Position of the skip offset field
    pub skip_offset_location: u64,
    /// Position of the terminating `None` name
    pub sentinel_position: u64,
    /// Length of the texture object, excluding the trailer
    pub object_len: usize,
}

impl Built {
    pub fn container(&self) -> AssetContainer {
        AssetContainer::new(
            self.primary.clone(),
            self.secondary.clone(),
            self.names.clone(),
            HEADER_SIZE,
        )
    }
}

impl Fixture {
    pub fn new(version: EngineVersion, pixel_format: &str, mips: Vec<FixtureMip>) -> Self {
        Self {
            version,
            pixel_format: pixel_format.to_string(),
            mips,
            is_cube: false,
            has_opt_data: false,
            num_slices: 1,
            first_mip: 0,
            is_light_map: false,
            declared_size: None,
            properties: hex::decode("0500000000000000ff00000000000000").unwrap(),
            trailer: hex::decode("0000000000000000c1832a9e").unwrap(),
            virtual_flag: 0,
            combined_padding: 0,
            combined_slices: None,
        }
    }

    /// Uncompressed 4-byte texture with secondary mips above `primary_from`
    pub fn bgra(version: EngineVersion, sizes: &[u32], primary_from: u32) -> Self {
        let mips = sizes
            .iter()
            .map(|&size| FixtureMip::new(size, 4, size > primary_from))
            .collect();
        Self::new(version, "PF_B8G8R8A8", mips)
    }

    pub fn names(&self) -> NameMap {
        ["None", self.pixel_format.as_str()].into_iter().collect()
    }

    pub fn build(&self) -> Built {
        let version = self.version;
        let fork = version.is_fork();
        let mut w = BinaryWriter::new(Cursor::new(Vec::new()));
        let mut secondary = Vec::new();
        let mut secondary_offsets = Vec::new();

        w.write_bytes(&self.properties).unwrap();
        w.write_bytes(&ANCHOR).unwrap();

        w.write_u64(1).unwrap();
        let skip_offset_location = w.position().unwrap();
        w.write_u32(0).unwrap();
        if version.at_least(4, 20) {
            w.write_u32(0).unwrap();
        }
        if version.at_least(5, 0) {
            w.write_bytes(&[0xab; 16]).unwrap();
        }

        let (width, height) = self
            .declared_size
            .unwrap_or((self.mips[0].width, self.mips[0].height));
        w.write_u32(width).unwrap();
        w.write_u32(height).unwrap();

        let mut packed = self.num_slices;
        if self.is_cube {
            packed |= 1 << 31;
        }
        if self.has_opt_data {
            packed |= 1 << 30;
        }
        w.write_u32(packed).unwrap();
        w.write_fstring(&self.pixel_format).unwrap();

        let secondary_count = self.mips.iter().filter(|m| m.secondary).count() as u32;
        let primary_count = self.mips.len() as u32 - secondary_count;
        if fork && self.has_opt_data {
            w.write_u32(0).unwrap();
            w.write_u32(0).unwrap();
            w.write_u32(secondary_count + self.first_mip).unwrap();
        }

        w.write_u32(self.first_mip).unwrap();
        w.write_u32(self.mips.len() as u32).unwrap();

        if fork {
            let mut blob: Vec<u8> = self
                .mips
                .iter()
                .filter(|m| !m.secondary)
                .flat_map(|m| m.data.clone())
                .collect();
            blob.extend(std::iter::repeat_n(0xee, self.combined_padding));
            let largest = self
                .mips
                .iter()
                .find(|m| !m.secondary)
                .or(self.mips.last())
                .unwrap();

            w.write_u32(1).unwrap();
            w.write_u32(0x48).unwrap();
            w.write_u32(blob.len() as u32).unwrap();
            w.write_u32(blob.len() as u32).unwrap();
            let location = w.position().unwrap();
            w.write_i64((HEADER_SIZE + location + 8) as i64).unwrap();
            w.write_bytes(&blob).unwrap();
            w.write_u32(largest.width).unwrap();
            w.write_u32(largest.height).unwrap();

            w.write_u32(self.combined_slices.unwrap_or(self.num_slices))
                .unwrap();
            w.write_u32(primary_count).unwrap();
        }

        for mip in &self.mips {
            w.write_u32(1).unwrap();
            if mip.secondary {
                let flags = if version.at_least(4, 26) && !fork {
                    0x10501
                } else {
                    0x501
                };
                w.write_u32(flags).unwrap();
                w.write_u32(mip.data.len() as u32).unwrap();
                w.write_u32(mip.data.len() as u32).unwrap();
                let location = w.position().unwrap();
                secondary_offsets.push((location, secondary.len() as i64));
                w.write_i64(secondary.len() as i64).unwrap();
                secondary.extend_from_slice(&mip.data);
            } else if fork {
                w.write_u32(0x20).unwrap();
                w.write_u32(0).unwrap();
                w.write_u32(0).unwrap();
                let location = w.position().unwrap();
                w.write_i64((HEADER_SIZE + location + 8) as i64).unwrap();
            } else {
                w.write_u32(0x48).unwrap();
                w.write_u32(mip.data.len() as u32).unwrap();
                w.write_u32(mip.data.len() as u32).unwrap();
                let location = w.position().unwrap();
                w.write_i64((HEADER_SIZE + location + 8) as i64).unwrap();
                w.write_bytes(&mip.data).unwrap();
            }
            w.write_u32(mip.width).unwrap();
            w.write_u32(mip.height).unwrap();
            if version.at_least(4, 20) {
                w.write_u32(1).unwrap();
            }
        }

        if version.at_least(4, 23) {
            w.write_u32(self.virtual_flag).unwrap();
        }

        let sentinel_position = w.position().unwrap();
        let skip_offset = if version.at_least(5, 0) {
            sentinel_position - skip_offset_location
        } else {
            sentinel_position + HEADER_SIZE
        };
        w.patch_u32(skip_offset_location, skip_offset as u32).unwrap();
        w.write_u64(0).unwrap();

        if self.is_light_map {
            w.write_u32(LIGHT_MAP_FLAGS).unwrap();
        }
        let object_len = w.position().unwrap() as usize;
        w.write_bytes(&self.trailer).unwrap();

        if version.at_least(4, 16) && version.older_than(4, 26) && !fork {
            let primary_size = w.position().unwrap();
            for (location, offset) in secondary_offsets {
                let fixed = -((HEADER_SIZE + primary_size) as i64) + offset;
                w.patch_i64(location, fixed).unwrap();
            }
        }

        Built {
            primary: w.into_inner().into_inner(),
            secondary,
            names: self.names(),
            skip_offset_location,
            sentinel_position,
            object_len,
        }
    }
}
