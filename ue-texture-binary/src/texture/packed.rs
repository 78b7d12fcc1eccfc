//! Packed platform-data flags
//!
//! `FTexturePlatformData::PackedData` stores the cubemap bit, the optional
//! data bit and the slice count in a single 32-bit word.

use serde::{Deserialize, Serialize};

const CUBEMAP_BIT: u32 = 1 << 31;
const OPT_DATA_BIT: u32 = 1 << 30;
const SLICE_MASK: u32 = OPT_DATA_BIT - 1;

/// Decoded packed-data word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackedData {
    pub is_cube: bool,
    pub has_opt_data: bool,
    /// Slice count; must stay below 2^30
    pub num_slices: u32,
}

impl PackedData {
    /// Decode a packed word
    pub fn decode(word: u32) -> Self {
        Self {
            is_cube: word & CUBEMAP_BIT != 0,
            has_opt_data: word & OPT_DATA_BIT != 0,
            num_slices: word & SLICE_MASK,
        }
    }

    /// Encode into a packed word
    pub fn encode(&self) -> u32 {
        let mut word = self.num_slices;
        if self.is_cube {
            word |= CUBEMAP_BIT;
        }
        if self.has_opt_data {
            word |= OPT_DATA_BIT;
        }
        word
    }
}

impl From<u32> for PackedData {
    fn from(word: u32) -> Self {
        Self::decode(word)
    }
}

impl From<PackedData> for u32 {
    fn from(packed: PackedData) -> Self {
        packed.encode()
    }
}
