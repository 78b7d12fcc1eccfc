//! Header anchor search
//!
//! The tagged properties serialized before the cooked platform data are not
//! parsed. Instead the codec searches for the strip flags of `UTexture` and
//! `UTexture2D` followed by the cooked flag, which is where the recognized
//! fields begin.

use crate::error::{Result, TextureError};
use ue_texture_core::EngineVersion;

/// `01 00` (UTexture strip flags), `01 00` (UTexture2D strip flags), `01 00 00 00` (bCooked)
pub const ANCHOR: [u8; 8] = [0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00];

/// Maximum distance searched from the object start
pub const SCAN_LIMIT: usize = 1000;

/// Find the anchor at or after `start` and return the position just past it
///
/// Candidates are checked at every `0x01` byte, so overlapping matches are
/// found. The search gives up once the cursor reaches
/// `min(len - 7, start + SCAN_LIMIT)`.
pub fn find_anchor(data: &[u8], start: usize, version: EngineVersion) -> Result<usize> {
    let limit = data.len().saturating_sub(7).min(start + SCAN_LIMIT);

    let mut cursor = start;
    while cursor < limit {
        if data[cursor] == ANCHOR[0] && data[cursor + 1..cursor + ANCHOR.len()] == ANCHOR[1..] {
            return Ok(cursor + ANCHOR.len());
        }
        cursor += 1;
    }

    Err(TextureError::StructuralScanFailure {
        offset: cursor as u64,
        version,
    })
}
