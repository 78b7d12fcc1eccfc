//! Version-gated field layout of cooked platform data
//!
//! The fields following the header anchor appear in a fixed order, but
//! several only exist in some engine versions. Reading and writing both walk
//! [`PLATFORM_DATA_LAYOUT`] and skip fields whose gate is closed.

use ue_texture_core::EngineVersion;

/// Condition for a field to be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    /// Present from the given upstream release on
    Since(u16, u16),
    /// Present in the `ff7r` fork only
    Fork,
    /// Present in the fork when the optional data bit is set
    ForkWithOptData,
    /// Present in light map textures only
    LightMap,
}

/// State the gates are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateContext {
    pub version: EngineVersion,
    pub is_light_map: bool,
    pub has_opt_data: bool,
}

impl Gate {
    /// Check if a field behind this gate is serialized
    pub fn is_open(&self, context: &GateContext) -> bool {
        match *self {
            Gate::Always => true,
            Gate::Since(major, minor) => context.version.at_least(major, minor),
            Gate::Fork => context.version.is_fork(),
            Gate::ForkWithOptData => context.version.is_fork() && context.has_opt_data,
            Gate::LightMap => context.is_light_map,
        }
    }
}

/// Serialized field groups, in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `FName` of the pixel format (u64)
    PixelFormatName,
    /// Offset of the end of the platform data (u32)
    SkipOffset,
    /// Reserved u32, always zero
    ReservedZero,
    /// 16 opaque bytes
    Placeholder,
    /// Declared width and height (u32 each)
    OriginalSize,
    /// Packed cubemap/optional-data/slice word (u32)
    PackedData,
    /// Pixel format name (FString)
    PixelFormatString,
    /// Two reserved zeros and the mip tail count (u32 each)
    MipTail,
    /// First mip to serialize and mip count (u32 each)
    MipCounts,
    /// Combined mip record, slice count and primary mip count
    CombinedMip,
    /// The mip records
    Mips,
    /// Virtual texture flag (u32), must be zero
    VirtualTextureFlag,
    /// Terminating `None` name (u64)
    Sentinel,
    /// Light map flags (u32)
    LightMapFlags,
}

/// Field order of `FTexturePlatformData` after the anchor
pub const PLATFORM_DATA_LAYOUT: &[(Gate, Field)] = &[
    (Gate::Always, Field::PixelFormatName),
    (Gate::Always, Field::SkipOffset),
    (Gate::Since(4, 20), Field::ReservedZero),
    (Gate::Since(5, 0), Field::Placeholder),
    (Gate::Always, Field::OriginalSize),
    (Gate::Always, Field::PackedData),
    (Gate::Always, Field::PixelFormatString),
    (Gate::ForkWithOptData, Field::MipTail),
    (Gate::Always, Field::MipCounts),
    (Gate::Fork, Field::CombinedMip),
    (Gate::Always, Field::Mips),
    (Gate::Since(4, 23), Field::VirtualTextureFlag),
    (Gate::Always, Field::Sentinel),
    (Gate::LightMap, Field::LightMapFlags),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn open_fields(context: GateContext) -> Vec<Field> {
        PLATFORM_DATA_LAYOUT
            .iter()
            .filter(|(gate, _)| gate.is_open(&context))
            .map(|(_, field)| *field)
            .collect()
    }

    fn context(version: EngineVersion) -> GateContext {
        GateContext {
            version,
            is_light_map: false,
            has_opt_data: false,
        }
    }

    #[test]
    fn test_legacy_layout() {
        let fields = open_fields(context(EngineVersion::new(4, 19)));
        assert_eq!(
            fields,
            vec![
                Field::PixelFormatName,
                Field::SkipOffset,
                Field::OriginalSize,
                Field::PackedData,
                Field::PixelFormatString,
                Field::MipCounts,
                Field::Mips,
                Field::Sentinel,
            ]
        );
    }

    #[test]
    fn test_ue5_layout() {
        let fields = open_fields(context(EngineVersion::new(5, 1)));
        assert!(fields.contains(&Field::ReservedZero));
        assert!(fields.contains(&Field::Placeholder));
        assert!(fields.contains(&Field::VirtualTextureFlag));
        assert!(!fields.contains(&Field::CombinedMip));
    }

    #[test]
    fn test_version_boundaries() {
        let v422 = open_fields(context(EngineVersion::new(4, 22)));
        assert!(v422.contains(&Field::ReservedZero));
        assert!(!v422.contains(&Field::VirtualTextureFlag));
        assert!(!v422.contains(&Field::Placeholder));

        let v423 = open_fields(context(EngineVersion::new(4, 23)));
        assert!(v423.contains(&Field::VirtualTextureFlag));
    }

    #[test]
    fn test_fork_layout() {
        let mut ctx = context(EngineVersion::FF7R);
        let fields = open_fields(ctx);
        assert!(fields.contains(&Field::CombinedMip));
        assert!(!fields.contains(&Field::MipTail));
        assert!(!fields.contains(&Field::ReservedZero));

        ctx.has_opt_data = true;
        let fields = open_fields(ctx);
        let tail = fields.iter().position(|f| *f == Field::MipTail).unwrap();
        let counts = fields.iter().position(|f| *f == Field::MipCounts).unwrap();
        assert!(tail < counts);
    }

    #[test]
    fn test_light_map_flags_last() {
        let mut ctx = context(EngineVersion::new(4, 27));
        ctx.is_light_map = true;
        assert_eq!(open_fields(ctx).last(), Some(&Field::LightMapFlags));
    }
}
