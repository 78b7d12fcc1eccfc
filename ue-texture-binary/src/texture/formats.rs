//! Engine pixel format definitions
//!
//! Maps the engine's `EPixelFormat` names (as serialized in cooked texture
//! data) to DXGI formats, following the D3D12 RHI format table.

use ddsfile::DxgiFormat;

/// Engine pixel formats with a DXGI counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Dxt1,
    Dxt3,
    Dxt5,
    Bc4,
    Bc5,
    Bc6h,
    Bc7,
    A1,
    A8,
    G8,
    R8,
    R8G8,
    G16,
    G16R16,
    B8G8R8A8,
    A2B10G10R10,
    A16B16G16R16,
    FloatRgb,
    FloatR11G11B10,
    FloatRgba,
    A32B32G32R32F,
    B5G5R5A1Unorm,
}

/// Pixel format metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatInfo {
    pub name: &'static str,
    pub dxgi_format: DxgiFormat,
    pub bits_per_pixel: u32,
    pub block_compressed: bool,
}

impl PixelFormat {
    /// Every supported format
    pub const ALL: [PixelFormat; 22] = [
        PixelFormat::Dxt1,
        PixelFormat::Dxt3,
        PixelFormat::Dxt5,
        PixelFormat::Bc4,
        PixelFormat::Bc5,
        PixelFormat::Bc6h,
        PixelFormat::Bc7,
        PixelFormat::A1,
        PixelFormat::A8,
        PixelFormat::G8,
        PixelFormat::R8,
        PixelFormat::R8G8,
        PixelFormat::G16,
        PixelFormat::G16R16,
        PixelFormat::B8G8R8A8,
        PixelFormat::A2B10G10R10,
        PixelFormat::A16B16G16R16,
        PixelFormat::FloatRgb,
        PixelFormat::FloatR11G11B10,
        PixelFormat::FloatRgba,
        PixelFormat::A32B32G32R32F,
        PixelFormat::B5G5R5A1Unorm,
    ];

    /// Get format information
    pub fn info(&self) -> PixelFormatInfo {
        let (name, dxgi_format, bits_per_pixel, block_compressed) = match self {
            PixelFormat::Dxt1 => ("PF_DXT1", DxgiFormat::BC1_UNorm, 4, true),
            PixelFormat::Dxt3 => ("PF_DXT3", DxgiFormat::BC2_UNorm, 8, true),
            PixelFormat::Dxt5 => ("PF_DXT5", DxgiFormat::BC3_UNorm, 8, true),
            PixelFormat::Bc4 => ("PF_BC4", DxgiFormat::BC4_UNorm, 4, true),
            PixelFormat::Bc5 => ("PF_BC5", DxgiFormat::BC5_UNorm, 8, true),
            PixelFormat::Bc6h => ("PF_BC6H", DxgiFormat::BC6H_UF16, 8, true),
            PixelFormat::Bc7 => ("PF_BC7", DxgiFormat::BC7_UNorm, 8, true),
            PixelFormat::A1 => ("PF_A1", DxgiFormat::R1_UNorm, 1, false),
            PixelFormat::A8 => ("PF_A8", DxgiFormat::A8_UNorm, 8, false),
            PixelFormat::G8 => ("PF_G8", DxgiFormat::R8_UNorm, 8, false),
            PixelFormat::R8 => ("PF_R8", DxgiFormat::R8_UNorm, 8, false),
            PixelFormat::R8G8 => ("PF_R8G8", DxgiFormat::R8G8_UNorm, 16, false),
            PixelFormat::G16 => ("PF_G16", DxgiFormat::R16_UNorm, 16, false),
            PixelFormat::G16R16 => ("PF_G16R16", DxgiFormat::R16G16_UNorm, 32, false),
            PixelFormat::B8G8R8A8 => ("PF_B8G8R8A8", DxgiFormat::B8G8R8A8_UNorm, 32, false),
            PixelFormat::A2B10G10R10 => {
                ("PF_A2B10G10R10", DxgiFormat::R10G10B10A2_UNorm, 32, false)
            }
            PixelFormat::A16B16G16R16 => {
                ("PF_A16B16G16R16", DxgiFormat::R16G16B16A16_UNorm, 64, false)
            }
            PixelFormat::FloatRgb => ("PF_FloatRGB", DxgiFormat::R11G11B10_Float, 32, false),
            PixelFormat::FloatR11G11B10 => {
                ("PF_FloatR11G11B10", DxgiFormat::R11G11B10_Float, 32, false)
            }
            PixelFormat::FloatRgba => ("PF_FloatRGBA", DxgiFormat::R16G16B16A16_Float, 64, false),
            PixelFormat::A32B32G32R32F => {
                ("PF_A32B32G32R32F", DxgiFormat::R32G32B32A32_Float, 128, false)
            }
            PixelFormat::B5G5R5A1Unorm => {
                ("PF_B5G5R5A1_UNORM", DxgiFormat::B5G5R5A1_UNorm, 16, false)
            }
        };

        PixelFormatInfo {
            name,
            dxgi_format,
            bits_per_pixel,
            block_compressed,
        }
    }

    /// Resolve an engine format name such as `PF_DXT5`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.name() == name)
    }

    /// Engine format name
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// DXGI counterpart
    pub fn dxgi_format(&self) -> DxgiFormat {
        self.info().dxgi_format
    }

    /// Bits per pixel
    pub fn bits_per_pixel(&self) -> u32 {
        self.info().bits_per_pixel
    }

    /// Check if the format stores 4x4 compressed blocks
    pub fn is_block_compressed(&self) -> bool {
        self.info().block_compressed
    }

    /// Byte length of `pixel_count` pixels in each of `slices` slices
    ///
    /// Block padding is ignored and the total is rounded down once, so a
    /// sub-byte slice still contributes to the sum.
    pub fn bytes_for_pixels(&self, pixel_count: u64, slices: u64) -> u64 {
        pixel_count * self.bits_per_pixel() as u64 * slices / 8
    }

    /// Uncompressed format a block-compressed format decodes to
    pub fn uncompressed(&self) -> Option<Self> {
        match self {
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 | PixelFormat::Bc7 => {
                Some(PixelFormat::B8G8R8A8)
            }
            PixelFormat::Bc4 => Some(PixelFormat::G8),
            PixelFormat::Bc5 => Some(PixelFormat::R8G8),
            PixelFormat::Bc6h => Some(PixelFormat::FloatRgba),
            _ => None,
        }
    }

    /// Uncompressed format for an engine format name
    ///
    /// Also covers compressed formats with no DXGI counterpart.
    pub fn uncompressed_for_name(name: &str) -> Option<Self> {
        match name {
            "PF_ASTC_4x4" => Some(PixelFormat::B8G8R8A8),
            _ => Self::from_name(name)?.uncompressed(),
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
