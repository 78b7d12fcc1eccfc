//! DDS interchange container
//!
//! [`DdsTexture`] is the boundary type textures are exported to and imported
//! from. It keeps mip payloads in the engine's order (largest first, all faces
//! of a mip together) and converts to and from `.dds` files through `ddsfile`.

use super::formats::PixelFormat;
use crate::error::{Result, TextureError};
use ddsfile::{AlphaMode, Caps2, D3D10ResourceDimension, D3DFormat, Dds, DxgiFormat, NewDxgiParams};
use std::io::{Read, Write};

const CUBE_FACES: usize = 6;

/// Texture-level description of a DDS container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsHeader {
    pub width: u32,
    pub height: u32,
    pub format: DxgiFormat,
    pub is_cube: bool,
    pub mipmap_count: u32,
}

/// One mip level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsMipmap {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Header plus mip payloads, largest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsTexture {
    pub header: DdsHeader,
    pub mipmaps: Vec<DdsMipmap>,
}

impl DdsTexture {
    pub fn new(header: DdsHeader, mipmaps: Vec<DdsMipmap>) -> Self {
        Self { header, mipmaps }
    }

    pub fn is_cube(&self) -> bool {
        self.header.is_cube
    }

    /// `"Cube"` for cubemaps, `"2D"` otherwise
    pub fn texture_type(&self) -> &'static str {
        if self.header.is_cube { "Cube" } else { "2D" }
    }

    /// Build a DX10 `.dds` container
    ///
    /// Cubemap payloads are reordered from mip-major to face-major.
    pub fn to_dds(&self) -> Result<Dds> {
        let caps2 = self.header.is_cube.then(|| {
            Caps2::CUBEMAP
                | Caps2::CUBEMAP_POSITIVEX
                | Caps2::CUBEMAP_NEGATIVEX
                | Caps2::CUBEMAP_POSITIVEY
                | Caps2::CUBEMAP_NEGATIVEY
                | Caps2::CUBEMAP_POSITIVEZ
                | Caps2::CUBEMAP_NEGATIVEZ
        });

        let mut dds = Dds::new_dxgi(NewDxgiParams {
            height: self.header.height,
            width: self.header.width,
            depth: None,
            format: self.header.format,
            mipmap_levels: Some(self.mipmaps.len() as u32),
            array_layers: None,
            caps2,
            is_cubemap: self.header.is_cube,
            resource_dimension: D3D10ResourceDimension::Texture2D,
            alpha_mode: AlphaMode::Unknown,
        })?;

        if self.header.is_cube {
            if let Some(mip) = self.mipmaps.iter().find(|mip| mip.data.len() % CUBE_FACES != 0) {
                return Err(TextureError::invalid_dds(format!(
                    "cubemap mip {}x{} holds {} bytes, not a multiple of {CUBE_FACES} faces",
                    mip.width,
                    mip.height,
                    mip.data.len()
                )));
            }
        }

        let total: usize = self.mipmaps.iter().map(|mip| mip.data.len()).sum();
        let mut data = Vec::with_capacity(total);
        if self.header.is_cube {
            for face in 0..CUBE_FACES {
                for mip in &self.mipmaps {
                    let face_size = mip.data.len() / CUBE_FACES;
                    data.extend_from_slice(&mip.data[face * face_size..(face + 1) * face_size]);
                }
            }
        } else {
            for mip in &self.mipmaps {
                data.extend_from_slice(&mip.data);
            }
        }
        dds.data = data;
        Ok(dds)
    }

    /// Split a `.dds` container into mip payloads
    pub fn from_dds(dds: &Dds) -> Result<Self> {
        let format = dxgi_format_of(dds)?;
        let width = dds.header.width;
        let height = dds.header.height;
        let mipmap_count = dds.header.mip_map_count.unwrap_or(1).max(1);
        let is_cube = dds.header.caps2.contains(Caps2::CUBEMAP);

        // A full chain halves the larger side down to 1x1
        let max_levels = u32::BITS - width.max(height).max(1).leading_zeros();
        if mipmap_count > max_levels {
            return Err(TextureError::invalid_dds(format!(
                "{mipmap_count} mipmaps exceed the {max_levels} levels of a {width}x{height} texture"
            )));
        }

        let mut sizes = Vec::with_capacity(mipmap_count as usize);
        for level in 0..mipmap_count {
            let mip_width = (width >> level).max(1);
            let mip_height = (height >> level).max(1);
            let size = mip_byte_len(format, mip_width, mip_height).ok_or_else(|| {
                TextureError::invalid_dds(format!("unsupported DXGI format {format:?}"))
            })?;
            sizes.push((mip_width, mip_height, size));
        }

        let faces = if is_cube { CUBE_FACES } else { 1 };
        let face_stride: usize = sizes.iter().map(|(_, _, size)| size).sum();
        if face_stride * faces != dds.data.len() {
            return Err(TextureError::invalid_dds(format!(
                "expected {} bytes of pixel data, found {}",
                face_stride * faces,
                dds.data.len()
            )));
        }

        let mut mipmaps = Vec::with_capacity(sizes.len());
        let mut mip_offset = 0;
        for (mip_width, mip_height, size) in sizes {
            let mut data = Vec::with_capacity(size * faces);
            for face in 0..faces {
                let start = face * face_stride + mip_offset;
                data.extend_from_slice(&dds.data[start..start + size]);
            }
            mipmaps.push(DdsMipmap {
                data,
                width: mip_width,
                height: mip_height,
            });
            mip_offset += size;
        }

        Ok(Self {
            header: DdsHeader {
                width,
                height,
                format,
                is_cube,
                mipmap_count,
            },
            mipmaps,
        })
    }

    /// Read a `.dds` file
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let dds = Dds::read(reader)?;
        Self::from_dds(&dds)
    }

    /// Write a `.dds` file
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.to_dds()?.write(writer)?;
        Ok(())
    }
}

fn dxgi_format_of(dds: &Dds) -> Result<DxgiFormat> {
    if let Some(format) = dds.get_dxgi_format() {
        return Ok(format);
    }

    match dds.get_d3d_format() {
        Some(D3DFormat::DXT1) => Ok(DxgiFormat::BC1_UNorm),
        Some(D3DFormat::DXT3) => Ok(DxgiFormat::BC2_UNorm),
        Some(D3DFormat::DXT5) => Ok(DxgiFormat::BC3_UNorm),
        Some(D3DFormat::A8R8G8B8) => Ok(DxgiFormat::B8G8R8A8_UNorm),
        Some(D3DFormat::A8) => Ok(DxgiFormat::A8_UNorm),
        Some(D3DFormat::L8) => Ok(DxgiFormat::R8_UNorm),
        Some(format) => Err(TextureError::invalid_dds(format!(
            "unsupported D3D format {format:?}"
        ))),
        None => Err(TextureError::invalid_dds("no pixel format")),
    }
}

/// Byte length of one mip slice of `format`
///
/// Block-compressed formats round up to whole 4x4 blocks.
pub fn mip_byte_len(format: DxgiFormat, width: u32, height: u32) -> Option<usize> {
    let pixel_format = PixelFormat::ALL
        .into_iter()
        .find(|candidate| candidate.dxgi_format() == format)?;
    let (width, height) = (width as usize, height as usize);

    if pixel_format.is_block_compressed() {
        let block_bytes = pixel_format.bits_per_pixel() as usize * 2;
        Some(width.div_ceil(4) * height.div_ceil(4) * block_bytes)
    } else {
        Some((width * height * pixel_format.bits_per_pixel() as usize).div_ceil(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(format: DxgiFormat, is_cube: bool, mips: &[(u32, usize)]) -> DdsTexture {
        let mipmaps: Vec<DdsMipmap> = mips
            .iter()
            .enumerate()
            .map(|(i, &(size, len))| DdsMipmap {
                data: (0..len).map(|b| (b + i * 31) as u8).collect(),
                width: size,
                height: size,
            })
            .collect();
        DdsTexture::new(
            DdsHeader {
                width: mips[0].0,
                height: mips[0].0,
                format,
                is_cube,
                mipmap_count: mips.len() as u32,
            },
            mipmaps,
        )
    }

    #[test]
    fn test_mip_byte_len() {
        assert_eq!(mip_byte_len(DxgiFormat::BC1_UNorm, 4, 4), Some(8));
        assert_eq!(mip_byte_len(DxgiFormat::BC1_UNorm, 1, 1), Some(8));
        assert_eq!(mip_byte_len(DxgiFormat::BC3_UNorm, 8, 4), Some(32));
        assert_eq!(mip_byte_len(DxgiFormat::BC7_UNorm, 2, 2), Some(16));
        assert_eq!(mip_byte_len(DxgiFormat::B8G8R8A8_UNorm, 4, 4), Some(64));
        assert_eq!(mip_byte_len(DxgiFormat::R16G16B16A16_Float, 2, 1), Some(16));
        assert_eq!(mip_byte_len(DxgiFormat::R1_UNorm, 3, 1), Some(1));
        assert_eq!(mip_byte_len(DxgiFormat::R32G8X24_Typeless, 4, 4), None);
    }

    #[test]
    fn test_dds_round_trip() {
        let original = texture(DxgiFormat::BC1_UNorm, false, &[(8, 32), (4, 8), (2, 8), (1, 8)]);
        let dds = original.to_dds().unwrap();
        assert_eq!(dds.data.len(), 56);

        let restored = DdsTexture::from_dds(&dds).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_cube_faces_are_reordered() {
        let original = texture(DxgiFormat::B8G8R8A8_UNorm, true, &[(2, 16 * 6), (1, 4 * 6)]);
        let dds = original.to_dds().unwrap();

        // First face: mip 0 face 0 then mip 1 face 0
        assert_eq!(&dds.data[..16], &original.mipmaps[0].data[..16]);
        assert_eq!(&dds.data[16..20], &original.mipmaps[1].data[..4]);

        let restored = DdsTexture::from_dds(&dds).unwrap();
        assert!(restored.is_cube());
        assert_eq!(restored.texture_type(), "Cube");
        assert_eq!(restored, original);
    }

    #[test]
    fn test_file_round_trip() {
        let original = texture(DxgiFormat::BC3_UNorm, false, &[(4, 16), (2, 16), (1, 16)]);
        let mut file = Vec::new();
        original.write(&mut file).unwrap();
        assert_eq!(&file[..4], b"DDS ");

        let restored = DdsTexture::read(file.as_slice()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_excess_mip_count_is_rejected() {
        let original = texture(DxgiFormat::B8G8R8A8_UNorm, false, &[(4, 64), (2, 16), (1, 4)]);
        let mut dds = original.to_dds().unwrap();
        assert!(DdsTexture::from_dds(&dds).is_ok());

        dds.header.mip_map_count = Some(4);
        assert!(matches!(
            DdsTexture::from_dds(&dds),
            Err(TextureError::InvalidDds(_))
        ));

        dds.header.mip_map_count = Some(40);
        dds.data = vec![0; 2560];
        assert!(matches!(
            DdsTexture::from_dds(&dds),
            Err(TextureError::InvalidDds(_))
        ));
    }

    #[test]
    fn test_partial_cube_face_is_rejected() {
        let original = texture(DxgiFormat::B8G8R8A8_UNorm, true, &[(2, 16 * 6 + 1)]);
        assert!(matches!(
            original.to_dds(),
            Err(TextureError::InvalidDds(_))
        ));
    }

    #[test]
    fn test_truncated_data_is_rejected() {
        let original = texture(DxgiFormat::BC1_UNorm, false, &[(4, 8), (2, 8)]);
        let mut dds = original.to_dds().unwrap();
        dds.data.pop();
        assert!(matches!(
            DdsTexture::from_dds(&dds),
            Err(TextureError::InvalidDds(_))
        ));
    }
}
