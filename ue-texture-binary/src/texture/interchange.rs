//! Export to and import from the DDS interchange container

use super::dds::{DdsHeader, DdsMipmap, DdsTexture};
use super::mipmap::{MipPlacement, MipRecord};
use super::platform_data::PlatformData;
use crate::error::{Result, TextureError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Non-fatal findings of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportAdvisory {
    /// Mipmapped textures should have power-of-two dimensions
    NonPowerOfTwo { width: u32, height: u32 },
    /// The asset had a single mip but the import has several
    MipCountIncreased { old: usize, new: usize },
}

impl fmt::Display for ImportAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportAdvisory::NonPowerOfTwo { width, height } => write!(
                f,
                "Mipmaps should have power of 2 as its width and height. ({width}, {height})"
            ),
            ImportAdvisory::MipCountIncreased { .. } => write!(
                f,
                "The original texture has only 1 mipmap. But your dds has multiple mipmaps."
            ),
        }
    }
}

/// Outcome of [`PlatformData::import_dds`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub old_size: (u32, u32),
    pub new_size: (u32, u32),
    pub old_mip_count: usize,
    pub new_mip_count: usize,
    pub advisories: Vec<ImportAdvisory>,
}

impl PlatformData {
    /// Export the mip chain without decoding it
    pub fn export_dds(&self) -> Result<DdsTexture> {
        let format = self.require_format()?;
        let (width, height) = self.max_size();

        let mipmaps: Vec<DdsMipmap> = self
            .mipmaps()
            .iter()
            .map(|mip| DdsMipmap {
                data: mip.data.clone(),
                width: mip.width,
                height: mip.height,
            })
            .collect();

        Ok(DdsTexture::new(
            DdsHeader {
                width,
                height,
                format: format.dxgi_format(),
                is_cube: self.is_cube(),
                mipmap_count: mipmaps.len() as u32,
            },
            mipmaps,
        ))
    }

    /// Replace the mip chain with the container's
    ///
    /// The container must use the same pixel format and texture type. Mips
    /// larger than the current largest primary mip go to the secondary stream
    /// when the asset already uses one; the smallest mip always stays primary.
    pub fn import_dds(&mut self, dds: &DdsTexture) -> Result<ImportReport> {
        let format = self.require_format()?;
        if dds.header.format != format.dxgi_format() {
            return Err(TextureError::FormatMismatch {
                asset: format!("{:?}", format.dxgi_format()),
                dds: format!("{:?}", dds.header.format),
            });
        }
        if dds.is_cube() != self.is_cube() {
            return Err(TextureError::TypeMismatch {
                asset: self.texture_type().to_string(),
                dds: dds.texture_type().to_string(),
            });
        }
        if dds.mipmaps.is_empty() {
            return Err(TextureError::invalid_dds("no mipmaps"));
        }
        if dds
            .mipmaps
            .windows(2)
            .any(|pair| area(pair[1].width, pair[1].height) > area(pair[0].width, pair[0].height))
        {
            return Err(TextureError::invalid_dds(
                "mipmaps must be ordered from largest to smallest",
            ));
        }

        let old_size = self.max_size();
        let old_mip_count = self.mipmaps().len();
        let uses_secondary = self.has_secondary();
        let (primary_width, primary_height) = self.max_primary_size();
        let primary_area = area(primary_width, primary_height);

        let last = dds.mipmaps.len() - 1;
        let mipmaps = dds
            .mipmaps
            .iter()
            .enumerate()
            .map(|(i, mip)| {
                let placement =
                    if uses_secondary && i < last && area(mip.width, mip.height) > primary_area {
                        MipPlacement::Secondary { offset: 0 }
                    } else {
                        MipPlacement::Primary
                    };
                MipRecord::new(mip.data.clone(), mip.width, mip.height, placement)
            })
            .collect();
        self.replace_mipmaps(mipmaps);

        if self.version().is_fork() {
            self.set_has_opt_data(self.has_secondary());
        }

        let new_size = self.max_size();
        let new_mip_count = self.mipmaps().len();
        info!(
            old_size = ?old_size,
            new_size = ?new_size,
            old_mip_count,
            new_mip_count,
            "DDS has been imported"
        );

        let mut advisories = Vec::new();
        if new_mip_count > 1 && !(new_size.0.is_power_of_two() && new_size.1.is_power_of_two()) {
            advisories.push(ImportAdvisory::NonPowerOfTwo {
                width: new_size.0,
                height: new_size.1,
            });
        }
        if new_mip_count > 1 && old_mip_count == 1 {
            advisories.push(ImportAdvisory::MipCountIncreased {
                old: old_mip_count,
                new: new_mip_count,
            });
        }
        for advisory in &advisories {
            warn!("{advisory}");
        }

        Ok(ImportReport {
            old_size,
            new_size,
            old_mip_count,
            new_mip_count,
            advisories,
        })
    }
}

fn area(width: u32, height: u32) -> u64 {
    width as u64 * height as u64
}
