//! Cooked texture platform data
//!
//! # Architecture
//!
//! - `anchor` - Locates the recognized fields after the unparsed properties
//! - `layout` - Version-gated field order shared by reading and writing
//! - `packed` - Cubemap/optional-data/slice word
//! - `mipmap` - Mip records and their bulk data headers
//! - `formats` - Engine pixel formats and their DXGI counterparts
//! - `platform_data` - Load, save and in-place mutation
//! - `dds` / `interchange` - DDS export and import
//!
//! # Examples
//!
//! ```rust,no_run
//! use ue_texture_binary::texture::{DdsTexture, LoadOptions, PlatformData, SaveOptions};
//! use ue_texture_binary::AssetContainer;
//! use ue_texture_core::{EngineVersion, NameMap};
//! use std::fs;
//!
//! let names: NameMap = ["None", "PF_DXT5"].into_iter().collect();
//! let header_size = fs::metadata("T_Rock.uasset")?.len();
//! let mut asset = AssetContainer::new(
//!     fs::read("T_Rock.uexp")?,
//!     fs::read("T_Rock.ubulk")?,
//!     names,
//!     header_size,
//! );
//!
//! let options = LoadOptions::new(EngineVersion::parse("4.25")?);
//! let mut texture = PlatformData::load(&mut asset, &options)?;
//! let trailer = asset.primary.get_ref()[asset.primary.position() as usize..].to_vec();
//!
//! let dds = DdsTexture::read(fs::File::open("T_Rock.dds")?)?;
//! texture.import_dds(&dds)?;
//!
//! let mut output = AssetContainer::empty(asset.names.clone(), header_size);
//! texture.save(&mut output, &SaveOptions::default())?;
//! output.primary.get_mut().extend_from_slice(&trailer);
//! texture.rewrite_offset_data(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod anchor;
pub mod dds;
pub mod formats;
pub mod interchange;
pub mod layout;
pub mod mipmap;
pub mod options;
pub mod packed;
pub mod platform_data;

pub use dds::{DdsHeader, DdsMipmap, DdsTexture};
pub use formats::{PixelFormat, PixelFormatInfo};
pub use interchange::{ImportAdvisory, ImportReport};
pub use mipmap::{BulkStorage, MipPlacement, MipRecord};
pub use options::{LoadOptions, SaveOptions};
pub use packed::PackedData;
pub use platform_data::{PlatformData, TextureSummary};
