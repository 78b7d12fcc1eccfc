//! Unreal Texture Toolkit
//!
//! Lossless rewriting of cooked Unreal Engine textures. The platform data of a
//! `UTexture2D` or `UTextureCube` export is parsed from its `.uexp`/`.ubulk`
//! streams, its mip chain can be exported to or replaced from a DDS file, and
//! the result is written back byte-for-byte wherever nothing changed.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ue_texture::{AssetContainer, EngineVersion, LoadOptions, NameMap, PlatformData};
//! use std::fs;
//!
//! let names: NameMap = ["None", "PF_BC7"].into_iter().collect();
//! let mut asset = AssetContainer::new(
//!     fs::read("T_Sky.uexp")?,
//!     fs::read("T_Sky.ubulk")?,
//!     names,
//!     fs::metadata("T_Sky.uasset")?.len(),
//! );
//!
//! let texture = PlatformData::load(&mut asset, &LoadOptions::new(EngineVersion::parse("5.1")?))?;
//! println!("{:?}", texture.summary());
//!
//! texture.export_dds()?.write(&mut fs::File::create("T_Sky.dds")?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export from core and binary crates
pub use ue_texture_core::{EngineFork, EngineVersion, NameMap, NameTable, UeAssetError};

pub use ue_texture_binary::texture::{
    DdsHeader, DdsMipmap, DdsTexture, ImportAdvisory, ImportReport, LoadOptions, MipPlacement,
    MipRecord, PackedData, PixelFormat, PlatformData, SaveOptions, TextureSummary,
};
pub use ue_texture_binary::{AssetContainer, Result, TextureError};
