//! Cooked Unreal Engine Texture Codec
//!
//! This crate reads and rewrites the platform data of cooked `UTexture2D` and
//! `UTextureCube` exports split across `.uexp` (export data) and `.ubulk`
//! (streamed bulk data) files.
//!
//! # Features
//!
//! - **Lossless round trip**: unparsed bytes are replayed verbatim
//! - **Version gating**: 4.x and 5.x layouts, plus the `ff7r` fork
//! - **Mip chain replacement**: import and export through DDS containers
//! - **Format changes**: switch the pixel format or drop mipmaps in place
//!
//! The `.uasset` header is not parsed; callers provide its size and name table.

pub mod asset;
pub mod error;
pub mod reader;
pub mod texture;
pub mod writer;

pub use asset::AssetContainer;
pub use error::{Result, TextureError};
pub use reader::BinaryReader;
pub use texture::{
    DdsTexture, ImportReport, LoadOptions, MipPlacement, MipRecord, PixelFormat, PlatformData,
    SaveOptions,
};
pub use writer::BinaryWriter;
